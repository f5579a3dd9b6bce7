//! Integration test utilities for the trend bot
//!
//! In-memory fakes of every port, a [`TestContext`] wiring them into a
//! service context, and fixtures for installations, channels and Slack
//! payloads.

pub mod fakes;
pub mod fixtures;
pub mod helpers;

pub use fakes::*;
pub use fixtures::*;
pub use helpers::*;
