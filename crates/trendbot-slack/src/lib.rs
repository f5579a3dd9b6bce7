//! # trendbot-slack
//!
//! Slack Web API adapter implementing [`trendbot_core::SlackApi`].
//!
//! Calls return Slack's `ok: false` errors as
//! [`DomainError::SlackApi`](trendbot_core::DomainError::SlackApi). Rate limited
//! and 5xx responses are retried with backoff, honouring `Retry-After`.

mod client;
mod retry;
mod wire;

pub use client::{SlackClientConfig, SlackWebClient};
