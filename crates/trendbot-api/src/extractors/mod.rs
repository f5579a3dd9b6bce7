//! Axum extractors for request handling
//!
//! Slack signature verification, task delivery headers, and validated query
//! strings.

mod slack;
mod task;
mod validated;

pub use slack::SlackVerified;
pub use task::TaskDelivery;
pub use validated::ValidatedQuery;
