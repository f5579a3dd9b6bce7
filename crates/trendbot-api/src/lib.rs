//! # trendbot-api
//!
//! Axum HTTP server for the Slack callbacks and task deliveries, plus the
//! background workers: the topic subscriber, the task dispatcher and the cron
//! scheduler.

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;
pub mod workers;

pub use server::{create_app, run};
pub use state::{AppState, ReadinessProbe};
