//! Route definitions

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{events, health, interactive, oauth, tasks};
use crate::state::AppState;

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// Slack-facing routes: install flow, events and interactive components
pub fn slack_routes() -> Router<AppState> {
    Router::new()
        .route("/slack/install", get(oauth::install))
        .route("/slack/oauth_redirect", get(oauth::oauth_redirect))
        .route("/slack/events", post(events::events))
        .route("/slack/interactive", post(interactive::interactive))
}

/// Task callbacks from the dispatcher (not rate limited)
pub fn task_routes() -> Router<AppState> {
    Router::new().route("/tasks/:queue", post(tasks::task_callback))
}
