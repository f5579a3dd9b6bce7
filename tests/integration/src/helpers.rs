//! Test context and request helpers

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request};
use axum::Router;
use parking_lot::Mutex;

use trendbot_api::{create_app, AppState, ReadinessProbe};
use trendbot_common::signature::{SIGNATURE_HEADER, TIMESTAMP_HEADER};
use trendbot_common::{sign_slack_request, RateLimitConfig};
use trendbot_service::{ServiceContext, ServiceSettings};

use crate::fakes::{FakeOAuthStates, FakePublisher, FakeSlack, FakeTaskQueue, InMemoryStore};

pub const SIGNING_SECRET: &str = "8f742231b10e8888abcd99yyyzzz85a5";
pub const QUEUE_NAME_HEADER: &str = "x-task-queue-name";
pub const RETRY_COUNT_HEADER: &str = "x-task-retry-count";

/// Readiness probe with switchable answers
pub struct FakeProbe {
    database: Mutex<bool>,
    redis: Mutex<bool>,
}

impl Default for FakeProbe {
    fn default() -> Self {
        Self {
            database: Mutex::new(true),
            redis: Mutex::new(true),
        }
    }
}

impl FakeProbe {
    pub fn set_database(&self, healthy: bool) {
        *self.database.lock() = healthy;
    }

    pub fn set_redis(&self, healthy: bool) {
        *self.redis.lock() = healthy;
    }
}

#[async_trait]
impl ReadinessProbe for FakeProbe {
    async fn database(&self) -> bool {
        *self.database.lock()
    }

    async fn redis(&self) -> bool {
        *self.redis.lock()
    }
}

pub fn test_settings() -> ServiceSettings {
    ServiceSettings {
        client_id: "1234.5678".to_string(),
        scopes: vec!["channels:history".to_string(), "chat:write".to_string()],
        redirect_uri: "https://bot.example.com/slack/oauth_redirect".to_string(),
        authorize_url: ServiceSettings::DEFAULT_AUTHORIZE_URL.to_string(),
        test_team_id: None,
    }
}

/// Service context wired to in-memory fakes
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub slack: Arc<FakeSlack>,
    pub publisher: Arc<FakePublisher>,
    pub tasks: Arc<FakeTaskQueue>,
    pub oauth_states: Arc<FakeOAuthStates>,
    pub probe: Arc<FakeProbe>,
    pub ctx: ServiceContext,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_settings(test_settings())
    }

    pub fn with_settings(settings: ServiceSettings) -> Self {
        let store = Arc::new(InMemoryStore::new());
        let slack = Arc::new(FakeSlack::new());
        let publisher = Arc::new(FakePublisher::default());
        let tasks = Arc::new(FakeTaskQueue::default());
        let oauth_states = Arc::new(FakeOAuthStates::default());

        let ctx = ServiceContext::builder()
            .installations(store.clone())
            .posted_trends(store.clone())
            .recommended_channels(store.clone())
            .accumulators(store.clone())
            .slack(slack.clone())
            .publisher(publisher.clone())
            .task_queue(tasks.clone())
            .oauth_states(oauth_states.clone())
            .settings(settings)
            .build()
            .expect("all dependencies are set");

        Self {
            store,
            slack,
            publisher,
            tasks,
            oauth_states,
            probe: Arc::new(FakeProbe::default()),
            ctx,
        }
    }

    /// Router over this context, effectively without rate limiting
    pub fn app(&self) -> Router {
        let state = AppState::new(self.ctx.clone(), SIGNING_SECRET, self.probe.clone());
        let rate_limit = RateLimitConfig {
            requests_per_second: 10_000,
            burst: 10_000,
        };
        create_app(state, &rate_limit)
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// POST with a valid Slack signature for the current time
pub fn signed_request(uri: &str, content_type: &str, body: impl Into<String>) -> Request<Body> {
    let body = body.into();
    let timestamp = chrono::Utc::now().timestamp().to_string();
    let signature = sign_slack_request(SIGNING_SECRET, &timestamp, body.as_bytes());
    Request::post(uri)
        .header(header::CONTENT_TYPE, content_type)
        .header(TIMESTAMP_HEADER, timestamp)
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(body))
        .unwrap()
}

/// Signed `application/json` POST
pub fn signed_json(uri: &str, body: &serde_json::Value) -> Request<Body> {
    signed_request(uri, "application/json", body.to_string())
}

/// Signed interactive form POST carrying `payload`
pub fn signed_interactive(payload: &serde_json::Value) -> Request<Body> {
    let form = form_urlencoded::Serializer::new(String::new())
        .append_pair("payload", &payload.to_string())
        .finish();
    signed_request(
        "/slack/interactive",
        "application/x-www-form-urlencoded",
        form,
    )
}

/// Task callback as delivered by the dispatcher
pub fn task_request(queue: &str, header_queue: &str, retry_count: u32, body: impl Into<String>) -> Request<Body> {
    Request::post(format!("/tasks/{queue}"))
        .header(header::CONTENT_TYPE, "application/json")
        .header(QUEUE_NAME_HEADER, header_queue)
        .header(RETRY_COUNT_HEADER, retry_count.to_string())
        .body(Body::from(body.into()))
        .unwrap()
}

pub async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}
