//! Application state
//!
//! Holds the shared state for the Axum application: the service context, the
//! Slack signing secret and the readiness probe.

use std::sync::Arc;

use async_trait::async_trait;
use trendbot_cache::RedisPool;
use trendbot_db::PgPool;
use trendbot_service::ServiceContext;

/// Backing-store checks behind `GET /health/ready`
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    async fn database(&self) -> bool;
    async fn redis(&self) -> bool;
}

/// Probe against the live PostgreSQL and Redis pools
pub struct StoreProbe {
    db: PgPool,
    redis: RedisPool,
}

impl StoreProbe {
    pub fn new(db: PgPool, redis: RedisPool) -> Self {
        Self { db, redis }
    }
}

#[async_trait]
impl ReadinessProbe for StoreProbe {
    async fn database(&self) -> bool {
        trendbot_db::ping(&self.db).await
    }

    async fn redis(&self) -> bool {
        self.redis.health_check().await.is_ok()
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    signing_secret: Arc<str>,
    probe: Arc<dyn ReadinessProbe>,
}

impl AppState {
    pub fn new(
        service_context: ServiceContext,
        signing_secret: impl Into<Arc<str>>,
        probe: Arc<dyn ReadinessProbe>,
    ) -> Self {
        Self {
            service_context: Arc::new(service_context),
            signing_secret: signing_secret.into(),
            probe,
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Secret used to verify Slack request signatures
    pub fn signing_secret(&self) -> &str {
        &self.signing_secret
    }

    pub fn probe(&self) -> &dyn ReadinessProbe {
        self.probe.as_ref()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("signing_secret", &"[redacted]")
            .finish()
    }
}
