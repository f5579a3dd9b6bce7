//! OAuth state tokens in Redis.
//!
//! Each issued `state` lives under its own key until it is consumed by the
//! redirect or expires.

use async_trait::async_trait;

use trendbot_core::traits::OAuthStateStore;
use trendbot_core::DomainError;

use crate::pool::{RedisPool, RedisResult};

/// Key prefix for pending states
const OAUTH_STATE_PREFIX: &str = "oauth_state:";

/// Default TTL for a pending state (10 minutes)
pub const DEFAULT_OAUTH_STATE_TTL: u64 = 10 * 60;

/// Redis-backed [`OAuthStateStore`]
#[derive(Clone)]
pub struct RedisOAuthStateStore {
    pool: RedisPool,
    ttl_seconds: u64,
}

impl RedisOAuthStateStore {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self::with_ttl(pool, DEFAULT_OAUTH_STATE_TTL)
    }

    #[must_use]
    pub fn with_ttl(pool: RedisPool, ttl_seconds: u64) -> Self {
        Self { pool, ttl_seconds }
    }

    fn key(state: &str) -> String {
        format!("{OAUTH_STATE_PREFIX}{state}")
    }

    /// Store a state with the configured TTL
    pub async fn store(&self, state: &str) -> RedisResult<()> {
        self.pool.set(&Self::key(state), &true, Some(self.ttl_seconds)).await?;
        tracing::debug!(ttl = self.ttl_seconds, "Stored OAuth state");
        Ok(())
    }

    /// Delete a state; true when it was still pending
    pub async fn take(&self, state: &str) -> RedisResult<bool> {
        self.pool.delete(&Self::key(state)).await
    }
}

#[async_trait]
impl OAuthStateStore for RedisOAuthStateStore {
    async fn save(&self, state: &str) -> Result<(), DomainError> {
        self.store(state).await.map_err(Into::into)
    }

    async fn consume(&self, state: &str) -> Result<bool, DomainError> {
        self.take(state).await.map_err(Into::into)
    }
}
