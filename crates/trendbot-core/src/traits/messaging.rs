//! Pub/sub, delayed tasks and OAuth state ports

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::events::{TaskPayload, TopicMessage};

/// Publishes fan-out messages to their topic
#[async_trait]
pub trait EventPublisher: Send + Sync {
    async fn publish(&self, message: &TopicMessage) -> Result<(), DomainError>;
}

/// Durable queue of HTTP task callbacks
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Deliver `task` to its queue no earlier than `execute_at`
    async fn enqueue(&self, task: &TaskPayload, execute_at: DateTime<Utc>) -> Result<(), DomainError>;
}

/// Pending OAuth state tokens
#[async_trait]
pub trait OAuthStateStore: Send + Sync {
    /// Remember a freshly issued state token
    async fn save(&self, state: &str) -> Result<(), DomainError>;

    /// Remove a state token; returns false when it was unknown or expired
    async fn consume(&self, state: &str) -> Result<bool, DomainError>;
}
