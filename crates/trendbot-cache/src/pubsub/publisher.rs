//! Redis Pub/Sub publisher.

use async_trait::async_trait;
use redis::AsyncCommands;

use trendbot_core::events::TopicMessage;
use trendbot_core::traits::EventPublisher;
use trendbot_core::DomainError;

use crate::pool::{RedisPool, RedisResult};
use crate::pubsub::topic_channel;

/// Publishes topic messages to their Redis channel
#[derive(Clone)]
pub struct RedisEventPublisher {
    pool: RedisPool,
}

impl RedisEventPublisher {
    #[must_use]
    pub fn new(pool: RedisPool) -> Self {
        Self { pool }
    }

    /// Publish and return the number of subscribers that received it
    pub async fn publish_message(&self, message: &TopicMessage) -> RedisResult<u32> {
        let mut conn = self.pool.get().await?;
        let channel = topic_channel(message.topic());
        let payload = message.to_json()?;

        let receivers: u32 = conn.publish(&channel, &payload).await?;

        tracing::debug!(
            channel = %channel,
            team_id = %message.team_id(),
            receivers = receivers,
            "Published topic message"
        );

        Ok(receivers)
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, message: &TopicMessage) -> Result<(), DomainError> {
        let receivers = self
            .publish_message(message)
            .await
            .map_err(|e| DomainError::PublishError(e.to_string()))?;

        if receivers == 0 {
            tracing::warn!(topic = %message.topic(), "No subscriber received topic message");
        }
        Ok(())
    }
}
