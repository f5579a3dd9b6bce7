//! Producer side of the task queue.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use trendbot_core::events::{Queue, TaskPayload};
use trendbot_core::traits::TaskQueue;
use trendbot_core::DomainError;

use crate::pool::{RedisPool, RedisResult};

/// A task as stored in the sorted set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduledTask {
    /// Makes otherwise identical members distinct
    pub id: Uuid,
    pub queue: Queue,
    /// JSON request body
    pub body: serde_json::Value,
    /// Delivery attempts made so far
    #[serde(default)]
    pub attempt: u32,
}

impl ScheduledTask {
    pub fn from_payload(task: &TaskPayload) -> Result<Self, DomainError> {
        let body = serde_json::from_slice(&task.to_body()?)
            .map_err(|e| DomainError::TaskQueueError(e.to_string()))?;
        Ok(Self {
            id: Uuid::new_v4(),
            queue: task.queue(),
            body,
            attempt: 0,
        })
    }

    /// The same task with the attempt counter bumped
    #[must_use]
    pub fn retried(&self) -> Self {
        Self {
            attempt: self.attempt + 1,
            ..self.clone()
        }
    }
}

/// Sorted set score for a due time
pub(crate) fn score(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

/// Redis-backed [`TaskQueue`]
#[derive(Clone)]
pub struct RedisTaskQueue {
    pool: RedisPool,
    key: String,
}

impl RedisTaskQueue {
    #[must_use]
    pub fn new(pool: RedisPool, key: impl Into<String>) -> Self {
        Self {
            pool,
            key: key.into(),
        }
    }

    /// Add a task to the set, due at `execute_at`
    pub async fn schedule(&self, task: &ScheduledTask, execute_at: DateTime<Utc>) -> RedisResult<()> {
        let mut conn = self.pool.get().await?;
        let member = serde_json::to_string(task)?;
        conn.zadd::<_, _, _, ()>(&self.key, member, score(execute_at)).await?;

        tracing::debug!(
            queue = %task.queue,
            attempt = task.attempt,
            execute_at = %execute_at,
            "Scheduled task"
        );
        Ok(())
    }
}

#[async_trait]
impl TaskQueue for RedisTaskQueue {
    async fn enqueue(&self, task: &TaskPayload, execute_at: DateTime<Utc>) -> Result<(), DomainError> {
        let scheduled = ScheduledTask::from_payload(task)?;
        self.schedule(&scheduled, execute_at)
            .await
            .map_err(|e| DomainError::TaskQueueError(e.to_string()))
    }
}
