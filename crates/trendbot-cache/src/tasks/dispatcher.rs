//! Consumer side of the task queue.
//!
//! Due tasks are leased rather than removed: claiming pushes a member's score
//! forward by the lease, and the member only leaves the set once its delivery
//! is settled. A worker that dies mid-delivery leaves the task to be claimed
//! again when the lease runs out.

use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Script};
use std::time::Duration;
use tokio::sync::watch;

use trendbot_common::TaskQueueConfig;

use crate::pool::{RedisPool, RedisResult};
use crate::tasks::queue::{score, ScheduledTask};

/// Header naming the queue a callback was delivered on
pub const QUEUE_NAME_HEADER: &str = "x-task-queue-name";

/// Header carrying the zero-based delivery attempt
pub const RETRY_COUNT_HEADER: &str = "x-task-retry-count";

/// Re-score a member to the lease deadline if it is still due.
/// KEYS[1] = set, ARGV = member, now score, lease deadline score.
const CLAIM_SCRIPT: &str = r"
local current = redis.call('ZSCORE', KEYS[1], ARGV[1])
if current and tonumber(current) <= tonumber(ARGV[2]) then
    redis.call('ZADD', KEYS[1], ARGV[3], ARGV[1])
    return 1
end
return 0
";

/// Dispatcher settings
#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    /// Callback base URL, without trailing slash
    pub base_url: String,
    /// Sorted set holding pending tasks
    pub key: String,
    pub poll_interval: Duration,
    /// Total deliveries allowed per task
    pub max_attempts: u32,
    pub retry_delay: chrono::Duration,
    /// Maximum tasks claimed per poll
    pub batch_size: usize,
    pub request_timeout: Duration,
    /// How long a claimed task stays invisible to other polls
    pub lease: chrono::Duration,
}

impl From<&TaskQueueConfig> for DispatcherConfig {
    fn from(config: &TaskQueueConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            key: config.key.clone(),
            poll_interval: Duration::from_millis(config.poll_interval_ms.max(10)),
            max_attempts: config.max_attempts.max(1),
            retry_delay: chrono::Duration::seconds(config.retry_delay_seconds as i64),
            batch_size: 50,
            request_timeout: Duration::from_secs(60),
            lease: chrono::Duration::minutes(5),
        }
    }
}

/// Result of one delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Requeued for another attempt
    Retrying,
    /// Out of attempts
    Dropped,
}

/// A leased task and the exact member string it is stored under
#[derive(Debug, Clone)]
struct Claimed {
    member: String,
    task: ScheduledTask,
}

/// Claims due tasks and POSTs them to the callback endpoint
pub struct TaskDispatcher {
    pool: RedisPool,
    client: reqwest::Client,
    config: DispatcherConfig,
    claim: Script,
}

impl TaskDispatcher {
    pub fn new(pool: RedisPool, config: DispatcherConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            pool,
            client,
            config,
            claim: Script::new(CLAIM_SCRIPT),
        })
    }

    /// Poll until `shutdown` flips to true
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        tracing::info!(
            base_url = %self.config.base_url,
            key = %self.config.key,
            "Task dispatcher started"
        );

        let mut ticker = tokio::time::interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.poll_once(Utc::now()).await {
                        tracing::error!(error = %e, "Task poll failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        tracing::info!("Task dispatcher stopped");
    }

    /// Deliver every task due at `now`; returns how many were claimed.
    ///
    /// A failure while settling one task is logged and does not stop the rest;
    /// that task stays leased and is claimed again after the lease.
    pub async fn poll_once(&self, now: DateTime<Utc>) -> RedisResult<usize> {
        let tasks = self.claim_due(now).await?;
        let claimed = tasks.len();

        for claimed_task in tasks {
            let queue = claimed_task.task.queue;
            let attempt = claimed_task.task.attempt;
            if let Err(e) = self.deliver(claimed_task, now).await {
                tracing::error!(
                    queue = %queue,
                    attempt,
                    error = %e,
                    "Failed to settle task, it will be redelivered after its lease"
                );
            }
        }

        Ok(claimed)
    }

    /// Lease due members; members another poll leased first are skipped
    async fn claim_due(&self, now: DateTime<Utc>) -> RedisResult<Vec<Claimed>> {
        let mut conn = self.pool.get().await?;
        let members: Vec<String> = conn
            .zrangebyscore_limit(
                &self.config.key,
                "-inf",
                score(now),
                0,
                self.config.batch_size as isize,
            )
            .await?;

        let mut claimed = Vec::with_capacity(members.len());
        for member in members {
            let leased: i32 = self
                .claim
                .key(&self.config.key)
                .arg(&member)
                .arg(score(now))
                .arg(score(now + self.config.lease))
                .invoke_async(&mut conn)
                .await?;
            if leased == 0 {
                continue;
            }
            match serde_json::from_str::<ScheduledTask>(&member) {
                Ok(task) => claimed.push(Claimed { member, task }),
                Err(e) => {
                    tracing::warn!(error = %e, "Dropping malformed task");
                    conn.zrem::<_, _, ()>(&self.config.key, &member).await?;
                }
            }
        }
        Ok(claimed)
    }

    async fn deliver(&self, claimed: Claimed, now: DateTime<Utc>) -> RedisResult<Delivery> {
        let Claimed { member, task } = claimed;
        let url = callback_url(&self.config.base_url, &task);
        let response = self
            .client
            .post(&url)
            .header(QUEUE_NAME_HEADER, task.queue.as_str())
            .header(RETRY_COUNT_HEADER, task.attempt.to_string())
            .json(&task.body)
            .send()
            .await;

        let failure = match response {
            Ok(resp) if resp.status().is_success() => {
                self.release(&member).await?;
                tracing::debug!(queue = %task.queue, attempt = task.attempt, "Task delivered");
                return Ok(Delivery::Delivered);
            }
            Ok(resp) => format!("status {}", resp.status()),
            Err(e) => e.to_string(),
        };

        match next_attempt(&task, self.config.max_attempts) {
            Some(retry) => {
                tracing::warn!(
                    queue = %task.queue,
                    attempt = task.attempt,
                    error = %failure,
                    "Task delivery failed, retrying"
                );
                let retry_member = serde_json::to_string(&retry)?;
                let mut conn = self.pool.get().await?;
                let _: () = redis::pipe()
                    .atomic()
                    .zrem(&self.config.key, &member)
                    .ignore()
                    .zadd(&self.config.key, retry_member, score(now + self.config.retry_delay))
                    .ignore()
                    .query_async(&mut conn)
                    .await?;
                Ok(Delivery::Retrying)
            }
            None => {
                tracing::error!(
                    queue = %task.queue,
                    attempt = task.attempt,
                    error = %failure,
                    "Task delivery failed, giving up"
                );
                self.release(&member).await?;
                Ok(Delivery::Dropped)
            }
        }
    }

    /// Remove a settled member from the set
    async fn release(&self, member: &str) -> RedisResult<()> {
        let mut conn = self.pool.get().await?;
        conn.zrem::<_, _, ()>(&self.config.key, member).await?;
        Ok(())
    }
}

fn callback_url(base_url: &str, task: &ScheduledTask) -> String {
    format!("{base_url}/tasks/{}", task.queue)
}

/// The retry of `task`, if it has attempts left
fn next_attempt(task: &ScheduledTask, max_attempts: u32) -> Option<ScheduledTask> {
    (task.attempt + 1 < max_attempts).then(|| task.retried())
}
