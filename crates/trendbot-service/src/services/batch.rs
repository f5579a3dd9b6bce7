//! Channel batch scheduling
//!
//! Turns a channel list into delayed tasks, one per group.

use chrono::{DateTime, Utc};
use tracing::{debug, error, instrument};

use trendbot_core::events::{ChannelBatchBody, TaskPayload};
use trendbot_core::trend::{plan_batches, ScanPlan};
use trendbot_core::TrendPeriod;

use super::context::ServiceContext;

/// Channel batch service
pub struct ChannelBatchService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChannelBatchService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Enqueue every task; a failing enqueue is logged and skipped. Returns how many were enqueued.
    pub async fn schedule(&self, tasks: Vec<(DateTime<Utc>, TaskPayload)>) -> usize {
        let mut scheduled = 0;
        for (execute_at, task) in tasks {
            match self.ctx.task_queue().enqueue(&task, execute_at).await {
                Ok(()) => {
                    debug!(queue = %task.queue(), team_id = %task.team_id(), %execute_at, "Enqueued task");
                    scheduled += 1;
                }
                Err(e) => error!(queue = %task.queue(), team_id = %task.team_id(), error = %e, "Failed to enqueue task"),
            }
        }
        scheduled
    }

    /// Hourly scan: one `post-trend-message` task per group
    #[instrument(skip(self, channel_ids), fields(channels = channel_ids.len()))]
    pub async fn schedule_trend_scan(&self, team_id: &str, channel_ids: &[String], now: DateTime<Utc>) -> usize {
        let plan = ScanPlan::hourly();
        let tasks = channel_tasks(team_id, channel_ids, plan.batch_size, now, plan.interval, TaskPayload::PostTrendMessage);
        self.schedule(tasks).await
    }

    /// Digest: `count-*` tasks per group, then one `post-*` task after the last group
    #[instrument(skip(self, channel_ids), fields(channels = channel_ids.len()))]
    pub async fn schedule_digest(
        &self,
        period: TrendPeriod,
        team_id: &str,
        channel_ids: &[String],
        now: DateTime<Utc>,
    ) -> usize {
        let plan = ScanPlan::digest(period);
        let mut tasks = channel_tasks(team_id, channel_ids, plan.batch_size, now, plan.interval, |body| {
            TaskPayload::count_trend(period, body)
        });
        let post_at = digest_post_time(now, tasks.len(), plan.interval);
        tasks.push((post_at, TaskPayload::post_digest(period, team_id)));
        self.schedule(tasks).await
    }

    /// Joins: groups of 40, two minutes apart
    #[instrument(skip(self, channel_ids), fields(channels = channel_ids.len()))]
    pub async fn schedule_joins(&self, team_id: &str, channel_ids: &[String], now: DateTime<Utc>) -> usize {
        let plan = ScanPlan::join();
        let tasks = channel_tasks(team_id, channel_ids, plan.batch_size, now, plan.interval, TaskPayload::JoinChannel);
        self.schedule(tasks).await
    }
}

fn channel_tasks(
    team_id: &str,
    channel_ids: &[String],
    batch_size: usize,
    now: DateTime<Utc>,
    interval: chrono::Duration,
    to_task: impl Fn(ChannelBatchBody) -> TaskPayload,
) -> Vec<(DateTime<Utc>, TaskPayload)> {
    plan_batches(channel_ids, batch_size, now, interval)
        .into_iter()
        .map(|(at, group)| {
            let body = ChannelBatchBody {
                team_id: team_id.to_string(),
                channel_ids: group,
            };
            (at, to_task(body))
        })
        .collect()
}

/// The digest post runs once every counting group has had its slot
fn digest_post_time(now: DateTime<Utc>, groups: usize, interval: chrono::Duration) -> DateTime<Utc> {
    now + interval * i32::try_from(groups).unwrap_or(i32::MAX)
}
