//! Routing of topic messages and task callbacks to the services
//!
//! Both entry points treat a missing or unconfigured workspace as success, so
//! neither the subscriber nor the task dispatcher retries it.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument};

use trendbot_core::{TaskPayload, TopicMessage, TrendPeriod};

use super::batch::ChannelBatchService;
use super::channel::ChannelService;
use super::context::ServiceContext;
use super::error::{OrSkip, ServiceResult};
use super::install::InstallService;
use super::interactive::InteractiveService;
use super::recommend::RecommendService;
use super::trend::TrendService;
use super::workspace;

/// How a task callback was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    /// Redelivery on a queue that must not run twice
    SkippedRetry,
    /// Workspace missing or not set up
    NotConfigured,
}

/// Dispatch service
pub struct DispatchService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DispatchService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Handle one message received from a topic
    #[instrument(skip(self, message), fields(topic = %message.topic(), team_id = %message.team_id()))]
    pub async fn handle_topic(&self, message: &TopicMessage, now: DateTime<Utc>) -> ServiceResult<()> {
        let result = match message {
            TopicMessage::TrendScan { team_id } => self.scan_trends(team_id, now).await,
            TopicMessage::WeeklyTrend { team_id } => {
                self.scan_digest(TrendPeriod::Weekly, team_id, now).await
            }
            TopicMessage::MonthlyTrend { team_id } => {
                self.scan_digest(TrendPeriod::Monthly, team_id, now).await
            }
            TopicMessage::RecommendChannel { team_id } => RecommendService::new(self.ctx)
                .recommend(team_id)
                .await
                .map(|_| ()),
            TopicMessage::PrunePostedTrends { team_id } => TrendService::new(self.ctx)
                .prune_posted(team_id, now)
                .await
                .map(|_| ()),
            TopicMessage::SelectTargetChannel {
                team_id,
                user_id,
                channel_id,
            } => {
                InteractiveService::new(self.ctx)
                    .select_target_channel(team_id, user_id, channel_id)
                    .await
            }
            TopicMessage::JoinChannelList {
                team_id,
                user_id,
                channel_ids,
            } => {
                InteractiveService::new(self.ctx)
                    .join_channel_list(team_id, user_id, channel_ids, now)
                    .await
            }
            TopicMessage::JoinAllChannel {
                team_id,
                user_id,
                enabled,
            } => {
                InteractiveService::new(self.ctx)
                    .join_all_channel(team_id, user_id, *enabled, now)
                    .await
            }
            TopicMessage::SelectTrendNum {
                team_id,
                user_id,
                trend_num,
            } => {
                InteractiveService::new(self.ctx)
                    .select_trend_num(team_id, user_id, *trend_num)
                    .await
            }
            TopicMessage::JoinChannelButton {
                team_id,
                channel_id,
                message_ts,
                recommended_channel_id,
            } => {
                InteractiveService::new(self.ctx)
                    .join_channel_button(team_id, channel_id, message_ts, recommended_channel_id)
                    .await
            }
        };
        result.or_skip().map(|_| ())
    }

    /// Handle one task callback; `retry_count` is the delivery's retry header
    #[instrument(skip(self, task), fields(queue = %task.queue(), team_id = %task.team_id()))]
    pub async fn handle_task(
        &self,
        task: &TaskPayload,
        retry_count: u32,
        now: DateTime<Utc>,
    ) -> ServiceResult<TaskOutcome> {
        if retry_count > 0 && task.queue().ignores_retries() {
            info!(retry_count, "Ignoring retried delivery");
            return Ok(TaskOutcome::SkippedRetry);
        }

        let trends = TrendService::new(self.ctx);
        let result = match task {
            TaskPayload::JoinChannel(body) => ChannelService::new(self.ctx)
                .join_batch(body)
                .await
                .map(|_| ()),
            TaskPayload::PostTrendMessage(body) => {
                trends.post_trend_message(body, now).await.map(|_| ())
            }
            TaskPayload::CountWeeklyTrendMessage(body) => trends
                .count_trend(TrendPeriod::Weekly, body, now)
                .await
                .map(|_| ()),
            TaskPayload::CountMonthlyTrendMessage(body) => trends
                .count_trend(TrendPeriod::Monthly, body, now)
                .await
                .map(|_| ()),
            TaskPayload::PostWeeklyTrendMessage(body) => {
                trends.post_digest(TrendPeriod::Weekly, body).await.map(|_| ())
            }
            TaskPayload::PostMonthlyTrendMessage(body) => {
                trends.post_digest(TrendPeriod::Monthly, body).await.map(|_| ())
            }
            TaskPayload::SendFirstMessage(body) => {
                InstallService::new(self.ctx).send_first_message(body).await
            }
        };

        Ok(match result.or_skip()? {
            Some(()) => TaskOutcome::Completed,
            None => TaskOutcome::NotConfigured,
        })
    }

    async fn scan_trends(&self, team_id: &str, now: DateTime<Utc>) -> ServiceResult<()> {
        let installation = workspace::load_configured(self.ctx, team_id).await?;
        let channel_ids = ChannelService::new(self.ctx)
            .member_channel_ids(&installation)
            .await?;
        let scheduled = ChannelBatchService::new(self.ctx)
            .schedule_trend_scan(team_id, &channel_ids, now)
            .await;
        debug!(channels = channel_ids.len(), scheduled, "Scheduled trend scan");
        Ok(())
    }

    async fn scan_digest(&self, period: TrendPeriod, team_id: &str, now: DateTime<Utc>) -> ServiceResult<()> {
        let installation = workspace::load_configured(self.ctx, team_id).await?;
        let channel_ids = ChannelService::new(self.ctx)
            .member_channel_ids(&installation)
            .await?;
        let scheduled = ChannelBatchService::new(self.ctx)
            .schedule_digest(period, team_id, &channel_ids, now)
            .await;
        debug!(%period, channels = channel_ids.len(), scheduled, "Scheduled digest scan");
        Ok(())
    }
}
