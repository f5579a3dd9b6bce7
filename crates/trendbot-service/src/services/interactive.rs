//! Interactive component handling
//!
//! The HTTP endpoint only publishes typed topic messages; the handlers here
//! run when those messages come back from the subscriber.

use chrono::{DateTime, Utc};
use tracing::{info, instrument};

use trendbot_core::entities::{non_member_channel_ids, TREND_NUM_CHOICES};
use trendbot_core::{InteractivePayload, OutgoingMessage};

use super::batch::ChannelBatchService;
use super::channel::ChannelService;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::home::HomeService;
use super::messages;
use super::workspace;

/// Interactive service
pub struct InteractiveService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InteractiveService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Publish one topic message per known action; returns how many were published
    #[instrument(skip(self, payload))]
    pub async fn publish_actions(&self, payload: &InteractivePayload) -> ServiceResult<usize> {
        let InteractivePayload::BlockActions(block_actions) = payload;
        let topic_messages = block_actions.topic_messages()?;

        for message in &topic_messages {
            self.ctx.publisher().publish(message).await?;
            info!(topic = %message.topic(), team_id = %message.team_id(), "Published interactive action");
        }
        Ok(topic_messages.len())
    }

    /// Join the announcement channel, store it and say hello in it.
    ///
    /// A failed join leaves the previous target in place.
    #[instrument(skip(self))]
    pub async fn select_target_channel(&self, team_id: &str, user_id: &str, channel_id: &str) -> ServiceResult<()> {
        let installation = workspace::load(self.ctx, team_id).await?;
        self.ctx
            .slack()
            .join_channel(&installation.bot_token, channel_id)
            .await?;
        if !installation.is_all_public_channel {
            ChannelService::new(self.ctx)
                .refresh_joined_ids(&installation)
                .await?;
        }

        self.ctx
            .installations()
            .set_target_channel(team_id, channel_id)
            .await?;

        let text = messages::target_channel_selected(&installation.bot_user_id);
        self.ctx
            .slack()
            .post_message(&installation.bot_token, &OutgoingMessage::text(channel_id, text))
            .await?;

        HomeService::new(self.ctx).publish(team_id, user_id).await
    }

    /// Make membership match an explicit selection
    #[instrument(skip(self, selected), fields(selected = selected.len()))]
    pub async fn join_channel_list(
        &self,
        team_id: &str,
        user_id: &str,
        selected: &[String],
        now: DateTime<Utc>,
    ) -> ServiceResult<()> {
        if selected.is_empty() {
            return Ok(());
        }

        let installation = workspace::load(self.ctx, team_id).await?;
        let channel_service = ChannelService::new(self.ctx);
        let channels = channel_service.list_channels(&installation).await?;

        let to_join: Vec<String> = channels
            .iter()
            .filter(|c| !c.is_member && selected.contains(&c.id))
            .map(|c| c.id.clone())
            .collect();
        let to_leave: Vec<String> = channels
            .iter()
            .filter(|c| c.is_member && !selected.contains(&c.id))
            .map(|c| c.id.clone())
            .collect();

        let scheduled = ChannelBatchService::new(self.ctx)
            .schedule_joins(team_id, &to_join, now)
            .await;
        let left = channel_service.leave_each(&installation, &to_leave).await;
        channel_service.refresh_joined_ids(&installation).await?;

        info!(join = to_join.len(), scheduled, left, "Updated channel selection");
        HomeService::new(self.ctx).publish(team_id, user_id).await
    }

    /// Toggle auto-join-all mode
    #[instrument(skip(self))]
    pub async fn join_all_channel(
        &self,
        team_id: &str,
        user_id: &str,
        enabled: bool,
        now: DateTime<Utc>,
    ) -> ServiceResult<()> {
        let installation = workspace::load(self.ctx, team_id).await?;
        let channel_service = ChannelService::new(self.ctx);

        if enabled {
            let channels = channel_service.list_channels(&installation).await?;
            let to_join = non_member_channel_ids(&channels);
            ChannelBatchService::new(self.ctx)
                .schedule_joins(team_id, &to_join, now)
                .await;
            self.ctx
                .installations()
                .set_all_public_channel(team_id, true)
                .await?;
            info!(join = to_join.len(), "Enabled auto-join-all");
        } else {
            channel_service.refresh_joined_ids(&installation).await?;
            info!("Disabled auto-join-all");
        }

        HomeService::new(self.ctx).publish(team_id, user_id).await
    }

    /// Set the reaction threshold
    #[instrument(skip(self))]
    pub async fn select_trend_num(&self, team_id: &str, user_id: &str, trend_num: i32) -> ServiceResult<()> {
        if !TREND_NUM_CHOICES.contains(&trend_num) {
            return Err(ServiceError::validation(format!(
                "trend_num {trend_num} is not one of {TREND_NUM_CHOICES:?}"
            )));
        }
        workspace::load(self.ctx, team_id).await?;
        self.ctx
            .installations()
            .set_trend_num(team_id, trend_num)
            .await?;

        HomeService::new(self.ctx).publish(team_id, user_id).await
    }

    /// Join a recommended channel and mark the recommendation as linked
    #[instrument(skip(self))]
    pub async fn join_channel_button(
        &self,
        team_id: &str,
        channel_id: &str,
        message_ts: &str,
        recommended_channel_id: &str,
    ) -> ServiceResult<()> {
        let installation = workspace::load(self.ctx, team_id).await?;
        let token = &installation.bot_token;

        self.ctx
            .slack()
            .join_channel(token, recommended_channel_id)
            .await?;

        if !installation.is_all_public_channel {
            ChannelService::new(self.ctx)
                .refresh_joined_ids(&installation)
                .await?;
        }

        self.ctx
            .slack()
            .update_message(
                token,
                channel_id,
                message_ts,
                &messages::recommend_linked_text(recommended_channel_id),
                Some(&messages::recommend_linked_blocks(recommended_channel_id)),
            )
            .await?;
        Ok(())
    }
}
