//! Channel membership
//!
//! Listing, joining and leaving public channels, and keeping the stored
//! joined-channel list in sync with Slack.

use tracing::{info, instrument, warn};

use trendbot_core::entities::{member_channel_ids, sort_by_members};
use trendbot_core::events::ChannelBatchBody;
use trendbot_core::{ChannelInfo, Installation};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::workspace;

/// Channel service
pub struct ChannelService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ChannelService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Public channels, largest first
    #[instrument(skip(self, installation), fields(team_id = %installation.team_id))]
    pub async fn list_channels(&self, installation: &Installation) -> ServiceResult<Vec<ChannelInfo>> {
        let mut channels = self
            .ctx
            .slack()
            .list_public_channels(&installation.bot_token)
            .await?;
        sort_by_members(&mut channels);
        Ok(channels)
    }

    /// IDs of channels the bot is in, largest first
    pub async fn member_channel_ids(&self, installation: &Installation) -> ServiceResult<Vec<String>> {
        let channels = self.list_channels(installation).await?;
        Ok(member_channel_ids(&channels))
    }

    /// Join each channel; failures are logged per channel. Returns how many joined.
    pub async fn join_each(&self, installation: &Installation, channel_ids: &[String]) -> usize {
        let mut joined = 0;
        for channel_id in channel_ids {
            match self
                .ctx
                .slack()
                .join_channel(&installation.bot_token, channel_id)
                .await
            {
                Ok(()) => joined += 1,
                Err(e) => warn!(team_id = %installation.team_id, channel_id = %channel_id, error = %e, "Failed to join channel"),
            }
        }
        joined
    }

    /// Leave each channel; failures are logged per channel. Returns how many were left.
    pub async fn leave_each(&self, installation: &Installation, channel_ids: &[String]) -> usize {
        let mut left = 0;
        for channel_id in channel_ids {
            match self
                .ctx
                .slack()
                .leave_channel(&installation.bot_token, channel_id)
                .await
            {
                Ok(()) => left += 1,
                Err(e) => warn!(team_id = %installation.team_id, channel_id = %channel_id, error = %e, "Failed to leave channel"),
            }
        }
        left
    }

    /// Store current membership as the explicit joined list (clears auto-join-all)
    #[instrument(skip(self, installation), fields(team_id = %installation.team_id))]
    pub async fn refresh_joined_ids(&self, installation: &Installation) -> ServiceResult<Vec<String>> {
        let joined = self.member_channel_ids(installation).await?;
        self.ctx
            .installations()
            .set_joined_channels(&installation.team_id, &joined)
            .await?;
        Ok(joined)
    }

    /// `join-channel` task: join a batch, then refresh the joined list unless in auto-join-all mode
    #[instrument(skip(self, body), fields(team_id = %body.team_id, channels = body.channel_ids.len()))]
    pub async fn join_batch(&self, body: &ChannelBatchBody) -> ServiceResult<usize> {
        let installation = workspace::load(self.ctx, &body.team_id).await?;
        let joined = self.join_each(&installation, &body.channel_ids).await;

        if !installation.is_all_public_channel {
            self.refresh_joined_ids(&installation).await?;
        }

        info!(joined, requested = body.channel_ids.len(), "Joined channel batch");
        Ok(joined)
    }
}
