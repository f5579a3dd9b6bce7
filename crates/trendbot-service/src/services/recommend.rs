//! Channel recommendation nudges

use tracing::{debug, info, instrument};

use trendbot_core::{Action, ChannelInfo, OutgoingMessage};

use super::channel::ChannelService;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::messages;
use super::workspace;

/// Recommendation service
pub struct RecommendService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RecommendService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Suggest the largest channel the bot is not in and has not suggested yet.
    ///
    /// Returns the suggested channel. When every candidate has been suggested the
    /// list is reset and nothing is posted.
    #[instrument(skip(self))]
    pub async fn recommend(&self, team_id: &str) -> ServiceResult<Option<String>> {
        let installation = workspace::load_configured(self.ctx, team_id).await?;
        if installation.is_all_public_channel {
            debug!("Auto-join-all mode, nothing to recommend");
            return Ok(None);
        }
        let target = workspace::target_channel(&installation)?;

        let mut suggested = self.ctx.recommended_channels().get(team_id).await?;
        let channels = ChannelService::new(self.ctx).list_channels(&installation).await?;

        let Some(channel_id) = next_recommendation(&channels, &suggested) else {
            if !suggested.is_empty() {
                self.ctx.recommended_channels().replace(team_id, &[]).await?;
                info!("Recommendations exhausted, list reset");
            }
            return Ok(None);
        };

        let message = OutgoingMessage::text(&target, messages::recommend_text(&channel_id))
            .with_blocks(messages::recommend_blocks(&channel_id, Action::JoinChannelButton.as_str()));
        self.ctx
            .slack()
            .post_message(&installation.bot_token, &message)
            .await?;

        suggested.push(channel_id.clone());
        self.ctx
            .recommended_channels()
            .replace(team_id, &suggested)
            .await?;

        info!(channel_id = %channel_id, "Posted channel recommendation");
        Ok(Some(channel_id))
    }
}

/// First non-member channel not yet suggested; `channels` is sorted largest first
fn next_recommendation(channels: &[ChannelInfo], suggested: &[String]) -> Option<String> {
    channels
        .iter()
        .find(|c| !c.is_member && !suggested.contains(&c.id))
        .map(|c| c.id.clone())
}
