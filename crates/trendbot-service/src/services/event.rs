//! Events API handling

use tracing::{debug, info, instrument};

use trendbot_core::events::{CreatedChannel, EmojiSubtype};
use trendbot_core::{OutgoingMessage, SlackEvent};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::home::HomeService;
use super::install::InstallService;
use super::messages;
use super::workspace;

/// Event service
pub struct EventService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> EventService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Dispatch one `event_callback` inner event
    #[instrument(skip(self, event), fields(event = event.kind()))]
    pub async fn handle(&self, team_id: &str, event: &SlackEvent) -> ServiceResult<()> {
        match event {
            SlackEvent::AppHomeOpened { user, .. } => {
                HomeService::new(self.ctx).publish(team_id, user).await
            }
            SlackEvent::ChannelCreated { channel } => self.channel_created(team_id, channel).await,
            SlackEvent::EmojiChanged {
                subtype: EmojiSubtype::Add,
                name: Some(name),
                value,
            } => self.emoji_added(team_id, name, value.as_deref()).await,
            SlackEvent::EmojiChanged { .. } => Ok(()),
            SlackEvent::TokensRevoked | SlackEvent::AppUninstalled => {
                InstallService::new(self.ctx).uninstall(team_id).await.map(|_| ())
            }
            SlackEvent::Unknown => {
                debug!("Ignoring unhandled event");
                Ok(())
            }
        }
    }

    async fn channel_created(&self, team_id: &str, channel: &CreatedChannel) -> ServiceResult<()> {
        let installation = workspace::load(self.ctx, team_id).await?;
        let token = &installation.bot_token;

        if let Some(target) = installation.target_channel() {
            let message = OutgoingMessage::text(target, messages::channel_created(&channel.id));
            self.ctx.slack().post_message(token, &message).await?;
        }

        // With an explicit channel list the bot stays only where the user put
        // it; joining here would silently extend that list.
        if installation.is_all_public_channel {
            self.ctx.slack().join_channel(token, &channel.id).await?;
            info!(channel_id = %channel.id, "Joined new channel");
        }
        Ok(())
    }

    async fn emoji_added(&self, team_id: &str, name: &str, value: Option<&str>) -> ServiceResult<()> {
        let installation = workspace::load(self.ctx, team_id).await?;
        let Some(target) = installation.target_channel() else {
            return Ok(());
        };

        let mut message = OutgoingMessage::text(target, messages::emoji_added(name));
        if let Some(attachments) = value.and_then(messages::emoji_attachments) {
            message = message.with_attachments(attachments);
        }
        self.ctx
            .slack()
            .post_message(&installation.bot_token, &message)
            .await?;
        Ok(())
    }
}
