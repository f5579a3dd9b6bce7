//! Slack Web API port

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::entities::{ChannelInfo, HistoryMessage, OAuthAccess};
use crate::error::DomainError;
use crate::value_objects::MessageTs;

pub type SlackResult<T> = Result<T, DomainError>;

/// A `chat.postMessage` request
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    pub channel: String,
    pub text: String,
    pub blocks: Option<Value>,
    pub attachments: Option<Value>,
    /// Expand links in the text, so permalinks render as message previews
    pub unfurl_links: bool,
}

impl OutgoingMessage {
    pub fn text(channel: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            text: text.into(),
            blocks: None,
            attachments: None,
            unfurl_links: true,
        }
    }

    pub fn with_blocks(mut self, blocks: Value) -> Self {
        self.blocks = Some(blocks);
        self
    }

    pub fn with_attachments(mut self, attachments: Value) -> Self {
        self.attachments = Some(attachments);
        self
    }
}

/// Calls the bot makes against Slack.
///
/// Every call but the OAuth exchange is authorised by the workspace's bot token.
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// Every public, non-archived channel, following pagination
    async fn list_public_channels(&self, token: &str) -> SlackResult<Vec<ChannelInfo>>;

    /// Messages in a channel posted at or after `oldest`
    async fn conversation_history(
        &self,
        token: &str,
        channel_id: &str,
        oldest: DateTime<Utc>,
    ) -> SlackResult<Vec<HistoryMessage>>;

    async fn get_permalink(&self, token: &str, channel_id: &str, ts: &MessageTs) -> SlackResult<String>;

    /// Post a message; returns the new message's timestamp
    async fn post_message(&self, token: &str, message: &OutgoingMessage) -> SlackResult<String>;

    async fn update_message(
        &self,
        token: &str,
        channel_id: &str,
        ts: &str,
        text: &str,
        blocks: Option<&Value>,
    ) -> SlackResult<()>;

    async fn join_channel(&self, token: &str, channel_id: &str) -> SlackResult<()>;

    async fn leave_channel(&self, token: &str, channel_id: &str) -> SlackResult<()>;

    /// Publish the Home tab for one user
    async fn publish_home_view(&self, token: &str, user_id: &str, view: &Value) -> SlackResult<()>;

    /// Exchange an OAuth code for a bot token
    async fn exchange_oauth_code(&self, code: &str) -> SlackResult<OAuthAccess>;
}
