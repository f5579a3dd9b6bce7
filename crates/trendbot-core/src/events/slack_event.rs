//! Events API callbacks

use serde::Deserialize;

/// Outer envelope of an Events API request
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEnvelope {
    UrlVerification {
        challenge: String,
    },
    EventCallback {
        team_id: String,
        event: SlackEvent,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedChannel {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Inner event of an `event_callback`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SlackEvent {
    AppHomeOpened {
        user: String,
        #[serde(default)]
        tab: Option<String>,
    },
    ChannelCreated {
        channel: CreatedChannel,
    },
    EmojiChanged {
        subtype: EmojiSubtype,
        #[serde(default)]
        name: Option<String>,
        /// Image URL or `alias:<name>`
        #[serde(default)]
        value: Option<String>,
    },
    TokensRevoked,
    AppUninstalled,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmojiSubtype {
    Add,
    Remove,
    Rename,
    #[serde(other)]
    Other,
}

impl SlackEvent {
    /// Event type name, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AppHomeOpened { .. } => "app_home_opened",
            Self::ChannelCreated { .. } => "channel_created",
            Self::EmojiChanged { .. } => "emoji_changed",
            Self::TokensRevoked => "tokens_revoked",
            Self::AppUninstalled => "app_uninstalled",
            Self::Unknown => "unknown",
        }
    }
}
