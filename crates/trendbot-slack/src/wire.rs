//! Slack Web API response shapes

use serde::Deserialize;

use trendbot_core::{ChannelInfo, HistoryMessage, MessageTs, OAuthAccess, Reaction};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseMetadata {
    #[serde(default)]
    pub next_cursor: Option<String>,
}

impl ResponseMetadata {
    /// Cursor for the next page; Slack signals the end with an empty string
    pub fn cursor(&self) -> Option<&str> {
        self.next_cursor.as_deref().filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConversationsList {
    #[serde(default)]
    pub channels: Vec<ChannelInfo>,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WireMessage {
    pub ts: String,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl WireMessage {
    /// Messages whose `ts` does not parse are skipped
    pub fn into_history(self) -> Option<HistoryMessage> {
        match MessageTs::parse(&self.ts) {
            Ok(ts) => Some(HistoryMessage::new(ts, self.reactions)),
            Err(e) => {
                tracing::debug!(ts = %self.ts, error = %e, "Skipping message with invalid ts");
                None
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ConversationsHistory {
    #[serde(default)]
    pub messages: Vec<WireMessage>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub response_metadata: ResponseMetadata,
}

impl ConversationsHistory {
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_more {
            self.response_metadata.cursor()
        } else {
            None
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Permalink {
    pub permalink: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PostedMessage {
    pub ts: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Empty {}

#[derive(Debug, Deserialize)]
pub(crate) struct OAuthTeam {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OAuthUser {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OAuthV2Access {
    pub access_token: String,
    pub bot_user_id: String,
    #[serde(default)]
    pub app_id: Option<String>,
    #[serde(default)]
    pub scope: String,
    pub team: OAuthTeam,
    #[serde(default)]
    pub authed_user: Option<OAuthUser>,
}

impl From<OAuthV2Access> for OAuthAccess {
    fn from(access: OAuthV2Access) -> Self {
        OAuthAccess {
            team_id: access.team.id,
            team_name: access.team.name,
            access_token: access.access_token,
            bot_user_id: access.bot_user_id,
            app_id: access.app_id,
            scopes: access
                .scope
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
            authed_user_id: access.authed_user.map(|u| u.id),
        }
    }
}
