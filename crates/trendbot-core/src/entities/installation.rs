//! Installation entity - one Slack workspace that has installed the bot

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Default minimum reaction count for a message to count as trending
pub const DEFAULT_TREND_NUM: i32 = 10;

/// Threshold choices offered on the home tab
pub const TREND_NUM_CHOICES: [i32; 8] = [5, 10, 15, 20, 30, 40, 50, 100];

/// Installation entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Installation {
    pub team_id: String,
    pub team_name: Option<String>,
    pub bot_token: String,
    pub bot_user_id: String,
    pub bot_id: Option<String>,
    pub scopes: Vec<String>,
    pub installer_user_id: Option<String>,
    /// The single channel trend announcements are posted into
    pub target_channel_id: Option<String>,
    pub joined_channel_ids: Option<Vec<String>>,
    /// Auto-join every public channel, including newly created ones
    pub is_all_public_channel: bool,
    pub selected_trend_num: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Installation {
    /// Target channel, if one has been chosen
    #[inline]
    pub fn target_channel(&self) -> Option<&str> {
        self.target_channel_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Check if the bot can post anything for this workspace
    pub fn is_configured(&self) -> bool {
        !self.bot_token.is_empty() && self.target_channel().is_some()
    }

    /// Trend threshold, falling back to the default for non-positive values
    pub fn trend_threshold(&self) -> u32 {
        u32::try_from(self.selected_trend_num)
            .ok()
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_TREND_NUM as u32)
    }
}

/// Credentials produced by a completed OAuth exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewInstallation {
    pub team_id: String,
    pub team_name: Option<String>,
    pub bot_token: String,
    pub bot_user_id: String,
    pub bot_id: Option<String>,
    pub scopes: Vec<String>,
    pub installer_user_id: Option<String>,
}

/// Result of persisting an install
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub installation: Installation,
    /// True only the first time this workspace is stored
    pub first_install: bool,
}
