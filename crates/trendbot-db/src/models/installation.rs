//! Installation database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for installations table
#[derive(Debug, Clone, FromRow)]
pub struct InstallationModel {
    pub team_id: String,
    pub team_name: Option<String>,
    pub bot_token: String,
    pub bot_user_id: String,
    pub bot_id: Option<String>,
    pub scopes: Vec<String>,
    pub installer_user_id: Option<String>,
    pub target_channel_id: Option<String>,
    pub joined_channel_ids: Option<Vec<String>>,
    pub is_all_public_channel: bool,
    pub selected_trend_num: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row returned by the install upsert
#[derive(Debug, Clone, FromRow)]
pub struct InstallationUpsertModel {
    #[sqlx(flatten)]
    pub installation: InstallationModel,
    /// `xmax = 0`: the row was inserted rather than updated
    pub inserted: bool,
}
