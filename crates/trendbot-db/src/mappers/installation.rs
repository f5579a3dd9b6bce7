//! Installation model -> entity mapper

use trendbot_core::entities::{InstallOutcome, Installation};

use crate::models::{InstallationModel, InstallationUpsertModel};

impl From<InstallationModel> for Installation {
    fn from(model: InstallationModel) -> Self {
        Installation {
            team_id: model.team_id,
            team_name: model.team_name,
            bot_token: model.bot_token,
            bot_user_id: model.bot_user_id,
            bot_id: model.bot_id,
            scopes: model.scopes,
            installer_user_id: model.installer_user_id,
            target_channel_id: model.target_channel_id,
            joined_channel_ids: model.joined_channel_ids,
            is_all_public_channel: model.is_all_public_channel,
            selected_trend_num: model.selected_trend_num,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<InstallationUpsertModel> for InstallOutcome {
    fn from(row: InstallationUpsertModel) -> Self {
        InstallOutcome {
            installation: row.installation.into(),
            first_install: row.inserted,
        }
    }
}
