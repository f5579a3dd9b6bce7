//! Home tab
//!
//! The view is rebuilt from the stored installation every time, so it always
//! reflects the persisted settings.

use serde_json::{json, Value};
use tracing::instrument;

use trendbot_core::entities::TREND_NUM_CHOICES;
use trendbot_core::{Action, Installation};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::workspace;

/// Home service
pub struct HomeService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> HomeService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Re-read the installation and publish the Home tab for `user_id`
    #[instrument(skip(self))]
    pub async fn publish(&self, team_id: &str, user_id: &str) -> ServiceResult<()> {
        let installation = workspace::load(self.ctx, team_id).await?;
        self.ctx
            .slack()
            .publish_home_view(&installation.bot_token, user_id, &home_view(&installation))
            .await?;
        Ok(())
    }
}

fn plain(text: &str) -> Value {
    json!({ "type": "plain_text", "text": text })
}

fn trend_num_option(num: i32) -> Value {
    json!({ "text": plain(&num.to_string()), "value": num.to_string() })
}

/// Build the Home tab view for an installation
pub fn home_view(installation: &Installation) -> Value {
    let all_public = installation.is_all_public_channel;

    let mut target_select = json!({
        "type": "channels_select",
        "action_id": Action::SelectTargetChannel.as_str(),
        "placeholder": plain("Select a channel"),
    });
    if let Some(target) = installation.target_channel() {
        target_select["initial_channel"] = json!(target);
    }

    let mut join_list_section = json!({
        "type": "section",
        "text": {
            "type": "mrkdwn",
            "text": "*Required:* choose the channels the bot watches.\n\nOnly linked channels are checked for trending posts.",
        },
    });
    if !all_public {
        join_list_section["accessory"] = json!({
            "type": "multi_channels_select",
            "action_id": Action::JoinChannelList.as_str(),
            "initial_channels": installation.joined_channel_ids.clone().unwrap_or_default(),
            "placeholder": plain("Select channels"),
        });
    }

    let join_all_option = json!({
        "text": { "type": "mrkdwn", "text": "*Link every public channel*" },
        "description": plain("New public channels are linked automatically"),
        "value": "checked",
    });
    let mut join_all_checkbox = json!({
        "type": "checkboxes",
        "action_id": Action::JoinAllChannel.as_str(),
        "options": [join_all_option.clone()],
        "confirm": {
            "title": plain(if all_public { "Unlink all channels?" } else { "Link all channels?" }),
            "text": { "type": "mrkdwn", "text": "Channels must be linked to find trending posts." },
            "confirm": plain(if all_public { "Unlink" } else { "Link" }),
            "deny": plain("Cancel"),
            "style": if all_public { "danger" } else { "primary" },
        },
    });
    if all_public {
        join_all_checkbox["initial_options"] = json!([join_all_option]);
    }

    let options: Vec<Value> = TREND_NUM_CHOICES.iter().copied().map(trend_num_option).collect();
    let mut trend_select = json!({
        "type": "static_select",
        "action_id": Action::SelectTrendNum.as_str(),
        "options": options,
    });
    if TREND_NUM_CHOICES.contains(&installation.selected_trend_num) {
        trend_select["initial_option"] = trend_num_option(installation.selected_trend_num);
    }

    json!({
        "type": "home",
        "blocks": [
            {
                "type": "section",
                "text": { "type": "mrkdwn", "text": "*Required:* choose the channel the bot posts to" },
                "accessory": target_select,
            },
            { "type": "divider" },
            join_list_section,
            { "type": "actions", "elements": [join_all_checkbox] },
            { "type": "divider" },
            {
                "type": "section",
                "text": { "type": "mrkdwn", "text": "Reactions needed for a trending post" },
                "accessory": trend_select,
            },
            { "type": "divider" },
        ],
    })
}
