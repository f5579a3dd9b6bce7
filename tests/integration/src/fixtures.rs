//! Test data builders

use chrono::{DateTime, TimeZone, Utc};
use serde_json::{json, Value};

use trendbot_core::entities::DEFAULT_TREND_NUM;
use trendbot_core::{ChannelInfo, HistoryMessage, Installation, MessageTs, OAuthAccess, Reaction};

pub const TEAM_ID: &str = "T0001";
pub const TARGET_CHANNEL: &str = "CTARGET";
pub const BOT_USER: &str = "UBOT";
pub const INSTALLER: &str = "UINSTALLER";

/// Fixed clock for scheduling assertions
pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 15, 9, 0, 0).unwrap()
}

/// A configured installation with a target channel
pub fn installation(team_id: &str) -> Installation {
    let created = now();
    Installation {
        team_id: team_id.to_string(),
        team_name: Some("Acme".to_string()),
        bot_token: format!("xoxb-{team_id}"),
        bot_user_id: BOT_USER.to_string(),
        bot_id: Some("A0001".to_string()),
        scopes: vec!["channels:history".to_string(), "chat:write".to_string()],
        installer_user_id: Some(INSTALLER.to_string()),
        target_channel_id: Some(TARGET_CHANNEL.to_string()),
        joined_channel_ids: None,
        is_all_public_channel: false,
        selected_trend_num: DEFAULT_TREND_NUM,
        created_at: created,
        updated_at: created,
    }
}

/// An installation that never picked a target channel
pub fn unconfigured_installation(team_id: &str) -> Installation {
    Installation {
        target_channel_id: None,
        ..installation(team_id)
    }
}

pub fn channel(id: &str, num_members: u32, is_member: bool) -> ChannelInfo {
    ChannelInfo::new(id, format!("name-{}", id.to_lowercase()), num_members, is_member)
}

pub fn ts(s: &str) -> MessageTs {
    MessageTs::parse(s).unwrap()
}

/// A history message `secs_ago` seconds before [`now`] with a single reaction
pub fn message(secs_ago: i64, emoji: &str, count: u32) -> HistoryMessage {
    let secs = now().timestamp() - secs_ago;
    HistoryMessage::new(ts(&format!("{secs}.000100")), vec![Reaction::new(emoji, count)])
}

pub fn oauth_access(team_id: &str) -> OAuthAccess {
    OAuthAccess {
        team_id: team_id.to_string(),
        team_name: Some("Acme".to_string()),
        access_token: format!("xoxb-{team_id}-fresh"),
        bot_user_id: BOT_USER.to_string(),
        app_id: Some("A0001".to_string()),
        scopes: vec!["channels:history".to_string()],
        authed_user_id: Some(INSTALLER.to_string()),
    }
}

/// `block_actions` payload with the given actions
pub fn block_actions(team_id: &str, user_id: &str, actions: Value) -> Value {
    json!({
        "type": "block_actions",
        "team": { "id": team_id },
        "user": { "id": user_id },
        "actions": actions,
    })
}

/// `block_actions` payload for a button inside a bot message
pub fn button_actions(team_id: &str, channel_id: &str, message_ts: &str, action_id: &str, value: &str) -> Value {
    json!({
        "type": "block_actions",
        "team": { "id": team_id },
        "user": { "id": "U1" },
        "channel": { "id": channel_id },
        "message": { "ts": message_ts },
        "actions": [{ "type": "button", "action_id": action_id, "value": value }],
    })
}

/// `event_callback` envelope around an inner event
pub fn event_callback(team_id: &str, event: Value) -> Value {
    json!({
        "type": "event_callback",
        "team_id": team_id,
        "event": event,
    })
}
