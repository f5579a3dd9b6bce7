//! Text and Block Kit bodies the bot posts

use serde_json::{json, Value};

use trendbot_core::entities::reaction_summary;
use trendbot_core::{Reaction, TrendPeriod};

/// Intro before the hourly announcement
pub const TREND_INTRO: &str = ":tada: This post is taking off!";

/// DM sent to the installer after a first install
pub const FIRST_MESSAGE: &str =
    "Thanks for installing! Open the Home tab to pick a channel for trending posts.";

/// Hourly announcement item
pub fn trend_item(channel_id: &str, reactions: &[Reaction], permalink: &str) -> String {
    format!(
        ":tada: <#{channel_id}> is buzzing!\n{}\n{permalink}",
        reaction_summary(reactions)
    )
}

/// Intro before a digest
pub fn digest_intro(period: TrendPeriod, count: usize) -> String {
    let span = match period {
        TrendPeriod::Weekly => "last week",
        TrendPeriod::Monthly => "last month",
    };
    format!(":tada: Here are the top {count} posts from {span}!")
}

/// Digest item
pub fn digest_item(reactions: &[Reaction], permalink: &str) -> String {
    format!("{}\n{permalink}", reaction_summary(reactions))
}

pub fn target_channel_selected(bot_user_id: &str) -> String {
    format!(":tada: <@{bot_user_id}> will start posting here!")
}

pub fn channel_created(channel_id: &str) -> String {
    format!(":new: Channel <#{channel_id}> was just created! Come and join!")
}

pub fn emoji_added(name: &str) -> String {
    format!(":new: Reaction :{name}: was just added! Give it a try!")
}

/// Image attachment for a new emoji; aliases have no image
pub fn emoji_attachments(value: &str) -> Option<Value> {
    if value.starts_with("alias:") || value.is_empty() {
        return None;
    }
    Some(json!([{
        "blocks": [{ "type": "image", "image_url": value, "alt_text": value }]
    }]))
}

pub fn recommend_text(channel_id: &str) -> String {
    format!("How about linking <#{channel_id}>?")
}

/// Recommendation with a join button carrying the channel ID
pub fn recommend_blocks(channel_id: &str, action_id: &str) -> Value {
    json!([{
        "type": "section",
        "text": { "type": "mrkdwn", "text": recommend_text(channel_id) },
        "accessory": {
            "type": "button",
            "style": "primary",
            "text": { "type": "plain_text", "text": "Link", "emoji": true },
            "action_id": action_id,
            "value": channel_id,
        }
    }])
}

pub fn recommend_linked_text(channel_id: &str) -> String {
    format!("~{}~\n*Linked!*", recommend_text(channel_id))
}

/// Recommendation rewritten once the channel is joined
pub fn recommend_linked_blocks(channel_id: &str) -> Value {
    json!([{
        "type": "section",
        "text": { "type": "mrkdwn", "text": recommend_linked_text(channel_id) }
    }])
}

/// Page shown after the OAuth redirect
pub fn install_success_html(team_name: Option<&str>) -> String {
    let team = team_name.map_or_else(|| "your workspace".to_string(), html_escape);
    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>Trendbot installed</title></head>\
         <body><h1>Trendbot was installed to {team}</h1>\
         <p>Open the app's Home tab in Slack to finish the setup.</p></body></html>"
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
