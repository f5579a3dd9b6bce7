//! Pub/sub topics and their messages

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every pub/sub topic the bot publishes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    // Periodic fan-out, one message per workspace
    TrendScan,
    WeeklyTrend,
    MonthlyTrend,
    RecommendChannel,
    PrunePostedTrends,

    // Interactive actions
    SelectTargetChannel,
    JoinChannelList,
    JoinAllChannel,
    SelectTrendNum,
    JoinChannelButton,
}

impl Topic {
    /// All topics, for subscribing
    pub const ALL: [Topic; 10] = [
        Topic::TrendScan,
        Topic::WeeklyTrend,
        Topic::MonthlyTrend,
        Topic::RecommendChannel,
        Topic::PrunePostedTrends,
        Topic::SelectTargetChannel,
        Topic::JoinChannelList,
        Topic::JoinAllChannel,
        Topic::SelectTrendNum,
        Topic::JoinChannelButton,
    ];

    /// Topic name
    pub fn as_str(self) -> &'static str {
        match self {
            Self::TrendScan => "trend_scan",
            Self::WeeklyTrend => "weekly_trend",
            Self::MonthlyTrend => "monthly_trend",
            Self::RecommendChannel => "recommend_channel",
            Self::PrunePostedTrends => "prune_posted_trends",
            Self::SelectTargetChannel => "select_target_channel",
            Self::JoinChannelList => "join_channel_list",
            Self::JoinAllChannel => "join_all_channel",
            Self::SelectTrendNum => "select_trend_num",
            Self::JoinChannelButton => "join_channel_button",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Topic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown topic: {s}"))
    }
}

/// A message published to exactly one topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "topic", rename_all = "snake_case")]
pub enum TopicMessage {
    TrendScan {
        team_id: String,
    },
    WeeklyTrend {
        team_id: String,
    },
    MonthlyTrend {
        team_id: String,
    },
    RecommendChannel {
        team_id: String,
    },
    PrunePostedTrends {
        team_id: String,
    },
    SelectTargetChannel {
        team_id: String,
        user_id: String,
        channel_id: String,
    },
    JoinChannelList {
        team_id: String,
        user_id: String,
        channel_ids: Vec<String>,
    },
    JoinAllChannel {
        team_id: String,
        user_id: String,
        enabled: bool,
    },
    SelectTrendNum {
        team_id: String,
        user_id: String,
        trend_num: i32,
    },
    JoinChannelButton {
        team_id: String,
        /// Channel holding the recommendation message
        channel_id: String,
        message_ts: String,
        /// Channel being recommended
        recommended_channel_id: String,
    },
}

impl TopicMessage {
    /// Topic this message belongs to
    pub fn topic(&self) -> Topic {
        match self {
            Self::TrendScan { .. } => Topic::TrendScan,
            Self::WeeklyTrend { .. } => Topic::WeeklyTrend,
            Self::MonthlyTrend { .. } => Topic::MonthlyTrend,
            Self::RecommendChannel { .. } => Topic::RecommendChannel,
            Self::PrunePostedTrends { .. } => Topic::PrunePostedTrends,
            Self::SelectTargetChannel { .. } => Topic::SelectTargetChannel,
            Self::JoinChannelList { .. } => Topic::JoinChannelList,
            Self::JoinAllChannel { .. } => Topic::JoinAllChannel,
            Self::SelectTrendNum { .. } => Topic::SelectTrendNum,
            Self::JoinChannelButton { .. } => Topic::JoinChannelButton,
        }
    }

    /// Workspace the message is about
    pub fn team_id(&self) -> &str {
        match self {
            Self::TrendScan { team_id }
            | Self::WeeklyTrend { team_id }
            | Self::MonthlyTrend { team_id }
            | Self::RecommendChannel { team_id }
            | Self::PrunePostedTrends { team_id }
            | Self::SelectTargetChannel { team_id, .. }
            | Self::JoinChannelList { team_id, .. }
            | Self::JoinAllChannel { team_id, .. }
            | Self::SelectTrendNum { team_id, .. }
            | Self::JoinChannelButton { team_id, .. } => team_id,
        }
    }

    /// Build the periodic fan-out message for `topic`, if it is a periodic topic
    pub fn periodic(topic: Topic, team_id: impl Into<String>) -> Option<Self> {
        let team_id = team_id.into();
        match topic {
            Topic::TrendScan => Some(Self::TrendScan { team_id }),
            Topic::WeeklyTrend => Some(Self::WeeklyTrend { team_id }),
            Topic::MonthlyTrend => Some(Self::MonthlyTrend { team_id }),
            Topic::RecommendChannel => Some(Self::RecommendChannel { team_id }),
            Topic::PrunePostedTrends => Some(Self::PrunePostedTrends { team_id }),
            _ => None,
        }
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
