//! Trend records - candidates, dedupe entries, and digest periods

use serde::{Deserialize, Serialize};
use std::fmt;

use super::reaction::{total_reaction_count, Reaction};
use crate::value_objects::MessageTs;

/// A message considered for a trend announcement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendMessage {
    pub channel_id: String,
    pub ts: MessageTs,
    pub reactions: Vec<Reaction>,
    pub reaction_count: u32,
}

impl TrendMessage {
    /// Build a candidate, computing the total from the reactions
    pub fn new(channel_id: impl Into<String>, ts: MessageTs, reactions: Vec<Reaction>) -> Self {
        let reaction_count = total_reaction_count(&reactions);
        Self {
            channel_id: channel_id.into(),
            ts,
            reactions,
            reaction_count,
        }
    }

    /// Identity used for deduplication
    pub fn key(&self) -> PostedMessage {
        PostedMessage {
            channel_id: self.channel_id.clone(),
            message_ts: self.ts.clone(),
        }
    }
}

/// A `(channel, ts)` pair that has already been announced
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PostedMessage {
    pub channel_id: String,
    pub message_ts: MessageTs,
}

impl PostedMessage {
    pub fn new(channel_id: impl Into<String>, message_ts: MessageTs) -> Self {
        Self {
            channel_id: channel_id.into(),
            message_ts,
        }
    }
}

/// Digest period for accumulated trends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendPeriod {
    Weekly,
    Monthly,
}

impl TrendPeriod {
    /// All periods
    pub const ALL: [TrendPeriod; 2] = [TrendPeriod::Weekly, TrendPeriod::Monthly];

    /// Storage key
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl fmt::Display for TrendPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TrendPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(format!("unknown trend period: {other}")),
        }
    }
}
