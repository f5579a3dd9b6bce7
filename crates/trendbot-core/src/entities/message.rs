//! History message - a message as seen through `conversations.history`

use serde::{Deserialize, Serialize};

use super::reaction::{total_reaction_count, Reaction};
use crate::value_objects::MessageTs;

/// A channel message with its reaction tallies
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub ts: MessageTs,
    #[serde(default)]
    pub reactions: Vec<Reaction>,
}

impl HistoryMessage {
    /// Create a new HistoryMessage
    pub fn new(ts: MessageTs, reactions: Vec<Reaction>) -> Self {
        Self { ts, reactions }
    }

    /// Total number of reactions across all emoji
    #[inline]
    pub fn reaction_count(&self) -> u32 {
        total_reaction_count(&self.reactions)
    }
}
