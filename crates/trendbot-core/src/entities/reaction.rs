//! Reaction entity - an emoji reaction tally on a Slack message

use serde::{Deserialize, Serialize};

/// Aggregated reaction on a message, as returned by `conversations.history`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reaction {
    /// Emoji short name without colons (e.g. `thumbsup`, `tada`)
    pub name: String,
    pub count: u32,
}

impl Reaction {
    /// Create a new Reaction
    pub fn new(name: impl Into<String>, count: u32) -> Self {
        Self {
            name: name.into(),
            count,
        }
    }

    /// Render as `:<name>: ×<count>`
    pub fn summary(&self) -> String {
        format!(":{}: ×{}", self.name, self.count)
    }
}

/// Sum of all reaction counts
pub fn total_reaction_count(reactions: &[Reaction]) -> u32 {
    reactions.iter().map(|r| r.count).sum()
}

/// Space-separated summary of every reaction type, in the given order
pub fn reaction_summary(reactions: &[Reaction]) -> String {
    reactions
        .iter()
        .map(Reaction::summary)
        .collect::<Vec<_>>()
        .join(" ")
}
