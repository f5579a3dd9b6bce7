//! Trend selection
//!
//! Filters candidates by reaction threshold and prior announcement, ranks them
//! by total reactions and caps the result. Pure: the caller resolves
//! permalinks, posts, and persists [`TrendSelection::posted`].

use chrono::{DateTime, Utc};
use std::collections::HashSet;

use crate::entities::{PostedMessage, TrendMessage};

/// Outcome of one selection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrendSelection {
    /// Messages to announce, most reactions first
    pub chosen: Vec<TrendMessage>,
    /// Dedupe set to persist: prior entries followed by the chosen ones
    pub posted: Vec<PostedMessage>,
}

impl TrendSelection {
    pub fn is_empty(&self) -> bool {
        self.chosen.is_empty()
    }
}

/// Select up to `max_results` trending messages.
///
/// Candidates below `threshold` or already in `already_posted` are dropped,
/// as are repeats of a `(channel, ts)` pair (the first occurrence wins).
/// Ties keep encounter order.
pub fn select_trending(
    candidates: Vec<TrendMessage>,
    threshold: u32,
    already_posted: &[PostedMessage],
    max_results: usize,
) -> TrendSelection {
    let mut seen: HashSet<PostedMessage> = already_posted.iter().cloned().collect();

    let mut eligible: Vec<TrendMessage> = candidates
        .into_iter()
        .filter(|m| m.reaction_count >= threshold)
        .filter(|m| seen.insert(m.key()))
        .collect();
    eligible.sort_by(|a, b| b.reaction_count.cmp(&a.reaction_count));
    eligible.truncate(max_results);

    let mut posted = Vec::with_capacity(already_posted.len() + eligible.len());
    let mut in_posted = HashSet::with_capacity(posted.capacity());
    for key in already_posted.iter().cloned().chain(eligible.iter().map(TrendMessage::key)) {
        if in_posted.insert(key.clone()) {
            posted.push(key);
        }
    }

    TrendSelection {
        chosen: eligible,
        posted,
    }
}

/// Keep dedupe entries posted strictly after `cutoff`, preserving order
pub fn retain_recent(posted: Vec<PostedMessage>, cutoff: DateTime<Utc>) -> Vec<PostedMessage> {
    posted
        .into_iter()
        .filter(|p| p.message_ts.is_newer_than(cutoff))
        .collect()
}
