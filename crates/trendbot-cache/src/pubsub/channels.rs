//! Pub/Sub channel naming.
//!
//! Each [`Topic`] maps to one Redis channel, `trendbot:topic:{topic}`.

use trendbot_core::events::Topic;

/// Prefix of every topic channel
pub const TOPIC_CHANNEL_PREFIX: &str = "trendbot:topic:";

/// Redis channel name for a topic
#[must_use]
pub fn topic_channel(topic: Topic) -> String {
    format!("{TOPIC_CHANNEL_PREFIX}{topic}")
}

/// Parse a channel name back to its topic
#[must_use]
pub fn parse_topic_channel(name: &str) -> Option<Topic> {
    name.strip_prefix(TOPIC_CHANNEL_PREFIX)?.parse().ok()
}
