//! Channel entity - a public Slack channel as listed by `conversations.list`

use serde::{Deserialize, Serialize};

/// Public channel summary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelInfo {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub num_members: u32,
    /// Whether the bot user is a member
    #[serde(default)]
    pub is_member: bool,
}

impl ChannelInfo {
    /// Create a new ChannelInfo
    pub fn new(id: impl Into<String>, name: impl Into<String>, num_members: u32, is_member: bool) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            num_members,
            is_member,
        }
    }
}

/// Sort channels by member count, largest first. Equal counts keep their listing order.
pub fn sort_by_members(channels: &mut [ChannelInfo]) {
    channels.sort_by(|a, b| b.num_members.cmp(&a.num_members));
}

/// IDs of channels the bot has joined, largest first
pub fn member_channel_ids(channels: &[ChannelInfo]) -> Vec<String> {
    let mut members: Vec<ChannelInfo> = channels.iter().filter(|c| c.is_member).cloned().collect();
    sort_by_members(&mut members);
    members.into_iter().map(|c| c.id).collect()
}

/// IDs of channels the bot has not joined, in listing order
pub fn non_member_channel_ids(channels: &[ChannelInfo]) -> Vec<String> {
    channels
        .iter()
        .filter(|c| !c.is_member)
        .map(|c| c.id.clone())
        .collect()
}
