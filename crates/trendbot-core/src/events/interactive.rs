//! Interactive-component callbacks
//!
//! Slack posts these as `payload=<json>`. Only `block_actions` is handled; each
//! element kind is its own variant so a malformed action fails to parse instead
//! of reaching a handler.

use serde::Deserialize;
use std::fmt;

use super::topic::TopicMessage;
use crate::error::DomainError;

/// Action IDs assigned to the bot's interactive elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    SelectTargetChannel,
    JoinChannelList,
    JoinAllChannel,
    SelectTrendNum,
    JoinChannelButton,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SelectTargetChannel => "select_target_channel",
            Self::JoinChannelList => "join_channel_list",
            Self::JoinAllChannel => "join_all_channel",
            Self::SelectTrendNum => "select_trend_num",
            Self::JoinChannelButton => "join_channel_button",
        }
    }

    /// Look up an action ID; unknown IDs return `None`
    pub fn from_id(id: &str) -> Option<Self> {
        [
            Self::SelectTargetChannel,
            Self::JoinChannelList,
            Self::JoinAllChannel,
            Self::SelectTrendNum,
            Self::JoinChannelButton,
        ]
        .into_iter()
        .find(|a| a.as_str() == id)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-level interactive payload
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InteractivePayload {
    BlockActions(BlockActionsPayload),
}

impl InteractivePayload {
    /// Parse the JSON carried in the `payload` form field
    pub fn parse(json: &str) -> Result<Self, DomainError> {
        serde_json::from_str(json).map_err(|e| DomainError::UnsupportedPayload(e.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TeamRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChannelRef {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageRef {
    pub ts: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SelectedOption {
    pub value: String,
}

/// `block_actions` payload
#[derive(Debug, Clone, Deserialize)]
pub struct BlockActionsPayload {
    pub team: TeamRef,
    pub user: UserRef,
    /// Present when the action came from a message
    #[serde(default)]
    pub channel: Option<ChannelRef>,
    #[serde(default)]
    pub message: Option<MessageRef>,
    pub actions: Vec<BlockAction>,
}

/// One element interaction, discriminated by the element type
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockAction {
    ChannelsSelect {
        action_id: String,
        #[serde(default)]
        selected_channel: Option<String>,
    },
    ConversationsSelect {
        action_id: String,
        #[serde(default)]
        selected_conversation: Option<String>,
    },
    MultiChannelsSelect {
        action_id: String,
        #[serde(default)]
        selected_channels: Vec<String>,
    },
    Checkboxes {
        action_id: String,
        #[serde(default)]
        selected_options: Vec<SelectedOption>,
    },
    StaticSelect {
        action_id: String,
        #[serde(default)]
        selected_option: Option<SelectedOption>,
    },
    Button {
        action_id: String,
        #[serde(default)]
        value: Option<String>,
    },
}

impl BlockAction {
    pub fn action_id(&self) -> &str {
        match self {
            Self::ChannelsSelect { action_id, .. }
            | Self::ConversationsSelect { action_id, .. }
            | Self::MultiChannelsSelect { action_id, .. }
            | Self::Checkboxes { action_id, .. }
            | Self::StaticSelect { action_id, .. }
            | Self::Button { action_id, .. } => action_id,
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::ChannelsSelect { .. } => "channels_select",
            Self::ConversationsSelect { .. } => "conversations_select",
            Self::MultiChannelsSelect { .. } => "multi_channels_select",
            Self::Checkboxes { .. } => "checkboxes",
            Self::StaticSelect { .. } => "static_select",
            Self::Button { .. } => "button",
        }
    }
}

impl BlockActionsPayload {
    /// Translate one action into the message to publish.
    ///
    /// `Ok(None)` means there is nothing to do: an unknown action ID or an
    /// empty selection. A known action on the wrong element kind is an error.
    pub fn topic_message(&self, action: &BlockAction) -> Result<Option<TopicMessage>, DomainError> {
        let Some(known) = Action::from_id(action.action_id()) else {
            return Ok(None);
        };
        let team_id = self.team.id.clone();
        let user_id = self.user.id.clone();

        let message = match (known, action) {
            (
                Action::SelectTargetChannel,
                BlockAction::ChannelsSelect {
                    selected_channel: selected,
                    ..
                }
                | BlockAction::ConversationsSelect {
                    selected_conversation: selected,
                    ..
                },
            ) => selected.clone().map(|channel_id| TopicMessage::SelectTargetChannel {
                team_id,
                user_id,
                channel_id,
            }),
            (Action::JoinChannelList, BlockAction::MultiChannelsSelect { selected_channels, .. }) => {
                if selected_channels.is_empty() {
                    None
                } else {
                    Some(TopicMessage::JoinChannelList {
                        team_id,
                        user_id,
                        channel_ids: selected_channels.clone(),
                    })
                }
            }
            (Action::JoinAllChannel, BlockAction::Checkboxes { selected_options, .. }) => {
                Some(TopicMessage::JoinAllChannel {
                    team_id,
                    user_id,
                    enabled: !selected_options.is_empty(),
                })
            }
            (Action::SelectTrendNum, BlockAction::StaticSelect { selected_option, .. }) => {
                match selected_option {
                    Some(option) => {
                        let trend_num = option.value.parse::<i32>().map_err(|_| {
                            DomainError::UnsupportedPayload(format!(
                                "select_trend_num value is not a number: {}",
                                option.value
                            ))
                        })?;
                        Some(TopicMessage::SelectTrendNum {
                            team_id,
                            user_id,
                            trend_num,
                        })
                    }
                    None => None,
                }
            }
            (Action::JoinChannelButton, BlockAction::Button { value, .. }) => {
                let (Some(recommended), Some(channel), Some(message)) =
                    (value, &self.channel, &self.message)
                else {
                    return Err(DomainError::UnsupportedPayload(
                        "join_channel_button requires value, channel and message".to_string(),
                    ));
                };
                Some(TopicMessage::JoinChannelButton {
                    team_id,
                    channel_id: channel.id.clone(),
                    message_ts: message.ts.clone(),
                    recommended_channel_id: recommended.clone(),
                })
            }
            (known, other) => {
                return Err(DomainError::UnsupportedPayload(format!(
                    "{known} cannot come from a {} element",
                    other.kind()
                )));
            }
        };
        Ok(message)
    }

    /// Translate every action, stopping at the first malformed one
    pub fn topic_messages(&self) -> Result<Vec<TopicMessage>, DomainError> {
        let mut messages = Vec::with_capacity(self.actions.len());
        for action in &self.actions {
            if let Some(message) = self.topic_message(action)? {
                messages.push(message);
            }
        }
        Ok(messages)
    }
}
