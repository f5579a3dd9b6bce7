//! Delayed task queues and their callback bodies
//!
//! A task body travels as plain JSON and is addressed by its queue name, which
//! appears both in the callback path and the `x-task-queue-name` header.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;

use crate::entities::TrendPeriod;
use crate::error::DomainError;

/// Named task queues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Queue {
    JoinChannel,
    PostTrendMessage,
    CountWeeklyTrendMessage,
    CountMonthlyTrendMessage,
    PostWeeklyTrendMessage,
    PostMonthlyTrendMessage,
    SendFirstMessage,
}

impl Queue {
    pub const ALL: [Queue; 7] = [
        Queue::JoinChannel,
        Queue::PostTrendMessage,
        Queue::CountWeeklyTrendMessage,
        Queue::CountMonthlyTrendMessage,
        Queue::PostWeeklyTrendMessage,
        Queue::PostMonthlyTrendMessage,
        Queue::SendFirstMessage,
    ];

    /// Queue name as used in paths and headers
    pub fn as_str(self) -> &'static str {
        match self {
            Self::JoinChannel => "join-channel",
            Self::PostTrendMessage => "post-trend-message",
            Self::CountWeeklyTrendMessage => "count-weekly-trend-message",
            Self::CountMonthlyTrendMessage => "count-monthly-trend-message",
            Self::PostWeeklyTrendMessage => "post-weekly-trend-message",
            Self::PostMonthlyTrendMessage => "post-monthly-trend-message",
            Self::SendFirstMessage => "send-first-message",
        }
    }

    /// Whether redelivered tasks on this queue are dropped.
    ///
    /// Posting queues must not announce twice.
    pub fn ignores_retries(self) -> bool {
        matches!(
            self,
            Self::PostTrendMessage
                | Self::PostWeeklyTrendMessage
                | Self::PostMonthlyTrendMessage
                | Self::SendFirstMessage
        )
    }

    /// Counting queue for a digest period
    pub fn count_for(period: TrendPeriod) -> Self {
        match period {
            TrendPeriod::Weekly => Self::CountWeeklyTrendMessage,
            TrendPeriod::Monthly => Self::CountMonthlyTrendMessage,
        }
    }

    /// Posting queue for a digest period
    pub fn post_for(period: TrendPeriod) -> Self {
        match period {
            TrendPeriod::Weekly => Self::PostWeeklyTrendMessage,
            TrendPeriod::Monthly => Self::PostMonthlyTrendMessage,
        }
    }
}

impl fmt::Display for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Queue {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Queue::ALL
            .into_iter()
            .find(|q| q.as_str() == s)
            .ok_or_else(|| DomainError::UnsupportedPayload(format!("unknown queue: {s}")))
    }
}

/// Body carrying a batch of channels for one workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelBatchBody {
    pub team_id: String,
    pub channel_ids: Vec<String>,
}

/// Body naming only a workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamBody {
    pub team_id: String,
}

/// Body for the post-install welcome message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirstMessageBody {
    pub team_id: String,
    pub user_id: String,
}

/// A task addressed to exactly one queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPayload {
    JoinChannel(ChannelBatchBody),
    PostTrendMessage(ChannelBatchBody),
    CountWeeklyTrendMessage(ChannelBatchBody),
    CountMonthlyTrendMessage(ChannelBatchBody),
    PostWeeklyTrendMessage(TeamBody),
    PostMonthlyTrendMessage(TeamBody),
    SendFirstMessage(FirstMessageBody),
}

impl TaskPayload {
    /// Counting task for a digest period
    pub fn count_trend(period: TrendPeriod, body: ChannelBatchBody) -> Self {
        match period {
            TrendPeriod::Weekly => Self::CountWeeklyTrendMessage(body),
            TrendPeriod::Monthly => Self::CountMonthlyTrendMessage(body),
        }
    }

    /// Digest posting task for a digest period
    pub fn post_digest(period: TrendPeriod, team_id: impl Into<String>) -> Self {
        let body = TeamBody {
            team_id: team_id.into(),
        };
        match period {
            TrendPeriod::Weekly => Self::PostWeeklyTrendMessage(body),
            TrendPeriod::Monthly => Self::PostMonthlyTrendMessage(body),
        }
    }

    /// Queue this task is delivered on
    pub fn queue(&self) -> Queue {
        match self {
            Self::JoinChannel(_) => Queue::JoinChannel,
            Self::PostTrendMessage(_) => Queue::PostTrendMessage,
            Self::CountWeeklyTrendMessage(_) => Queue::CountWeeklyTrendMessage,
            Self::CountMonthlyTrendMessage(_) => Queue::CountMonthlyTrendMessage,
            Self::PostWeeklyTrendMessage(_) => Queue::PostWeeklyTrendMessage,
            Self::PostMonthlyTrendMessage(_) => Queue::PostMonthlyTrendMessage,
            Self::SendFirstMessage(_) => Queue::SendFirstMessage,
        }
    }

    /// Workspace the task is for
    pub fn team_id(&self) -> &str {
        match self {
            Self::JoinChannel(b)
            | Self::PostTrendMessage(b)
            | Self::CountWeeklyTrendMessage(b)
            | Self::CountMonthlyTrendMessage(b) => &b.team_id,
            Self::PostWeeklyTrendMessage(b) | Self::PostMonthlyTrendMessage(b) => &b.team_id,
            Self::SendFirstMessage(b) => &b.team_id,
        }
    }

    /// Serialize the callback body
    pub fn to_body(&self) -> Result<Vec<u8>, DomainError> {
        let result = match self {
            Self::JoinChannel(b)
            | Self::PostTrendMessage(b)
            | Self::CountWeeklyTrendMessage(b)
            | Self::CountMonthlyTrendMessage(b) => serde_json::to_vec(b),
            Self::PostWeeklyTrendMessage(b) | Self::PostMonthlyTrendMessage(b) => {
                serde_json::to_vec(b)
            }
            Self::SendFirstMessage(b) => serde_json::to_vec(b),
        };
        result.map_err(|e| DomainError::InternalError(format!("task body: {e}")))
    }

    /// Parse a callback body delivered on `queue`
    pub fn from_body(queue: Queue, body: &[u8]) -> Result<Self, DomainError> {
        Ok(match queue {
            Queue::JoinChannel => Self::JoinChannel(parse(queue, body)?),
            Queue::PostTrendMessage => Self::PostTrendMessage(parse(queue, body)?),
            Queue::CountWeeklyTrendMessage => Self::CountWeeklyTrendMessage(parse(queue, body)?),
            Queue::CountMonthlyTrendMessage => Self::CountMonthlyTrendMessage(parse(queue, body)?),
            Queue::PostWeeklyTrendMessage => Self::PostWeeklyTrendMessage(parse(queue, body)?),
            Queue::PostMonthlyTrendMessage => Self::PostMonthlyTrendMessage(parse(queue, body)?),
            Queue::SendFirstMessage => Self::SendFirstMessage(parse(queue, body)?),
        })
    }
}

fn parse<T: DeserializeOwned>(queue: Queue, body: &[u8]) -> Result<T, DomainError> {
    serde_json::from_slice(body)
        .map_err(|e| DomainError::UnsupportedPayload(format!("{queue} body: {e}")))
}
