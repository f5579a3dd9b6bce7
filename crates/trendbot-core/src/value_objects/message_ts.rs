//! Slack message timestamp
//!
//! Slack identifies a message within a channel by a decimal string such as
//! `"1712345678.000200"`: Unix seconds, a dot, and a sub-second sequence.
//! The string form is the identity; the numeric form is only used for age
//! comparisons.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Slack message timestamp (`ts`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MessageTs(String);

impl MessageTs {
    /// Parse and validate a timestamp string
    pub fn parse(s: &str) -> Result<Self, MessageTsParseError> {
        let (secs, frac) = match s.split_once('.') {
            Some((secs, frac)) => (secs, Some(frac)),
            None => (s, None),
        };

        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if !all_digits(secs) || frac.is_some_and(|f| !all_digits(f)) {
            return Err(MessageTsParseError::InvalidFormat(s.to_string()));
        }

        Ok(Self(s.to_string()))
    }

    /// Get the raw string form
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value in seconds, including the fractional part
    pub fn as_secs_f64(&self) -> f64 {
        // Validated on construction, so this cannot fail for well-formed values
        self.0.parse::<f64>().unwrap_or(0.0)
    }

    /// Check whether this message was posted strictly after `cutoff`
    pub fn is_newer_than(&self, cutoff: DateTime<Utc>) -> bool {
        self.as_secs_f64() > cutoff.timestamp() as f64
    }
}

/// Error when parsing a message timestamp
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MessageTsParseError {
    #[error("invalid message timestamp: {0}")]
    InvalidFormat(String),
}

impl fmt::Display for MessageTs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for MessageTs {
    type Err = MessageTsParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MessageTs::parse(s)
    }
}

impl TryFrom<String> for MessageTs {
    type Error = MessageTsParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        MessageTs::parse(&value)
    }
}

impl From<MessageTs> for String {
    fn from(ts: MessageTs) -> Self {
        ts.0
    }
}
