//! Value objects - immutable types that represent domain concepts

mod message_ts;

pub use message_ts::{MessageTs, MessageTsParseError};
