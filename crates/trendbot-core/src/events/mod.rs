//! Messages that cross process boundaries
//!
//! - [`TopicMessage`]: fan-out messages published to a pub/sub topic
//! - [`TaskPayload`]: bodies of delayed HTTP task callbacks, one per [`Queue`]
//! - [`InteractivePayload`]: Slack interactive-component callbacks
//! - [`EventEnvelope`]: Slack Events API callbacks
//!
//! Each is a closed enum shared by the producing and consuming side.

mod interactive;
mod queue;
mod slack_event;
mod topic;

pub use interactive::{
    Action, BlockAction, BlockActionsPayload, ChannelRef, InteractivePayload, MessageRef,
    SelectedOption, TeamRef, UserRef,
};
pub use queue::{ChannelBatchBody, FirstMessageBody, Queue, TaskPayload, TeamBody};
pub use slack_event::{CreatedChannel, EmojiSubtype, EventEnvelope, SlackEvent};
pub use topic::{Topic, TopicMessage};
