//! # trendbot-core
//!
//! Domain layer containing entities, value objects, the message enums shared
//! between publishers and subscribers, port traits, and the trend algorithms.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod events;
pub mod traits;
pub mod trend;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    ChannelInfo, HistoryMessage, InstallOutcome, Installation, NewInstallation, OAuthAccess,
    PostedMessage, Reaction, TrendMessage, TrendPeriod,
};
pub use error::DomainError;
pub use events::{Action, EventEnvelope, InteractivePayload, Queue, SlackEvent, TaskPayload, Topic, TopicMessage};
pub use traits::{
    EventPublisher, InstallationRepository, OAuthStateStore, OutgoingMessage,
    PostedTrendRepository, RecommendedChannelRepository, RepoResult, SlackApi, SlackResult,
    TaskQueue, TrendAccumulatorRepository,
};
pub use value_objects::{MessageTs, MessageTsParseError};
