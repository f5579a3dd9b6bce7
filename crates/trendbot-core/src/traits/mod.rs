//! Ports - traits implemented by the infrastructure crates

mod messaging;
mod repositories;
mod slack;

pub use messaging::{EventPublisher, OAuthStateStore, TaskQueue};
pub use repositories::{
    InstallationRepository, PostedTrendRepository, RecommendedChannelRepository, RepoResult,
    TrendAccumulatorRepository,
};
pub use slack::{OutgoingMessage, SlackApi, SlackResult};
