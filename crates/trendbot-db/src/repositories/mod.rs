//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in trendbot-core.
//! Every table is keyed by Slack team ID.

mod error;
mod installation;
mod posted_trend;
mod recommended_channel;
mod trend_accumulator;

pub use installation::PgInstallationRepository;
pub use posted_trend::PgPostedTrendRepository;
pub use recommended_channel::PgRecommendedChannelRepository;
pub use trend_accumulator::PgTrendAccumulatorRepository;
