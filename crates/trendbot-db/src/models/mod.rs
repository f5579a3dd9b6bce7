//! Database models - SQLx-compatible structs for PostgreSQL tables

mod installation;
mod trend;

pub use installation::{InstallationModel, InstallationUpsertModel};
pub use trend::{AccumulatorModel, PostedTrendsModel, RecommendedChannelsModel};
