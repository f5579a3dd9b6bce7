//! Repository traits (ports) - define the interface for data access
//!
//! Every record is keyed by team ID. The domain layer defines what it needs,
//! and the infrastructure layer provides the implementation.

use async_trait::async_trait;

use crate::entities::{InstallOutcome, Installation, NewInstallation, PostedMessage, TrendMessage, TrendPeriod};
use crate::error::DomainError;

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Installation Repository
// ============================================================================

#[async_trait]
pub trait InstallationRepository: Send + Sync {
    /// Find the installation for a workspace
    async fn find_by_team(&self, team_id: &str) -> RepoResult<Option<Installation>>;

    /// List every installation
    async fn list_all(&self) -> RepoResult<Vec<Installation>>;

    /// List installations that have chosen a target channel
    async fn list_with_target_channel(&self) -> RepoResult<Vec<Installation>>;

    /// Insert or refresh credentials.
    ///
    /// `created_at` is set only on first install; user-configured fields survive a reinstall.
    async fn save_install(&self, install: &NewInstallation) -> RepoResult<InstallOutcome>;

    /// Set the announcement channel
    async fn set_target_channel(&self, team_id: &str, channel_id: &str) -> RepoResult<()>;

    /// Record explicitly joined channels and leave auto-join-all mode
    async fn set_joined_channels(&self, team_id: &str, channel_ids: &[String]) -> RepoResult<()>;

    /// Toggle auto-join-all mode
    async fn set_all_public_channel(&self, team_id: &str, enabled: bool) -> RepoResult<()>;

    /// Set the trend threshold
    async fn set_trend_num(&self, team_id: &str, trend_num: i32) -> RepoResult<()>;

    /// Delete an installation; returns whether a row existed
    async fn delete(&self, team_id: &str) -> RepoResult<bool>;
}

// ============================================================================
// Posted Trend Repository
// ============================================================================

#[async_trait]
pub trait PostedTrendRepository: Send + Sync {
    /// Messages already announced, oldest first
    async fn get(&self, team_id: &str) -> RepoResult<Vec<PostedMessage>>;

    /// Replace the dedupe set
    async fn replace(&self, team_id: &str, posted: &[PostedMessage]) -> RepoResult<()>;

    async fn delete(&self, team_id: &str) -> RepoResult<()>;
}

// ============================================================================
// Recommended Channel Repository
// ============================================================================

#[async_trait]
pub trait RecommendedChannelRepository: Send + Sync {
    /// Channels already recommended
    async fn get(&self, team_id: &str) -> RepoResult<Vec<String>>;

    async fn replace(&self, team_id: &str, channel_ids: &[String]) -> RepoResult<()>;

    async fn delete(&self, team_id: &str) -> RepoResult<()>;
}

// ============================================================================
// Trend Accumulator Repository
// ============================================================================

#[async_trait]
pub trait TrendAccumulatorRepository: Send + Sync {
    /// Candidates gathered so far in the period
    async fn get(&self, team_id: &str, period: TrendPeriod) -> RepoResult<Vec<TrendMessage>>;

    /// Append candidates from one batched scan
    async fn append(&self, team_id: &str, period: TrendPeriod, messages: &[TrendMessage]) -> RepoResult<()>;

    /// Empty the accumulator after the digest is posted
    async fn clear(&self, team_id: &str, period: TrendPeriod) -> RepoResult<()>;

    /// Remove both periods for a workspace
    async fn delete_team(&self, team_id: &str) -> RepoResult<()>;
}
