//! Service context - dependency container for services
//!
//! Holds the repositories and collaborator ports every service needs. All
//! dependencies are trait objects so tests can swap in in-memory fakes.

use std::sync::Arc;

use trendbot_core::traits::{
    EventPublisher, InstallationRepository, OAuthStateStore, PostedTrendRepository,
    RecommendedChannelRepository, SlackApi, TaskQueue, TrendAccumulatorRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Slack app settings the services need at runtime
#[derive(Debug, Clone, Default)]
pub struct ServiceSettings {
    pub client_id: String,
    pub scopes: Vec<String>,
    pub redirect_uri: String,
    /// Base of the OAuth authorize URL
    pub authorize_url: String,
    /// When set, periodic fan-out is limited to this workspace
    pub test_team_id: Option<String>,
}

impl ServiceSettings {
    pub const DEFAULT_AUTHORIZE_URL: &'static str = "https://slack.com/oauth/v2/authorize";

    pub fn from_config(config: &trendbot_common::AppConfig) -> Self {
        Self {
            client_id: config.slack.client_id.clone(),
            scopes: config.slack.scopes.clone(),
            redirect_uri: config.slack.redirect_uri.clone(),
            authorize_url: Self::DEFAULT_AUTHORIZE_URL.to_string(),
            test_team_id: config.test_team_id.clone(),
        }
    }
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    installations: Arc<dyn InstallationRepository>,
    posted_trends: Arc<dyn PostedTrendRepository>,
    recommended_channels: Arc<dyn RecommendedChannelRepository>,
    accumulators: Arc<dyn TrendAccumulatorRepository>,

    // Collaborators
    slack: Arc<dyn SlackApi>,
    publisher: Arc<dyn EventPublisher>,
    task_queue: Arc<dyn TaskQueue>,
    oauth_states: Arc<dyn OAuthStateStore>,

    settings: Arc<ServiceSettings>,
}

impl ServiceContext {
    /// Start a [`ServiceContextBuilder`]
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::new()
    }

    // === Repositories ===

    pub fn installations(&self) -> &dyn InstallationRepository {
        self.installations.as_ref()
    }

    pub fn posted_trends(&self) -> &dyn PostedTrendRepository {
        self.posted_trends.as_ref()
    }

    pub fn recommended_channels(&self) -> &dyn RecommendedChannelRepository {
        self.recommended_channels.as_ref()
    }

    pub fn accumulators(&self) -> &dyn TrendAccumulatorRepository {
        self.accumulators.as_ref()
    }

    // === Collaborators ===

    pub fn slack(&self) -> &dyn SlackApi {
        self.slack.as_ref()
    }

    pub fn publisher(&self) -> &dyn EventPublisher {
        self.publisher.as_ref()
    }

    pub fn task_queue(&self) -> &dyn TaskQueue {
        self.task_queue.as_ref()
    }

    pub fn oauth_states(&self) -> &dyn OAuthStateStore {
        self.oauth_states.as_ref()
    }

    pub fn settings(&self) -> &ServiceSettings {
        &self.settings
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("collaborators", &"...")
            .field("settings", &self.settings)
            .finish()
    }
}

/// Builder for [`ServiceContext`]
#[derive(Default)]
pub struct ServiceContextBuilder {
    installations: Option<Arc<dyn InstallationRepository>>,
    posted_trends: Option<Arc<dyn PostedTrendRepository>>,
    recommended_channels: Option<Arc<dyn RecommendedChannelRepository>>,
    accumulators: Option<Arc<dyn TrendAccumulatorRepository>>,
    slack: Option<Arc<dyn SlackApi>>,
    publisher: Option<Arc<dyn EventPublisher>>,
    task_queue: Option<Arc<dyn TaskQueue>>,
    oauth_states: Option<Arc<dyn OAuthStateStore>>,
    settings: ServiceSettings,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn installations(mut self, repo: Arc<dyn InstallationRepository>) -> Self {
        self.installations = Some(repo);
        self
    }

    pub fn posted_trends(mut self, repo: Arc<dyn PostedTrendRepository>) -> Self {
        self.posted_trends = Some(repo);
        self
    }

    pub fn recommended_channels(mut self, repo: Arc<dyn RecommendedChannelRepository>) -> Self {
        self.recommended_channels = Some(repo);
        self
    }

    pub fn accumulators(mut self, repo: Arc<dyn TrendAccumulatorRepository>) -> Self {
        self.accumulators = Some(repo);
        self
    }

    pub fn slack(mut self, slack: Arc<dyn SlackApi>) -> Self {
        self.slack = Some(slack);
        self
    }

    pub fn publisher(mut self, publisher: Arc<dyn EventPublisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    pub fn task_queue(mut self, queue: Arc<dyn TaskQueue>) -> Self {
        self.task_queue = Some(queue);
        self
    }

    pub fn oauth_states(mut self, store: Arc<dyn OAuthStateStore>) -> Self {
        self.oauth_states = Some(store);
        self
    }

    pub fn settings(mut self, settings: ServiceSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        fn required<T>(value: Option<T>, name: &str) -> ServiceResult<T> {
            value.ok_or_else(|| ServiceError::validation(format!("{name} is required")))
        }

        Ok(ServiceContext {
            installations: required(self.installations, "installations")?,
            posted_trends: required(self.posted_trends, "posted_trends")?,
            recommended_channels: required(self.recommended_channels, "recommended_channels")?,
            accumulators: required(self.accumulators, "accumulators")?,
            slack: required(self.slack, "slack")?,
            publisher: required(self.publisher, "publisher")?,
            task_queue: required(self.task_queue, "task_queue")?,
            oauth_states: required(self.oauth_states, "oauth_states")?,
            settings: Arc::new(self.settings),
        })
    }
}
