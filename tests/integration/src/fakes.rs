//! In-memory fakes of the ports
//!
//! Each fake records what the services did to it so tests can assert on the
//! calls as well as on the resulting state.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde_json::Value;

use trendbot_core::entities::DEFAULT_TREND_NUM;
use trendbot_core::traits::{
    EventPublisher, InstallationRepository, OAuthStateStore, OutgoingMessage,
    PostedTrendRepository, RecommendedChannelRepository, RepoResult, SlackApi, SlackResult,
    TaskQueue, TrendAccumulatorRepository,
};
use trendbot_core::{
    ChannelInfo, DomainError, HistoryMessage, InstallOutcome, Installation, MessageTs,
    NewInstallation, OAuthAccess, PostedMessage, TaskPayload, TopicMessage, TrendMessage,
    TrendPeriod,
};

// ============================================================================
// Store
// ============================================================================

#[derive(Default)]
struct StoreState {
    installations: HashMap<String, Installation>,
    posted: HashMap<String, Vec<PostedMessage>>,
    recommended: HashMap<String, Vec<String>>,
    accumulators: HashMap<(String, TrendPeriod), Vec<TrendMessage>>,
}

/// All four repositories over one in-memory map set
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an installation directly
    pub fn insert(&self, installation: Installation) {
        self.state
            .lock()
            .installations
            .insert(installation.team_id.clone(), installation);
    }

    pub fn installation(&self, team_id: &str) -> Option<Installation> {
        self.state.lock().installations.get(team_id).cloned()
    }

    pub fn posted(&self, team_id: &str) -> Vec<PostedMessage> {
        self.state.lock().posted.get(team_id).cloned().unwrap_or_default()
    }

    pub fn set_posted(&self, team_id: &str, posted: Vec<PostedMessage>) {
        self.state.lock().posted.insert(team_id.to_string(), posted);
    }

    pub fn recommended(&self, team_id: &str) -> Vec<String> {
        self.state
            .lock()
            .recommended
            .get(team_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_recommended(&self, team_id: &str, channel_ids: Vec<String>) {
        self.state
            .lock()
            .recommended
            .insert(team_id.to_string(), channel_ids);
    }

    pub fn accumulated(&self, team_id: &str, period: TrendPeriod) -> Vec<TrendMessage> {
        self.state
            .lock()
            .accumulators
            .get(&(team_id.to_string(), period))
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_accumulated(&self, team_id: &str, period: TrendPeriod, messages: Vec<TrendMessage>) {
        self.state
            .lock()
            .accumulators
            .insert((team_id.to_string(), period), messages);
    }

    fn update(&self, team_id: &str, apply: impl FnOnce(&mut Installation)) -> RepoResult<()> {
        let mut state = self.state.lock();
        let installation = state
            .installations
            .get_mut(team_id)
            .ok_or_else(|| DomainError::InstallationNotFound(team_id.to_string()))?;
        apply(installation);
        installation.updated_at = Utc::now();
        Ok(())
    }
}

#[async_trait]
impl InstallationRepository for InMemoryStore {
    async fn find_by_team(&self, team_id: &str) -> RepoResult<Option<Installation>> {
        Ok(self.installation(team_id))
    }

    async fn list_all(&self) -> RepoResult<Vec<Installation>> {
        let mut all: Vec<Installation> = self.state.lock().installations.values().cloned().collect();
        all.sort_by(|a, b| a.team_id.cmp(&b.team_id));
        Ok(all)
    }

    async fn list_with_target_channel(&self) -> RepoResult<Vec<Installation>> {
        let all = self.list_all().await?;
        Ok(all
            .into_iter()
            .filter(|i| i.target_channel().is_some())
            .collect())
    }

    async fn save_install(&self, install: &NewInstallation) -> RepoResult<InstallOutcome> {
        let now = Utc::now();
        let mut state = self.state.lock();
        let first_install = !state.installations.contains_key(&install.team_id);

        let installation = state
            .installations
            .entry(install.team_id.clone())
            .or_insert_with(|| Installation {
                team_id: install.team_id.clone(),
                team_name: None,
                bot_token: String::new(),
                bot_user_id: String::new(),
                bot_id: None,
                scopes: Vec::new(),
                installer_user_id: None,
                target_channel_id: None,
                joined_channel_ids: None,
                is_all_public_channel: false,
                selected_trend_num: DEFAULT_TREND_NUM,
                created_at: now,
                updated_at: now,
            });
        installation.team_name.clone_from(&install.team_name);
        installation.bot_token.clone_from(&install.bot_token);
        installation.bot_user_id.clone_from(&install.bot_user_id);
        installation.bot_id.clone_from(&install.bot_id);
        installation.scopes.clone_from(&install.scopes);
        installation.installer_user_id.clone_from(&install.installer_user_id);
        installation.updated_at = now;

        Ok(InstallOutcome {
            installation: installation.clone(),
            first_install,
        })
    }

    async fn set_target_channel(&self, team_id: &str, channel_id: &str) -> RepoResult<()> {
        self.update(team_id, |i| i.target_channel_id = Some(channel_id.to_string()))
    }

    async fn set_joined_channels(&self, team_id: &str, channel_ids: &[String]) -> RepoResult<()> {
        self.update(team_id, |i| {
            i.joined_channel_ids = Some(channel_ids.to_vec());
            i.is_all_public_channel = false;
        })
    }

    async fn set_all_public_channel(&self, team_id: &str, enabled: bool) -> RepoResult<()> {
        self.update(team_id, |i| i.is_all_public_channel = enabled)
    }

    async fn set_trend_num(&self, team_id: &str, trend_num: i32) -> RepoResult<()> {
        self.update(team_id, |i| i.selected_trend_num = trend_num)
    }

    async fn delete(&self, team_id: &str) -> RepoResult<bool> {
        Ok(self.state.lock().installations.remove(team_id).is_some())
    }
}

#[async_trait]
impl PostedTrendRepository for InMemoryStore {
    async fn get(&self, team_id: &str) -> RepoResult<Vec<PostedMessage>> {
        Ok(self.posted(team_id))
    }

    async fn replace(&self, team_id: &str, posted: &[PostedMessage]) -> RepoResult<()> {
        self.set_posted(team_id, posted.to_vec());
        Ok(())
    }

    async fn delete(&self, team_id: &str) -> RepoResult<()> {
        self.state.lock().posted.remove(team_id);
        Ok(())
    }
}

#[async_trait]
impl RecommendedChannelRepository for InMemoryStore {
    async fn get(&self, team_id: &str) -> RepoResult<Vec<String>> {
        Ok(self.recommended(team_id))
    }

    async fn replace(&self, team_id: &str, channel_ids: &[String]) -> RepoResult<()> {
        self.set_recommended(team_id, channel_ids.to_vec());
        Ok(())
    }

    async fn delete(&self, team_id: &str) -> RepoResult<()> {
        self.state.lock().recommended.remove(team_id);
        Ok(())
    }
}

#[async_trait]
impl TrendAccumulatorRepository for InMemoryStore {
    async fn get(&self, team_id: &str, period: TrendPeriod) -> RepoResult<Vec<TrendMessage>> {
        Ok(self.accumulated(team_id, period))
    }

    async fn append(&self, team_id: &str, period: TrendPeriod, messages: &[TrendMessage]) -> RepoResult<()> {
        let mut state = self.state.lock();
        let held = state.accumulators.entry((team_id.to_string(), period)).or_default();
        for message in messages {
            if !held.iter().any(|m| m.key() == message.key()) {
                held.push(message.clone());
            }
        }
        Ok(())
    }

    async fn clear(&self, team_id: &str, period: TrendPeriod) -> RepoResult<()> {
        self.state
            .lock()
            .accumulators
            .remove(&(team_id.to_string(), period));
        Ok(())
    }

    async fn delete_team(&self, team_id: &str) -> RepoResult<()> {
        self.state
            .lock()
            .accumulators
            .retain(|(team, _), _| team != team_id);
        Ok(())
    }
}

// ============================================================================
// Slack
// ============================================================================

/// A `chat.update` call
#[derive(Debug, Clone, PartialEq)]
pub struct MessageUpdate {
    pub channel_id: String,
    pub ts: String,
    pub text: String,
    pub blocks: Option<Value>,
}

#[derive(Default)]
struct SlackState {
    channels: Vec<ChannelInfo>,
    history: HashMap<String, Vec<HistoryMessage>>,
    history_requests: Vec<(String, DateTime<Utc>)>,
    permalink_failures: HashSet<String>,
    join_failures: HashSet<String>,
    enforce_membership: bool,
    posted: Vec<OutgoingMessage>,
    updates: Vec<MessageUpdate>,
    joined: Vec<String>,
    left: Vec<String>,
    home_views: Vec<(String, Value)>,
    oauth_access: Option<OAuthAccess>,
    message_counter: u64,
}

/// Scripted Slack workspace
#[derive(Default)]
pub struct FakeSlack {
    state: Mutex<SlackState>,
}

impl FakeSlack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_channels(&self, channels: Vec<ChannelInfo>) {
        self.state.lock().channels = channels;
    }

    pub fn channels(&self) -> Vec<ChannelInfo> {
        self.state.lock().channels.clone()
    }

    pub fn set_history(&self, channel_id: &str, messages: Vec<HistoryMessage>) {
        self.state
            .lock()
            .history
            .insert(channel_id.to_string(), messages);
    }

    /// Make `chat.getPermalink` fail for a channel
    pub fn fail_permalink(&self, channel_id: &str) {
        self.state
            .lock()
            .permalink_failures
            .insert(channel_id.to_string());
    }

    /// Make `conversations.join` fail for a channel
    pub fn fail_join(&self, channel_id: &str) {
        self.state.lock().join_failures.insert(channel_id.to_string());
    }

    /// Make `chat.postMessage` fail with `not_in_channel` outside member channels
    pub fn enforce_membership(&self) {
        self.state.lock().enforce_membership = true;
    }

    pub fn set_oauth_access(&self, access: OAuthAccess) {
        self.state.lock().oauth_access = Some(access);
    }

    pub fn posted(&self) -> Vec<OutgoingMessage> {
        self.state.lock().posted.clone()
    }

    pub fn posted_texts(&self) -> Vec<String> {
        self.state.lock().posted.iter().map(|m| m.text.clone()).collect()
    }

    pub fn updates(&self) -> Vec<MessageUpdate> {
        self.state.lock().updates.clone()
    }

    pub fn joined(&self) -> Vec<String> {
        self.state.lock().joined.clone()
    }

    pub fn left(&self) -> Vec<String> {
        self.state.lock().left.clone()
    }

    pub fn home_views(&self) -> Vec<(String, Value)> {
        self.state.lock().home_views.clone()
    }

    pub fn history_requests(&self) -> Vec<(String, DateTime<Utc>)> {
        self.state.lock().history_requests.clone()
    }

    fn set_membership(&self, channel_id: &str, is_member: bool) {
        let mut state = self.state.lock();
        if let Some(channel) = state.channels.iter_mut().find(|c| c.id == channel_id) {
            channel.is_member = is_member;
        }
    }
}

#[async_trait]
impl SlackApi for FakeSlack {
    async fn list_public_channels(&self, _token: &str) -> SlackResult<Vec<ChannelInfo>> {
        Ok(self.channels())
    }

    async fn conversation_history(
        &self,
        _token: &str,
        channel_id: &str,
        oldest: DateTime<Utc>,
    ) -> SlackResult<Vec<HistoryMessage>> {
        let mut state = self.state.lock();
        state.history_requests.push((channel_id.to_string(), oldest));
        Ok(state.history.get(channel_id).cloned().unwrap_or_default())
    }

    async fn get_permalink(&self, _token: &str, channel_id: &str, ts: &MessageTs) -> SlackResult<String> {
        if self.state.lock().permalink_failures.contains(channel_id) {
            return Err(DomainError::slack("chat.getPermalink", "message_not_found"));
        }
        Ok(format!(
            "https://example.slack.com/archives/{channel_id}/p{}",
            ts.as_str().replace('.', "")
        ))
    }

    async fn post_message(&self, _token: &str, message: &OutgoingMessage) -> SlackResult<String> {
        let mut state = self.state.lock();
        let is_member = state
            .channels
            .iter()
            .any(|c| c.id == message.channel && c.is_member);
        if state.enforce_membership && !is_member {
            return Err(DomainError::slack("chat.postMessage", "not_in_channel"));
        }
        state.message_counter += 1;
        state.posted.push(message.clone());
        Ok(format!("1700000000.{:06}", state.message_counter))
    }

    async fn update_message(
        &self,
        _token: &str,
        channel_id: &str,
        ts: &str,
        text: &str,
        blocks: Option<&Value>,
    ) -> SlackResult<()> {
        self.state.lock().updates.push(MessageUpdate {
            channel_id: channel_id.to_string(),
            ts: ts.to_string(),
            text: text.to_string(),
            blocks: blocks.cloned(),
        });
        Ok(())
    }

    async fn join_channel(&self, _token: &str, channel_id: &str) -> SlackResult<()> {
        if self.state.lock().join_failures.contains(channel_id) {
            return Err(DomainError::slack("conversations.join", "is_archived"));
        }
        self.state.lock().joined.push(channel_id.to_string());
        self.set_membership(channel_id, true);
        Ok(())
    }

    async fn leave_channel(&self, _token: &str, channel_id: &str) -> SlackResult<()> {
        self.state.lock().left.push(channel_id.to_string());
        self.set_membership(channel_id, false);
        Ok(())
    }

    async fn publish_home_view(&self, _token: &str, user_id: &str, view: &Value) -> SlackResult<()> {
        self.state
            .lock()
            .home_views
            .push((user_id.to_string(), view.clone()));
        Ok(())
    }

    async fn exchange_oauth_code(&self, code: &str) -> SlackResult<OAuthAccess> {
        self.state
            .lock()
            .oauth_access
            .clone()
            .filter(|_| code != "bad-code")
            .ok_or_else(|| DomainError::slack("oauth.v2.access", "invalid_code"))
    }
}

// ============================================================================
// Messaging
// ============================================================================

/// Records published topic messages
#[derive(Default)]
pub struct FakePublisher {
    published: Mutex<Vec<TopicMessage>>,
}

impl FakePublisher {
    pub fn published(&self) -> Vec<TopicMessage> {
        self.published.lock().clone()
    }
}

#[async_trait]
impl EventPublisher for FakePublisher {
    async fn publish(&self, message: &TopicMessage) -> Result<(), DomainError> {
        self.published.lock().push(message.clone());
        Ok(())
    }
}

/// Records enqueued tasks with their execution time
#[derive(Default)]
pub struct FakeTaskQueue {
    tasks: Mutex<Vec<(DateTime<Utc>, TaskPayload)>>,
}

impl FakeTaskQueue {
    pub fn tasks(&self) -> Vec<(DateTime<Utc>, TaskPayload)> {
        self.tasks.lock().clone()
    }
}

#[async_trait]
impl TaskQueue for FakeTaskQueue {
    async fn enqueue(&self, task: &TaskPayload, execute_at: DateTime<Utc>) -> Result<(), DomainError> {
        self.tasks.lock().push((execute_at, task.clone()));
        Ok(())
    }
}

/// Single-use OAuth state tokens
#[derive(Default)]
pub struct FakeOAuthStates {
    states: Mutex<HashSet<String>>,
}

impl FakeOAuthStates {
    pub fn contains(&self, state: &str) -> bool {
        self.states.lock().contains(state)
    }

    pub fn len(&self) -> usize {
        self.states.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.lock().is_empty()
    }
}

#[async_trait]
impl OAuthStateStore for FakeOAuthStates {
    async fn save(&self, state: &str) -> Result<(), DomainError> {
        self.states.lock().insert(state.to_string());
        Ok(())
    }

    async fn consume(&self, state: &str) -> Result<bool, DomainError> {
        Ok(self.states.lock().remove(state))
    }
}
