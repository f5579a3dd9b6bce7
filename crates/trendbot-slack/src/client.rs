//! reqwest-backed [`SlackApi`]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::instrument;

use trendbot_common::SlackConfig;
use trendbot_core::{
    ChannelInfo, DomainError, HistoryMessage, MessageTs, OAuthAccess, OutgoingMessage, SlackApi,
    SlackResult,
};

use crate::retry::{is_retryable_status, is_retryable_transport_error, parse_retry_after, retry_delay};
use crate::wire;

/// Page size for paginated list calls
const PAGE_LIMIT: u32 = 200;

/// Client settings
#[derive(Clone)]
pub struct SlackClientConfig {
    /// Web API root, without trailing slash
    pub api_base_url: String,
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub request_timeout: Duration,
    /// Total tries per call, including the first
    pub retry_max_attempts: usize,
    pub retry_base_delay_ms: u64,
}

impl From<&SlackConfig> for SlackClientConfig {
    fn from(config: &SlackConfig) -> Self {
        Self {
            api_base_url: config.api_base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            redirect_uri: config.redirect_uri.clone(),
            request_timeout: Duration::from_secs(30),
            retry_max_attempts: 3,
            retry_base_delay_ms: 500,
        }
    }
}

/// Slack Web API client shared by every workspace; tokens are passed per call
#[derive(Clone)]
pub struct SlackWebClient {
    http: reqwest::Client,
    config: SlackClientConfig,
}

impl SlackWebClient {
    pub fn new(config: SlackClientConfig) -> Result<Self, DomainError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| DomainError::InternalError(format!("slack http client: {e}")))?;
        Ok(Self {
            http,
            config: SlackClientConfig {
                retry_max_attempts: config.retry_max_attempts.max(1),
                ..config
            },
        })
    }

    fn url(&self, method: &str) -> String {
        format!("{}/{method}", self.config.api_base_url)
    }

    /// GET with query parameters
    async fn get<T: DeserializeOwned>(
        &self,
        method: &'static str,
        token: &str,
        query: &[(&str, &str)],
    ) -> SlackResult<T> {
        self.request(method, || {
            self.http.get(self.url(method)).bearer_auth(token).query(query)
        })
        .await
    }

    /// POST with a JSON body
    async fn post<T: DeserializeOwned>(
        &self,
        method: &'static str,
        token: &str,
        body: &Value,
    ) -> SlackResult<T> {
        self.request(method, || {
            self.http.post(self.url(method)).bearer_auth(token).json(body)
        })
        .await
    }

    async fn request<T, F>(&self, method: &'static str, builder: F) -> SlackResult<T>
    where
        T: DeserializeOwned,
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut attempt = 0_usize;
        loop {
            attempt += 1;
            match builder().send().await {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        let body: Value = response
                            .json()
                            .await
                            .map_err(|e| DomainError::slack(method, format!("invalid response: {e}")))?;
                        return parse_response(method, body);
                    }

                    if attempt < self.config.retry_max_attempts
                        && is_retryable_status(status.as_u16())
                    {
                        let delay = retry_delay(
                            self.config.retry_base_delay_ms,
                            attempt,
                            parse_retry_after(response.headers()),
                        );
                        tracing::warn!(method, status = status.as_u16(), ?delay, "Slack call throttled, retrying");
                        tokio::time::sleep(delay).await;
                        continue;
                    }

                    return Err(DomainError::slack(method, format!("http status {}", status.as_u16())));
                }
                Err(e) => {
                    if attempt < self.config.retry_max_attempts && is_retryable_transport_error(&e) {
                        let delay = retry_delay(self.config.retry_base_delay_ms, attempt, None);
                        tracing::warn!(method, error = %e, ?delay, "Slack call failed, retrying");
                        tokio::time::sleep(delay).await;
                        continue;
                    }
                    return Err(DomainError::slack(method, e.to_string()));
                }
            }
        }
    }
}

/// Check Slack's `ok` flag and decode the rest of the body
fn parse_response<T: DeserializeOwned>(method: &str, body: Value) -> SlackResult<T> {
    if body.get("ok").and_then(Value::as_bool) != Some(true) {
        let error = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown_error");
        return Err(DomainError::slack(method, error));
    }
    serde_json::from_value(body).map_err(|e| DomainError::slack(method, format!("invalid response: {e}")))
}

#[async_trait]
impl SlackApi for SlackWebClient {
    #[instrument(skip(self, token))]
    async fn list_public_channels(&self, token: &str) -> SlackResult<Vec<ChannelInfo>> {
        let limit = PAGE_LIMIT.to_string();
        let mut channels = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = vec![
                ("types", "public_channel"),
                ("exclude_archived", "true"),
                ("limit", limit.as_str()),
            ];
            if let Some(c) = cursor.as_deref() {
                query.push(("cursor", c));
            }

            let page: wire::ConversationsList = self.get("conversations.list", token, &query).await?;
            channels.extend(page.channels);

            match page.response_metadata.cursor() {
                Some(next) => cursor = Some(next.to_string()),
                None => break,
            }
        }

        tracing::debug!(count = channels.len(), "Listed public channels");
        Ok(channels)
    }

    #[instrument(skip(self, token))]
    async fn conversation_history(
        &self,
        token: &str,
        channel_id: &str,
        oldest: DateTime<Utc>,
    ) -> SlackResult<Vec<HistoryMessage>> {
        let oldest = oldest.timestamp().to_string();
        let limit = PAGE_LIMIT.to_string();
        let mut messages = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut query = vec![
                ("channel", channel_id),
                ("oldest", oldest.as_str()),
                ("inclusive", "true"),
                ("limit", limit.as_str()),
            ];
            if let Some(c) = cursor.as_deref() {
                query.push(("cursor", c));
            }

            let page: wire::ConversationsHistory =
                self.get("conversations.history", token, &query).await?;
            cursor = page.next_cursor().map(String::from);
            messages.extend(page.messages.into_iter().filter_map(wire::WireMessage::into_history));

            if cursor.is_none() {
                break;
            }
        }

        Ok(messages)
    }

    #[instrument(skip(self, token))]
    async fn get_permalink(&self, token: &str, channel_id: &str, ts: &MessageTs) -> SlackResult<String> {
        let response: wire::Permalink = self
            .get(
                "chat.getPermalink",
                token,
                &[("channel", channel_id), ("message_ts", ts.as_str())],
            )
            .await?;
        Ok(response.permalink)
    }

    #[instrument(skip(self, token, message), fields(channel_id = %message.channel))]
    async fn post_message(&self, token: &str, message: &OutgoingMessage) -> SlackResult<String> {
        let mut body = json!({
            "channel": message.channel,
            "text": message.text,
            "unfurl_links": message.unfurl_links,
        });
        if let Some(blocks) = &message.blocks {
            body["blocks"] = blocks.clone();
        }
        if let Some(attachments) = &message.attachments {
            body["attachments"] = attachments.clone();
        }

        let response: wire::PostedMessage = self.post("chat.postMessage", token, &body).await?;
        Ok(response.ts)
    }

    #[instrument(skip(self, token, text, blocks))]
    async fn update_message(
        &self,
        token: &str,
        channel_id: &str,
        ts: &str,
        text: &str,
        blocks: Option<&Value>,
    ) -> SlackResult<()> {
        let mut body = json!({
            "channel": channel_id,
            "ts": ts,
            "text": text,
        });
        // An empty block list clears the previous blocks
        body["blocks"] = blocks.cloned().unwrap_or_else(|| json!([]));

        let _: wire::Empty = self.post("chat.update", token, &body).await?;
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn join_channel(&self, token: &str, channel_id: &str) -> SlackResult<()> {
        let _: wire::Empty = self
            .post("conversations.join", token, &json!({ "channel": channel_id }))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn leave_channel(&self, token: &str, channel_id: &str) -> SlackResult<()> {
        let _: wire::Empty = self
            .post("conversations.leave", token, &json!({ "channel": channel_id }))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, token, view))]
    async fn publish_home_view(&self, token: &str, user_id: &str, view: &Value) -> SlackResult<()> {
        let _: wire::Empty = self
            .post("views.publish", token, &json!({ "user_id": user_id, "view": view }))
            .await?;
        Ok(())
    }

    #[instrument(skip(self, code))]
    async fn exchange_oauth_code(&self, code: &str) -> SlackResult<OAuthAccess> {
        let method = "oauth.v2.access";
        let form = [
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
        ];
        let access: wire::OAuthV2Access = self
            .request(method, || self.http.post(self.url(method)).form(&form))
            .await?;

        tracing::info!(team_id = %access.team.id, "Exchanged OAuth code");
        Ok(access.into())
    }
}
