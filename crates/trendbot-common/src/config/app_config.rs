//! Application configuration structs
//!
//! Loads configuration from environment variables (and a `.env` file when present).

use serde::Deserialize;
use std::env;
use std::str::FromStr;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub api: ServerConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub slack: SlackConfig,
    pub task_queue: TaskQueueConfig,
    pub schedule: ScheduleConfig,
    pub rate_limit: RateLimitConfig,
    /// When set, periodic triggers only fan out to this workspace
    #[serde(default)]
    pub test_team_id: Option<String>,
}

/// General application settings
#[derive(Debug, Clone, Deserialize)]
pub struct AppSettings {
    #[serde(default = "default_app_name")]
    pub name: String,
    #[serde(default)]
    pub env: Environment,
}

/// Environment type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    #[must_use]
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    #[must_use]
    pub fn is_development(&self) -> bool {
        matches!(self, Self::Development)
    }

    fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "production" => Some(Self::Production),
            "staging" => Some(Self::Staging),
            "development" => Some(Self::Development),
            _ => None,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

/// Redis configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RedisConfig {
    pub url: String,
    #[serde(default = "default_redis_max_connections")]
    pub max_connections: u32,
}

/// Slack app credentials and endpoints
#[derive(Clone, Deserialize)]
pub struct SlackConfig {
    pub client_id: String,
    pub client_secret: String,
    pub signing_secret: String,
    pub redirect_uri: String,
    #[serde(default = "default_slack_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_slack_scopes")]
    pub scopes: Vec<String>,
    /// Lifetime of a pending OAuth state token
    #[serde(default = "default_oauth_state_ttl")]
    pub oauth_state_ttl_seconds: u64,
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[redacted]")
            .field("signing_secret", &"[redacted]")
            .field("redirect_uri", &self.redirect_uri)
            .field("api_base_url", &self.api_base_url)
            .field("scopes", &self.scopes)
            .field("oauth_state_ttl_seconds", &self.oauth_state_ttl_seconds)
            .finish()
    }
}

/// Delayed task queue configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TaskQueueConfig {
    /// Base URL task callbacks are POSTed to (`{base}/tasks/{queue}`)
    pub base_url: String,
    #[serde(default = "default_task_queue_key")]
    pub key: String,
    #[serde(default = "default_task_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_task_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_task_retry_delay")]
    pub retry_delay_seconds: u64,
}

/// Cron triggers (six-field expressions, seconds first)
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_timezone")]
    pub timezone: String,
    #[serde(default = "default_hourly_cron")]
    pub hourly: String,
    #[serde(default = "default_weekly_cron")]
    pub weekly: String,
    #[serde(default = "default_monthly_cron")]
    pub monthly: String,
    #[serde(default = "default_recommend_cron")]
    pub recommend: String,
    #[serde(default = "default_prune_cron")]
    pub prune: String,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timezone: default_timezone(),
            hourly: default_hourly_cron(),
            weekly: default_weekly_cron(),
            monthly: default_monthly_cron(),
            recommend: default_recommend_cron(),
            prune: default_prune_cron(),
        }
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: u32,
    #[serde(default = "default_burst")]
    pub burst: u32,
}

// Default value functions
fn default_app_name() -> String {
    "trendbot".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    2
}

fn default_redis_max_connections() -> u32 {
    10
}

fn default_slack_api_base_url() -> String {
    "https://slack.com/api".to_string()
}

fn default_slack_scopes() -> Vec<String> {
    [
        "channels:history",
        "channels:join",
        "channels:read",
        "chat:write",
        "emoji:read",
        "reactions:read",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_oauth_state_ttl() -> u64 {
    600 // 10 minutes
}

fn default_task_queue_key() -> String {
    "trendbot:tasks".to_string()
}

fn default_task_poll_interval_ms() -> u64 {
    1000
}

fn default_task_max_attempts() -> u32 {
    5
}

fn default_task_retry_delay() -> u64 {
    60
}

fn default_true() -> bool {
    true
}

fn default_timezone() -> String {
    "UTC".to_string()
}

fn default_hourly_cron() -> String {
    "0 0 * * * *".to_string()
}

fn default_weekly_cron() -> String {
    "0 0 9 * * Mon".to_string()
}

fn default_monthly_cron() -> String {
    "0 0 9 1 * *".to_string()
}

fn default_recommend_cron() -> String {
    "0 0 8 * * Mon".to_string()
}

fn default_prune_cron() -> String {
    "0 30 3 * * *".to_string()
}

fn default_requests_per_second() -> u32 {
    10
}

fn default_burst() -> u32 {
    50
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or(ConfigError::MissingVar(name))
}

fn parsed_or<T: FromStr>(name: &'static str, default: impl FnOnce() -> T) -> T {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(default)
}

fn string_or(name: &'static str, default: impl FnOnce() -> String) -> String {
    env::var(name).unwrap_or_else(|_| default())
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Errors
    /// Returns an error if required environment variables are missing or malformed
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let task_base_url = required("TASK_QUEUE_BASE_URL")?;
        if !task_base_url.starts_with("http://") && !task_base_url.starts_with("https://") {
            return Err(ConfigError::InvalidValue("TASK_QUEUE_BASE_URL", task_base_url));
        }

        Ok(Self {
            app: AppSettings {
                name: string_or("APP_NAME", default_app_name),
                env: env::var("APP_ENV")
                    .ok()
                    .and_then(|s| Environment::parse(&s))
                    .unwrap_or_default(),
            },
            api: ServerConfig {
                host: string_or("API_HOST", default_host),
                port: {
                    let raw = required("API_PORT")?;
                    raw.parse()
                        .map_err(|_| ConfigError::InvalidValue("API_PORT", raw))?
                },
            },
            database: DatabaseConfig {
                url: required("DATABASE_URL")?,
                max_connections: parsed_or("DATABASE_MAX_CONNECTIONS", default_max_connections),
                min_connections: parsed_or("DATABASE_MIN_CONNECTIONS", default_min_connections),
            },
            redis: RedisConfig {
                url: required("REDIS_URL")?,
                max_connections: parsed_or("REDIS_MAX_CONNECTIONS", default_redis_max_connections),
            },
            slack: SlackConfig {
                client_id: required("SLACK_CLIENT_ID")?,
                client_secret: required("SLACK_CLIENT_SECRET")?,
                signing_secret: required("SLACK_SIGNING_SECRET")?,
                redirect_uri: required("SLACK_REDIRECT_URI")?,
                api_base_url: string_or("SLACK_API_BASE_URL", default_slack_api_base_url),
                scopes: env::var("SLACK_SCOPES")
                    .ok()
                    .map(|s| split_list(&s))
                    .filter(|scopes| !scopes.is_empty())
                    .unwrap_or_else(default_slack_scopes),
                oauth_state_ttl_seconds: parsed_or(
                    "SLACK_OAUTH_STATE_TTL_SECONDS",
                    default_oauth_state_ttl,
                ),
            },
            task_queue: TaskQueueConfig {
                base_url: task_base_url.trim_end_matches('/').to_string(),
                key: string_or("TASK_QUEUE_KEY", default_task_queue_key),
                poll_interval_ms: parsed_or("TASK_POLL_INTERVAL_MS", default_task_poll_interval_ms),
                max_attempts: parsed_or("TASK_MAX_ATTEMPTS", default_task_max_attempts),
                retry_delay_seconds: parsed_or("TASK_RETRY_DELAY_SECONDS", default_task_retry_delay),
            },
            schedule: ScheduleConfig {
                enabled: parsed_or("SCHEDULE_ENABLED", default_true),
                timezone: string_or("SCHEDULE_TIMEZONE", default_timezone),
                hourly: string_or("SCHEDULE_HOURLY", default_hourly_cron),
                weekly: string_or("SCHEDULE_WEEKLY", default_weekly_cron),
                monthly: string_or("SCHEDULE_MONTHLY", default_monthly_cron),
                recommend: string_or("SCHEDULE_RECOMMEND", default_recommend_cron),
                prune: string_or("SCHEDULE_PRUNE", default_prune_cron),
            },
            rate_limit: RateLimitConfig {
                requests_per_second: parsed_or(
                    "RATE_LIMIT_REQUESTS_PER_SECOND",
                    default_requests_per_second,
                ),
                burst: parsed_or("RATE_LIMIT_BURST", default_burst),
            },
            test_team_id: env::var("SLACK_TEST_TEAM_ID").ok().filter(|s| !s.is_empty()),
        })
    }
}

fn split_list(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(String::from)
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(&'static str, String),
}
