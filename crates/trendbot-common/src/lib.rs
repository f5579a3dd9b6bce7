//! # trendbot-common
//!
//! Shared utilities including configuration, error handling, Slack request
//! signing, and telemetry.

pub mod config;
pub mod error;
pub mod signature;
pub mod telemetry;

// Re-export commonly used types at crate root
pub use config::{
    AppConfig, AppSettings, ConfigError, DatabaseConfig, Environment, RateLimitConfig,
    RedisConfig, ScheduleConfig, ServerConfig, SlackConfig, TaskQueueConfig,
};
pub use error::{AppError, AppResult};
pub use signature::{sign_slack_request, verify_slack_signature, SignatureError};
pub use telemetry::{try_init_tracing, try_init_tracing_with_config, TracingConfig, TracingError};
