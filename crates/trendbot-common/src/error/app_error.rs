//! Application error type
//!
//! Wraps [`DomainError`] and adds the failures that only exist at the edges:
//! Slack request verification, startup configuration and store connectivity.

use std::fmt;
use trendbot_core::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// `X-Slack-Signature` did not match the body
    #[error("Invalid request signature")]
    InvalidSignature,

    /// `X-Slack-Request-Timestamp` is more than five minutes off
    #[error("Request timestamp outside the accepted window")]
    StaleRequest,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

impl AppError {
    /// HTTP status for this error
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidSignature | Self::StaleRequest | Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::Database(_) | Self::Cache(_) | Self::Config(_) | Self::Internal(_) => 500,
            Self::Domain(e) if e.is_not_found() => 404,
            Self::Domain(e) if e.is_validation() => 400,
            Self::Domain(e) if e.is_external() => 502,
            Self::Domain(_) => 500,
        }
    }

    /// Machine-readable code for error bodies
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidSignature => "INVALID_SIGNATURE",
            Self::StaleRequest => "STALE_REQUEST",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Database(_) => "DATABASE_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Domain(e) => e.code(),
        }
    }

    #[must_use]
    pub fn not_found(what: impl fmt::Display) -> Self {
        Self::NotFound(what.to_string())
    }

    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

pub type AppResult<T> = Result<T, AppError>;
