//! Domain errors - error types for the domain layer

use thiserror::Error;

/// Domain layer errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Installation not found: {0}")]
    InstallationNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("OAuth state not found or expired")]
    OAuthStateNotFound,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Unsupported payload: {0}")]
    UnsupportedPayload(String),

    #[error("Invalid message timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Queue mismatch: expected {expected}, got {actual}")]
    QueueMismatch { expected: String, actual: String },

    // =========================================================================
    // External Service Errors
    // =========================================================================
    #[error("Slack API error in {method}: {error}")]
    SlackApi { method: String, error: String },

    #[error("Task queue error: {0}")]
    TaskQueueError(String),

    #[error("Publish error: {0}")]
    PublishError(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Create a Slack API error
    pub fn slack(method: impl Into<String>, error: impl Into<String>) -> Self {
        Self::SlackApi {
            method: method.into(),
            error: error.into(),
        }
    }

    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::InstallationNotFound(_) => "UNKNOWN_INSTALLATION",

            // Validation
            Self::OAuthStateNotFound => "UNKNOWN_OAUTH_STATE",
            Self::ValidationError(_) => "VALIDATION_ERROR",
            Self::UnsupportedPayload(_) => "UNSUPPORTED_PAYLOAD",
            Self::InvalidTimestamp(_) => "INVALID_TIMESTAMP",
            Self::QueueMismatch { .. } => "QUEUE_MISMATCH",

            // External
            Self::SlackApi { .. } => "SLACK_API_ERROR",
            Self::TaskQueueError(_) => "TASK_QUEUE_ERROR",
            Self::PublishError(_) => "PUBLISH_ERROR",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::CacheError(_) => "CACHE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::InstallationNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::ValidationError(_)
                | Self::OAuthStateNotFound
                | Self::UnsupportedPayload(_)
                | Self::InvalidTimestamp(_)
                | Self::QueueMismatch { .. }
        )
    }

    /// Check if this error came from a remote collaborator
    pub fn is_external(&self) -> bool {
        matches!(
            self,
            Self::SlackApi { .. } | Self::TaskQueueError(_) | Self::PublishError(_)
        )
    }
}

impl From<crate::value_objects::MessageTsParseError> for DomainError {
    fn from(err: crate::value_objects::MessageTsParseError) -> Self {
        Self::InvalidTimestamp(err.to_string())
    }
}
