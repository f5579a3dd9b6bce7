//! Request DTOs for API endpoints

use serde::Deserialize;
use validator::Validate;

/// Query string of the OAuth redirect
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OAuthRedirectQuery {
    #[validate(length(min = 1, message = "code is required"))]
    #[serde(default)]
    pub code: String,

    #[validate(length(min = 1, max = 128, message = "state must be 1-128 characters"))]
    #[serde(default)]
    pub state: String,
}

/// Form body of an interactive-component callback
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InteractiveForm {
    /// JSON-encoded interactive payload
    #[validate(length(min = 1, message = "payload is required"))]
    pub payload: String,
}
