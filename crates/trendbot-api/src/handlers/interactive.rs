//! Interactive components handler

use axum::{extract::State, http::StatusCode};
use tracing::debug;
use trendbot_core::InteractivePayload;
use trendbot_service::dto::InteractiveForm;
use trendbot_service::InteractiveService;
use validator::Validate;

use crate::extractors::SlackVerified;
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Pull the `payload` field out of a form body
fn interactive_form(body: &[u8]) -> InteractiveForm {
    let payload = form_urlencoded::parse(body)
        .find(|(key, _)| key == "payload")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default();
    InteractiveForm { payload }
}

/// Interactive component callback; each action becomes a topic message
///
/// POST /slack/interactive
pub async fn interactive(
    State(state): State<AppState>,
    SlackVerified(body): SlackVerified,
) -> ApiResult<StatusCode> {
    let form = interactive_form(&body);
    form.validate()
        .map_err(|e| ApiError::rejected(e.to_string()))?;
    let payload = InteractivePayload::parse(&form.payload)
        .map_err(|e| ApiError::rejected(e.to_string()))?;

    let published = InteractiveService::new(state.service_context())
        .publish_actions(&payload)
        .await?;
    debug!(published, "Handled interactive payload");

    Ok(StatusCode::OK)
}
