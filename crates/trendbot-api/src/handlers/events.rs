//! Events API handler

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use trendbot_core::EventEnvelope;
use trendbot_service::services::OrSkip;
use trendbot_service::EventService;

use crate::extractors::SlackVerified;
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Events API callback
///
/// POST /slack/events
pub async fn events(
    State(state): State<AppState>,
    SlackVerified(body): SlackVerified,
) -> ApiResult<Response> {
    let envelope: EventEnvelope =
        serde_json::from_slice(&body).map_err(|e| ApiError::rejected(e.to_string()))?;

    match envelope {
        EventEnvelope::UrlVerification { challenge } => Ok(challenge.into_response()),
        EventEnvelope::EventCallback { team_id, event } => {
            EventService::new(state.service_context())
                .handle(&team_id, &event)
                .await
                .or_skip()?;
            Ok(StatusCode::OK.into_response())
        }
        EventEnvelope::Other => Ok(StatusCode::OK.into_response()),
    }
}
