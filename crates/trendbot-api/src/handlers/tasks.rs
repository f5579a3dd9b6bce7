//! Task callback handler

use axum::{body::Bytes, extract::State, http::StatusCode};
use chrono::Utc;
use tracing::info;
use trendbot_core::TaskPayload;
use trendbot_service::DispatchService;

use crate::extractors::TaskDelivery;
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Delayed task delivery
///
/// POST /tasks/:queue
pub async fn task_callback(
    State(state): State<AppState>,
    delivery: TaskDelivery,
    body: Bytes,
) -> ApiResult<StatusCode> {
    let task = TaskPayload::from_body(delivery.queue, &body)
        .map_err(|e| ApiError::rejected(e.to_string()))?;

    let outcome = DispatchService::new(state.service_context())
        .handle_task(&task, delivery.retry_count, Utc::now())
        .await?;

    info!(
        queue = %delivery.queue,
        team_id = %task.team_id(),
        retry_count = delivery.retry_count,
        outcome = ?outcome,
        "Handled task"
    );
    Ok(StatusCode::OK)
}
