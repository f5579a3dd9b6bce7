//! Task delivery metadata

use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use trendbot_cache::{QUEUE_NAME_HEADER, RETRY_COUNT_HEADER};
use trendbot_core::{DomainError, Queue};

use crate::response::ApiError;

/// Queue and retry count of a task callback.
///
/// The queue in the path must match the queue-name header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskDelivery {
    pub queue: Queue,
    pub retry_count: u32,
}

#[async_trait]
impl<S> FromRequestParts<S> for TaskDelivery
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(name) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::rejected(e.to_string()))?;
        let queue: Queue = name.parse().map_err(|e: DomainError| ApiError::rejected(e.to_string()))?;

        let header_name = parts
            .headers
            .get(QUEUE_NAME_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if header_name != queue.as_str() {
            let mismatch = DomainError::QueueMismatch {
                expected: queue.as_str().to_string(),
                actual: header_name.to_string(),
            };
            return Err(ApiError::rejected(mismatch.to_string()));
        }

        let retry_count = parts
            .headers
            .get(RETRY_COUNT_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);

        Ok(TaskDelivery { queue, retry_count })
    }
}
