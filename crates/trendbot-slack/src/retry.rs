//! Backoff for rate limited and failing Slack calls

use reqwest::header::{HeaderMap, RETRY_AFTER};
use std::time::Duration;

/// Upper bound on a single backoff sleep
const MAX_RETRY_DELAY_MS: u64 = 30_000;

pub(crate) fn is_retryable_status(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

pub(crate) fn is_retryable_transport_error(error: &reqwest::Error) -> bool {
    error.is_timeout() || error.is_connect()
}

/// `Retry-After` in seconds, when present and numeric
pub(crate) fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}

/// Exponential backoff from `base_ms`; a server-provided delay wins
pub(crate) fn retry_delay(base_ms: u64, attempt: usize, retry_after: Option<Duration>) -> Duration {
    if let Some(delay) = retry_after {
        return delay;
    }
    let exponent = attempt.saturating_sub(1).min(16) as u32;
    let delay = base_ms.saturating_mul(1_u64 << exponent);
    Duration::from_millis(delay.min(MAX_RETRY_DELAY_MS))
}
