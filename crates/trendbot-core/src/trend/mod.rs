//! Trend detection: candidate selection and channel batching
//!
//! [`selector`] picks which messages to announce. [`batch`] splits channel
//! lists into delayed groups so a workspace is scanned without tripping
//! Slack's per-method rate limits.

pub mod batch;
pub mod selector;

use chrono::{DateTime, Duration, Months, Utc};

use crate::entities::TrendPeriod;

pub use batch::{batch, plan_batches, schedule_times};
pub use selector::{retain_recent, select_trending, TrendSelection};

/// Channels per history-scan task
pub const HISTORY_BATCH_SIZE: usize = 20;

/// Channels per join task
pub const JOIN_BATCH_SIZE: usize = 40;

/// Minutes between join tasks
pub const JOIN_INTERVAL_MINUTES: i64 = 2;

/// Dedupe entries older than this many months are pruned
pub const PRUNE_HORIZON_MONTHS: u32 = 2;

/// Delay before the welcome message after a first install
pub const FIRST_MESSAGE_DELAY_MINUTES: i64 = 1;

/// How far back a scan reads channel history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookback {
    Days(i64),
    Months(u32),
}

impl Lookback {
    /// Oldest timestamp included in a scan starting at `now`
    pub fn oldest(self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Self::Days(days) => now - Duration::days(days),
            Self::Months(months) => now
                .checked_sub_months(Months::new(months))
                .unwrap_or(DateTime::<Utc>::MIN_UTC),
        }
    }
}

/// Parameters of one kind of scan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanPlan {
    pub lookback: Lookback,
    /// Channels per task
    pub batch_size: usize,
    /// Delay between consecutive tasks
    pub interval: Duration,
    /// Messages kept per task
    pub max_results: usize,
}

impl ScanPlan {
    /// Hourly announcement scan: two days back, one message per batch
    pub fn hourly() -> Self {
        Self {
            lookback: Lookback::Days(2),
            batch_size: HISTORY_BATCH_SIZE,
            interval: Duration::minutes(2),
            max_results: 1,
        }
    }

    /// Digest counting scan for a period
    pub fn digest(period: TrendPeriod) -> Self {
        match period {
            TrendPeriod::Weekly => Self {
                lookback: Lookback::Days(7),
                batch_size: HISTORY_BATCH_SIZE,
                interval: Duration::minutes(3),
                max_results: 3,
            },
            TrendPeriod::Monthly => Self {
                lookback: Lookback::Months(1),
                batch_size: HISTORY_BATCH_SIZE,
                interval: Duration::minutes(3),
                max_results: 5,
            },
        }
    }

    /// Join scheduling
    pub fn join() -> Self {
        Self {
            lookback: Lookback::Days(0),
            batch_size: JOIN_BATCH_SIZE,
            interval: Duration::minutes(JOIN_INTERVAL_MINUTES),
            max_results: 0,
        }
    }
}
