//! Channel batching

use chrono::{DateTime, Duration, Utc};

/// Split `items` into consecutive groups of `batch_size`; the last may be shorter.
///
/// A size of zero is treated as one.
pub fn batch<T: Clone>(items: &[T], batch_size: usize) -> Vec<Vec<T>> {
    items.chunks(batch_size.max(1)).map(<[T]>::to_vec).collect()
}

/// Earliest start of each of `groups` tasks, `interval` apart starting at `now`
pub fn schedule_times(now: DateTime<Utc>, groups: usize, interval: Duration) -> Vec<DateTime<Utc>> {
    (0..groups)
        .map(|i| now + interval * i32::try_from(i).unwrap_or(i32::MAX))
        .collect()
}

/// Pair each group with its start time
pub fn plan_batches<T: Clone>(
    items: &[T],
    batch_size: usize,
    now: DateTime<Utc>,
    interval: Duration,
) -> Vec<(DateTime<Utc>, Vec<T>)> {
    let groups = batch(items, batch_size);
    schedule_times(now, groups.len(), interval)
        .into_iter()
        .zip(groups)
        .collect()
}
