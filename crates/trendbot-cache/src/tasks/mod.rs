//! Delayed HTTP task queue.
//!
//! Tasks sit in a Redis sorted set scored by their due time (Unix millis).
//! The [`TaskDispatcher`] claims due tasks and POSTs them to
//! `{base_url}/tasks/{queue}`.

mod dispatcher;
mod queue;

pub use dispatcher::{Delivery, DispatcherConfig, TaskDispatcher, QUEUE_NAME_HEADER, RETRY_COUNT_HEADER};
pub use queue::{RedisTaskQueue, ScheduledTask};
