//! # trendbot-cache
//!
//! Redis plumbing for the bot.
//!
//! ## Features
//!
//! - **Connection Pool**: Managed Redis connection pool with deadpool
//! - **Pub/Sub**: Topic fan-out of [`TopicMessage`](trendbot_core::TopicMessage)s
//! - **Task Queue**: Delayed HTTP callbacks on a sorted set
//! - **OAuth State**: Short-lived install state tokens
//!
//! ## Example
//!
//! ```ignore
//! use trendbot_cache::{RedisPool, RedisEventPublisher, RedisTaskQueue};
//!
//! let pool = RedisPool::from_config(&config.redis)?;
//! let publisher = RedisEventPublisher::new(pool.clone());
//! let tasks = RedisTaskQueue::new(pool.clone(), &config.task_queue.key);
//! ```

pub mod oauth_state;
pub mod pool;
pub mod pubsub;
pub mod tasks;

pub use oauth_state::{RedisOAuthStateStore, DEFAULT_OAUTH_STATE_TTL};
pub use pool::{RedisPool, RedisPoolConfig, RedisPoolError, RedisResult};
pub use pubsub::{
    parse_topic_channel, topic_channel, ReceivedMessage, RedisEventPublisher, SubscriberBuilder,
    SubscriberConfig, SubscriberError, SubscriberResult, TopicSubscriber, TOPIC_CHANNEL_PREFIX,
};
pub use tasks::{
    Delivery, DispatcherConfig, RedisTaskQueue, ScheduledTask, TaskDispatcher, QUEUE_NAME_HEADER,
    RETRY_COUNT_HEADER,
};
