//! Redis Pub/Sub topic fan-out.

mod channels;
mod publisher;
mod subscriber;

pub use channels::{parse_topic_channel, topic_channel, TOPIC_CHANNEL_PREFIX};
pub use publisher::RedisEventPublisher;
pub use subscriber::{
    ReceivedMessage, SubscriberBuilder, SubscriberConfig, SubscriberError, SubscriberResult,
    TopicSubscriber,
};
