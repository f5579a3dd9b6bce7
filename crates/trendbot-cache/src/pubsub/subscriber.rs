//! Redis Pub/Sub subscriber.
//!
//! Listens on topic channels in a background task and forwards messages to a
//! single bounded in-process queue. A full queue makes the listener wait, so
//! nothing is dropped. Reconnects after connection errors.

use futures_util::StreamExt;
use redis::Client;
use std::time::Duration;
use tokio::sync::mpsc;

use trendbot_core::events::{Topic, TopicMessage};

use crate::pool::redact_url;
use crate::pubsub::{parse_topic_channel, topic_channel};

/// Error type for subscriber operations
#[derive(Debug, thiserror::Error)]
pub enum SubscriberError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Channel closed")]
    ChannelClosed,
}

/// Result type for subscriber operations
pub type SubscriberResult<T> = Result<T, SubscriberError>;

/// Message received from a topic channel
#[derive(Debug, Clone)]
pub struct ReceivedMessage {
    /// Topic of the channel it arrived on
    pub topic: Option<Topic>,
    /// Decoded message, if the payload was a valid topic message
    pub message: Option<TopicMessage>,
    /// Raw payload
    pub payload: String,
}

impl ReceivedMessage {
    fn from_redis(channel_name: &str, payload: String) -> Self {
        Self {
            topic: parse_topic_channel(channel_name),
            message: serde_json::from_str(&payload).ok(),
            payload,
        }
    }

    /// The decoded message, if it belongs to the channel's topic
    pub fn into_message(self) -> Option<TopicMessage> {
        let topic = self.topic?;
        self.message.filter(|m| m.topic() == topic)
    }
}

/// Subscriber configuration
#[derive(Debug, Clone)]
pub struct SubscriberConfig {
    /// Redis connection URL
    pub redis_url: String,
    /// Capacity of the in-process queue
    pub buffer: usize,
    /// Reconnection delay in milliseconds
    pub reconnect_delay_ms: u64,
}

impl Default for SubscriberConfig {
    fn default() -> Self {
        Self {
            redis_url: "redis://127.0.0.1:6379".to_string(),
            buffer: 1024,
            reconnect_delay_ms: 1000,
        }
    }
}

/// Redis Pub/Sub subscriber for a fixed set of topics
pub struct TopicSubscriber {
    receiver: mpsc::Receiver<ReceivedMessage>,
    shutdown_tx: mpsc::Sender<()>,
}

impl TopicSubscriber {
    /// Start the background listener for `topics`
    fn start(config: SubscriberConfig, topics: Vec<Topic>) -> Self {
        let (message_tx, receiver) = mpsc::channel(config.buffer.max(1));
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let channels = topics.into_iter().map(topic_channel).collect();

        tokio::spawn(Self::listener_loop(config, channels, message_tx, shutdown_rx));

        Self {
            receiver,
            shutdown_tx,
        }
    }

    async fn listener_loop(
        config: SubscriberConfig,
        channels: Vec<String>,
        message_tx: mpsc::Sender<ReceivedMessage>,
        mut shutdown_rx: mpsc::Receiver<()>,
    ) {
        loop {
            match Self::run_listener(&config, &channels, &message_tx, &mut shutdown_rx).await {
                Ok(()) => {
                    tracing::info!("Subscriber shutting down");
                    break;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Subscriber error, reconnecting...");
                    tokio::time::sleep(Duration::from_millis(config.reconnect_delay_ms)).await;
                }
            }
        }
    }

    /// Run until shutdown or a dropped receiver (Ok), or a connection failure (Err)
    async fn run_listener(
        config: &SubscriberConfig,
        channels: &[String],
        message_tx: &mpsc::Sender<ReceivedMessage>,
        shutdown_rx: &mut mpsc::Receiver<()>,
    ) -> SubscriberResult<()> {
        let client = Client::open(config.redis_url.as_str())?;
        let mut pubsub = client.get_async_pubsub().await?;
        for channel in channels {
            pubsub.subscribe(channel).await?;
        }

        tracing::info!(
            url = %redact_url(&config.redis_url),
            channels = channels.len(),
            "Subscriber connected to Redis"
        );

        let mut stream = pubsub.on_message();
        loop {
            tokio::select! {
                msg = stream.next() => {
                    let Some(msg) = msg else {
                        return Err(SubscriberError::ChannelClosed);
                    };
                    let channel_name = msg.get_channel_name().to_string();
                    let payload: String = msg.get_payload().unwrap_or_default();

                    tracing::trace!(channel = %channel_name, "Received Pub/Sub message");
                    if !forward(message_tx, ReceivedMessage::from_redis(&channel_name, payload)).await {
                        return Ok(());
                    }
                }
                _ = shutdown_rx.recv() => return Ok(()),
            }
        }
    }

    /// Next topic message; `None` once the listener has stopped
    pub async fn recv(&mut self) -> Option<ReceivedMessage> {
        self.receiver.recv().await
    }

    /// Stop the background listener
    pub async fn shutdown(&self) -> SubscriberResult<()> {
        self.shutdown_tx
            .send(())
            .await
            .map_err(|_| SubscriberError::ChannelClosed)
    }
}

/// Queue `message`, waiting for room when the queue is full.
/// Returns false when the receiving side is gone.
async fn forward(message_tx: &mpsc::Sender<ReceivedMessage>, message: ReceivedMessage) -> bool {
    match message_tx.try_send(message) {
        Ok(()) => true,
        Err(mpsc::error::TrySendError::Full(message)) => {
            tracing::warn!(
                topic = ?message.topic,
                capacity = message_tx.max_capacity(),
                "Topic queue full, waiting for the worker"
            );
            message_tx.send(message).await.is_ok()
        }
        Err(mpsc::error::TrySendError::Closed(_)) => false,
    }
}

/// Builder for [`TopicSubscriber`]
pub struct SubscriberBuilder {
    config: SubscriberConfig,
    topics: Vec<Topic>,
}

impl SubscriberBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: SubscriberConfig::default(),
            topics: Vec::new(),
        }
    }

    #[must_use]
    pub fn redis_url(mut self, url: impl Into<String>) -> Self {
        self.config.redis_url = url.into();
        self
    }

    #[must_use]
    pub fn buffer(mut self, size: usize) -> Self {
        self.config.buffer = size;
        self
    }

    #[must_use]
    pub fn reconnect_delay_ms(mut self, delay: u64) -> Self {
        self.config.reconnect_delay_ms = delay;
        self
    }

    #[must_use]
    pub fn topic(mut self, topic: Topic) -> Self {
        if !self.topics.contains(&topic) {
            self.topics.push(topic);
        }
        self
    }

    #[must_use]
    pub fn topics(self, topics: impl IntoIterator<Item = Topic>) -> Self {
        topics.into_iter().fold(self, Self::topic)
    }

    /// Start the subscriber; must be called inside a Tokio runtime
    #[must_use]
    pub fn build(self) -> TopicSubscriber {
        TopicSubscriber::start(self.config, self.topics)
    }
}

impl Default for SubscriberBuilder {
    fn default() -> Self {
        Self::new()
    }
}
