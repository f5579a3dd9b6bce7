//! Topic subscriber worker
//!
//! Every received topic message is handled in its own task, so a slow
//! workspace never delays the others.

use chrono::Utc;
use tokio::sync::watch;
use tracing::{error, info, warn};
use trendbot_cache::TopicSubscriber;
use trendbot_service::{DispatchService, ServiceContext};

/// Drain `subscriber` until shutdown
pub async fn run_subscriber(
    mut subscriber: TopicSubscriber,
    ctx: ServiceContext,
    mut shutdown: watch::Receiver<bool>,
) {
    info!("Topic subscriber worker started");

    loop {
        tokio::select! {
            received = subscriber.recv() => match received {
                Some(received) => {
                    let payload_len = received.payload.len();
                    let Some(message) = received.into_message() else {
                        warn!(payload_len, "Dropping undecodable topic message");
                        continue;
                    };
                    let ctx = ctx.clone();
                    tokio::spawn(async move {
                        if let Err(e) = DispatchService::new(&ctx).handle_topic(&message, Utc::now()).await {
                            error!(
                                topic = %message.topic(),
                                team_id = %message.team_id(),
                                error = %e,
                                "Topic handler failed"
                            );
                        }
                    });
                }
                None => {
                    error!("Topic subscriber channel closed");
                    break;
                }
            },
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
            }
        }
    }

    if let Err(e) = subscriber.shutdown().await {
        warn!(error = %e, "Topic subscriber already stopped");
    }
    info!("Topic subscriber worker stopped");
}
