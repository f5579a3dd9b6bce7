//! Server setup and initialization
//!
//! Builds the application, wires the repositories and Redis plumbing into the
//! service context, and runs the HTTP server next to the background workers.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use trendbot_cache::{
    DispatcherConfig, RedisEventPublisher, RedisOAuthStateStore, RedisPool, RedisTaskQueue,
    SubscriberBuilder, TaskDispatcher,
};
use trendbot_common::{AppConfig, AppError, RateLimitConfig};
use trendbot_core::Topic;
use trendbot_db::{
    create_pool, run_migrations, DatabaseConfig, PgInstallationRepository, PgPool,
    PgPostedTrendRepository, PgRecommendedChannelRepository, PgTrendAccumulatorRepository,
};
use trendbot_service::{ServiceContext, ServiceSettings};
use trendbot_slack::{SlackClientConfig, SlackWebClient};

use crate::middleware::{apply_middleware, apply_rate_limit};
use crate::routes::{health_routes, slack_routes, task_routes};
use crate::state::{AppState, StoreProbe};
use crate::workers::{run_subscriber, Scheduler};

/// Build the complete Axum application with all routes and middleware.
///
/// Only the Slack-facing routes are rate limited.
pub fn create_app(state: AppState, rate_limit: &RateLimitConfig) -> Router {
    let router = Router::new()
        .merge(apply_rate_limit(slack_routes(), rate_limit))
        .merge(task_routes())
        .merge(health_routes());
    apply_middleware(router).with_state(state)
}

/// Build the service context on top of live stores
pub fn create_service_context(
    config: &AppConfig,
    pool: PgPool,
    redis: RedisPool,
) -> Result<ServiceContext, AppError> {
    let slack = SlackWebClient::new(SlackClientConfig::from(&config.slack))?;

    ServiceContext::builder()
        .installations(Arc::new(PgInstallationRepository::new(pool.clone())))
        .posted_trends(Arc::new(PgPostedTrendRepository::new(pool.clone())))
        .recommended_channels(Arc::new(PgRecommendedChannelRepository::new(pool.clone())))
        .accumulators(Arc::new(PgTrendAccumulatorRepository::new(pool)))
        .slack(Arc::new(slack))
        .publisher(Arc::new(RedisEventPublisher::new(redis.clone())))
        .task_queue(Arc::new(RedisTaskQueue::new(redis.clone(), &config.task_queue.key)))
        .oauth_states(Arc::new(RedisOAuthStateStore::with_ttl(
            redis,
            config.slack.oauth_state_ttl_seconds,
        )))
        .settings(ServiceSettings::from_config(config))
        .build()
        .map_err(|e| AppError::Config(e.to_string()))
}

/// Start the subscriber, dispatcher and scheduler workers
fn spawn_workers(
    config: &AppConfig,
    ctx: &ServiceContext,
    redis: RedisPool,
    shutdown: &watch::Receiver<bool>,
) -> Result<Vec<JoinHandle<()>>, AppError> {
    let mut handles = Vec::new();

    let subscriber = SubscriberBuilder::new()
        .redis_url(&config.redis.url)
        .topics(Topic::ALL)
        .build();
    handles.push(tokio::spawn(run_subscriber(
        subscriber,
        ctx.clone(),
        shutdown.clone(),
    )));

    let dispatcher = TaskDispatcher::new(redis, DispatcherConfig::from(&config.task_queue))
        .map_err(|e| AppError::Config(format!("task dispatcher: {e}")))?;
    handles.push(tokio::spawn(dispatcher.run(shutdown.clone())));

    if config.schedule.enabled {
        let scheduler = Scheduler::from_config(&config.schedule)
            .map_err(|e| AppError::Config(e.to_string()))?;
        handles.push(tokio::spawn(scheduler.run(ctx.clone(), shutdown.clone())));
    } else {
        warn!("Periodic triggers disabled");
    }

    Ok(handles)
}

async fn shutdown_signal(shutdown: watch::Sender<bool>) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
    let _ = shutdown.send(true);
}

/// Run the HTTP server
pub async fn run_server(
    app: Router,
    addr: SocketAddr,
    shutdown: watch::Sender<bool>,
) -> Result<(), AppError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown))
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr: SocketAddr = config
        .api
        .address()
        .parse()
        .map_err(|e| AppError::Config(format!("Invalid listen address: {e}")))?;

    info!("Connecting to PostgreSQL...");
    let pool = create_pool(&DatabaseConfig::from(&config.database))
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    run_migrations(&pool)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    info!("Connecting to Redis...");
    let redis = RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;

    let ctx = create_service_context(&config, pool.clone(), redis.clone())?;
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let workers = spawn_workers(&config, &ctx, redis.clone(), &shutdown_rx)?;

    let state = AppState::new(
        ctx,
        config.slack.signing_secret.as_str(),
        Arc::new(StoreProbe::new(pool, redis)),
    );
    let app = create_app(state, &config.rate_limit);

    let result = run_server(app, addr, shutdown_tx.clone()).await;

    let _ = shutdown_tx.send(true);
    for handle in workers {
        if let Err(e) = handle.await {
            warn!(error = %e, "Worker ended abnormally");
        }
    }

    result
}
