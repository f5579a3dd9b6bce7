//! # trendbot-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! - Connection pool management and the embedded schema
//! - Database models with SQLx `FromRow` derives
//! - Model -> entity mappers
//! - Repository implementations, all keyed by Slack team ID
//!
//! ## Usage
//!
//! ```rust,ignore
//! use trendbot_db::{create_pool, run_migrations, DatabaseConfig, PgInstallationRepository};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let pool = create_pool(&DatabaseConfig::default()).await?;
//!     run_migrations(&pool).await?;
//!     let installations = PgInstallationRepository::new(pool);
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;
pub mod schema;

// Re-export commonly used types
pub use pool::{create_pool, ping, DatabaseConfig, PgPool};
pub use repositories::{
    PgInstallationRepository, PgPostedTrendRepository, PgRecommendedChannelRepository,
    PgTrendAccumulatorRepository,
};
pub use schema::run_migrations;
