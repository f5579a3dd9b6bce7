//! Embedded schema

use sqlx::PgPool;

const INIT_SQL: &str = include_str!("../migrations/0001_init.sql");

/// Create tables and indexes that do not exist yet
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(INIT_SQL).execute(pool).await?;
    tracing::info!("Database schema is up to date");
    Ok(())
}
