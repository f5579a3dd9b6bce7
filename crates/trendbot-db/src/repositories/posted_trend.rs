//! PostgreSQL implementation of PostedTrendRepository

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use trendbot_core::entities::PostedMessage;
use trendbot_core::traits::{PostedTrendRepository, RepoResult};

use crate::models::PostedTrendsModel;

use super::error::map_db_error;

/// PostgreSQL implementation of PostedTrendRepository
#[derive(Clone)]
pub struct PgPostedTrendRepository {
    pool: PgPool,
}

impl PgPostedTrendRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PostedTrendRepository for PgPostedTrendRepository {
    #[instrument(skip(self))]
    async fn get(&self, team_id: &str) -> RepoResult<Vec<PostedMessage>> {
        let result = sqlx::query_as::<_, PostedTrendsModel>(
            "SELECT team_id, messages FROM posted_trend_messages WHERE team_id = $1",
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(|row| row.messages.0).unwrap_or_default())
    }

    #[instrument(skip(self, posted), fields(count = posted.len()))]
    async fn replace(&self, team_id: &str, posted: &[PostedMessage]) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO posted_trend_messages (team_id, messages)
            VALUES ($1, $2)
            ON CONFLICT (team_id) DO UPDATE SET messages = EXCLUDED.messages, updated_at = NOW()
            ",
        )
        .bind(team_id)
        .bind(Json(posted))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, team_id: &str) -> RepoResult<()> {
        sqlx::query("DELETE FROM posted_trend_messages WHERE team_id = $1")
            .bind(team_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}
