//! PostgreSQL implementation of RecommendedChannelRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use trendbot_core::traits::{RecommendedChannelRepository, RepoResult};

use crate::models::RecommendedChannelsModel;

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgRecommendedChannelRepository {
    pool: PgPool,
}

impl PgRecommendedChannelRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecommendedChannelRepository for PgRecommendedChannelRepository {
    #[instrument(skip(self))]
    async fn get(&self, team_id: &str) -> RepoResult<Vec<String>> {
        let result = sqlx::query_as::<_, RecommendedChannelsModel>(
            "SELECT team_id, channel_ids FROM posted_recommend_channels WHERE team_id = $1",
        )
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(|row| row.channel_ids).unwrap_or_default())
    }

    #[instrument(skip(self, channel_ids), fields(count = channel_ids.len()))]
    async fn replace(&self, team_id: &str, channel_ids: &[String]) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO posted_recommend_channels (team_id, channel_ids)
            VALUES ($1, $2)
            ON CONFLICT (team_id) DO UPDATE SET channel_ids = EXCLUDED.channel_ids, updated_at = NOW()
            ",
        )
        .bind(team_id)
        .bind(channel_ids)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, team_id: &str) -> RepoResult<()> {
        sqlx::query("DELETE FROM posted_recommend_channels WHERE team_id = $1")
            .bind(team_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}
