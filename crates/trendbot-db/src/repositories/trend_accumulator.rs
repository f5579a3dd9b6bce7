//! PostgreSQL implementation of TrendAccumulatorRepository

use async_trait::async_trait;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::instrument;

use trendbot_core::entities::{TrendMessage, TrendPeriod};
use trendbot_core::traits::{RepoResult, TrendAccumulatorRepository};

use crate::models::AccumulatorModel;

use super::error::map_db_error;

#[derive(Clone)]
pub struct PgTrendAccumulatorRepository {
    pool: PgPool,
}

impl PgTrendAccumulatorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TrendAccumulatorRepository for PgTrendAccumulatorRepository {
    #[instrument(skip(self))]
    async fn get(&self, team_id: &str, period: TrendPeriod) -> RepoResult<Vec<TrendMessage>> {
        let result = sqlx::query_as::<_, AccumulatorModel>(
            r"
            SELECT team_id, period, messages FROM trend_accumulators
            WHERE team_id = $1 AND period = $2
            ",
        )
        .bind(team_id)
        .bind(period.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(|row| row.messages.0).unwrap_or_default())
    }

    /// Single-statement append; concurrent scans of one period both land.
    /// Entries whose `(channel_id, ts)` is already held are skipped, so a
    /// redelivered count task leaves the list unchanged.
    #[instrument(skip(self, messages), fields(count = messages.len()))]
    async fn append(
        &self,
        team_id: &str,
        period: TrendPeriod,
        messages: &[TrendMessage],
    ) -> RepoResult<()> {
        if messages.is_empty() {
            return Ok(());
        }

        sqlx::query(
            r"
            INSERT INTO trend_accumulators (team_id, period, messages)
            VALUES ($1, $2, $3)
            ON CONFLICT (team_id, period) DO UPDATE
            SET messages = trend_accumulators.messages || COALESCE(
                    (
                        SELECT jsonb_agg(incoming)
                        FROM jsonb_array_elements(EXCLUDED.messages) AS incoming
                        WHERE NOT EXISTS (
                            SELECT 1
                            FROM jsonb_array_elements(trend_accumulators.messages) AS held
                            WHERE held->>'channel_id' = incoming->>'channel_id'
                              AND held->>'ts' = incoming->>'ts'
                        )
                    ),
                    '[]'::jsonb
                ),
                updated_at = NOW()
            ",
        )
        .bind(team_id)
        .bind(period.as_str())
        .bind(Json(messages))
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn clear(&self, team_id: &str, period: TrendPeriod) -> RepoResult<()> {
        sqlx::query("DELETE FROM trend_accumulators WHERE team_id = $1 AND period = $2")
            .bind(team_id)
            .bind(period.as_str())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_team(&self, team_id: &str) -> RepoResult<()> {
        sqlx::query("DELETE FROM trend_accumulators WHERE team_id = $1")
            .bind(team_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}
