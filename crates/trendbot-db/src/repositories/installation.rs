//! PostgreSQL implementation of InstallationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use trendbot_core::entities::{InstallOutcome, Installation, NewInstallation};
use trendbot_core::traits::{InstallationRepository, RepoResult};

use crate::models::{InstallationModel, InstallationUpsertModel};

use super::error::{installation_not_found, map_db_error};

const COLUMNS: &str = "team_id, team_name, bot_token, bot_user_id, bot_id, scopes, \
    installer_user_id, target_channel_id, joined_channel_ids, is_all_public_channel, \
    selected_trend_num, created_at, updated_at";

/// PostgreSQL implementation of InstallationRepository
#[derive(Clone)]
pub struct PgInstallationRepository {
    pool: PgPool,
}

impl PgInstallationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run a single-row UPDATE, reporting an unknown team as not found
    async fn update_one(
        &self,
        team_id: &str,
        query: sqlx::query::Query<'_, sqlx::Postgres, sqlx::postgres::PgArguments>,
    ) -> RepoResult<()> {
        let result = query.execute(&self.pool).await.map_err(map_db_error)?;
        if result.rows_affected() == 0 {
            return Err(installation_not_found(team_id));
        }
        Ok(())
    }
}

#[async_trait]
impl InstallationRepository for PgInstallationRepository {
    #[instrument(skip(self))]
    async fn find_by_team(&self, team_id: &str) -> RepoResult<Option<Installation>> {
        let result = sqlx::query_as::<_, InstallationModel>(&format!(
            "SELECT {COLUMNS} FROM installations WHERE team_id = $1"
        ))
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Installation::from))
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> RepoResult<Vec<Installation>> {
        let results = sqlx::query_as::<_, InstallationModel>(&format!(
            "SELECT {COLUMNS} FROM installations ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Installation::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_with_target_channel(&self) -> RepoResult<Vec<Installation>> {
        let results = sqlx::query_as::<_, InstallationModel>(&format!(
            r"
            SELECT {COLUMNS} FROM installations
            WHERE target_channel_id IS NOT NULL AND target_channel_id <> ''
            ORDER BY created_at
            "
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Installation::from).collect())
    }

    #[instrument(skip(self, install), fields(team_id = %install.team_id))]
    async fn save_install(&self, install: &NewInstallation) -> RepoResult<InstallOutcome> {
        let row = sqlx::query_as::<_, InstallationUpsertModel>(&format!(
            r"
            INSERT INTO installations
                (team_id, team_name, bot_token, bot_user_id, bot_id, scopes, installer_user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (team_id) DO UPDATE SET
                team_name = EXCLUDED.team_name,
                bot_token = EXCLUDED.bot_token,
                bot_user_id = EXCLUDED.bot_user_id,
                bot_id = EXCLUDED.bot_id,
                scopes = EXCLUDED.scopes,
                installer_user_id = COALESCE(EXCLUDED.installer_user_id, installations.installer_user_id),
                updated_at = NOW()
            RETURNING {COLUMNS}, (xmax = 0) AS inserted
            "
        ))
        .bind(&install.team_id)
        .bind(&install.team_name)
        .bind(&install.bot_token)
        .bind(&install.bot_user_id)
        .bind(&install.bot_id)
        .bind(&install.scopes)
        .bind(&install.installer_user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(InstallOutcome::from(row))
    }

    #[instrument(skip(self))]
    async fn set_target_channel(&self, team_id: &str, channel_id: &str) -> RepoResult<()> {
        self.update_one(
            team_id,
            sqlx::query(
                "UPDATE installations SET target_channel_id = $2, updated_at = NOW() WHERE team_id = $1",
            )
            .bind(team_id)
            .bind(channel_id),
        )
        .await
    }

    #[instrument(skip(self, channel_ids), fields(count = channel_ids.len()))]
    async fn set_joined_channels(&self, team_id: &str, channel_ids: &[String]) -> RepoResult<()> {
        self.update_one(
            team_id,
            sqlx::query(
                r"
                UPDATE installations
                SET joined_channel_ids = $2, is_all_public_channel = FALSE, updated_at = NOW()
                WHERE team_id = $1
                ",
            )
            .bind(team_id)
            .bind(channel_ids),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn set_all_public_channel(&self, team_id: &str, enabled: bool) -> RepoResult<()> {
        self.update_one(
            team_id,
            sqlx::query(
                "UPDATE installations SET is_all_public_channel = $2, updated_at = NOW() WHERE team_id = $1",
            )
            .bind(team_id)
            .bind(enabled),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn set_trend_num(&self, team_id: &str, trend_num: i32) -> RepoResult<()> {
        self.update_one(
            team_id,
            sqlx::query(
                "UPDATE installations SET selected_trend_num = $2, updated_at = NOW() WHERE team_id = $1",
            )
            .bind(team_id)
            .bind(trend_num),
        )
        .await
    }

    #[instrument(skip(self))]
    async fn delete(&self, team_id: &str) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM installations WHERE team_id = $1")
            .bind(team_id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
