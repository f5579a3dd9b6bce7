//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use trendbot_core::error::DomainError;

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Create an "installation not found" error
pub fn installation_not_found(team_id: &str) -> DomainError {
    DomainError::InstallationNotFound(team_id.to_string())
}
