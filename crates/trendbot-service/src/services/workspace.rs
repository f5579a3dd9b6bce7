//! Installation lookups shared by the services

use trendbot_core::Installation;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Load a workspace's installation; missing is a not-configured no-op
pub(crate) async fn load(ctx: &ServiceContext, team_id: &str) -> ServiceResult<Installation> {
    ctx.installations()
        .find_by_team(team_id)
        .await?
        .ok_or_else(|| ServiceError::not_configured(team_id, "not installed"))
}

/// Load an installation that has a bot token and a target channel
pub(crate) async fn load_configured(ctx: &ServiceContext, team_id: &str) -> ServiceResult<Installation> {
    let installation = load(ctx, team_id).await?;
    if installation.bot_token.is_empty() {
        return Err(ServiceError::not_configured(team_id, "no bot token"));
    }
    if installation.target_channel().is_none() {
        return Err(ServiceError::not_configured(team_id, "no target channel"));
    }
    Ok(installation)
}

/// The target channel of a configured installation
pub(crate) fn target_channel(installation: &Installation) -> ServiceResult<String> {
    installation
        .target_channel()
        .map(String::from)
        .ok_or_else(|| ServiceError::not_configured(&installation.team_id, "no target channel"))
}
