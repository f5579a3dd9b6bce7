//! OAuth install handlers

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
};
use chrono::Utc;
use tracing::info;
use trendbot_service::dto::OAuthRedirectQuery;
use trendbot_service::services::messages;
use trendbot_service::InstallService;

use crate::extractors::ValidatedQuery;
use crate::response::ApiResult;
use crate::state::AppState;

/// Start an install
///
/// GET /slack/install
pub async fn install(State(state): State<AppState>) -> ApiResult<Response> {
    let url = InstallService::new(state.service_context())
        .begin_install()
        .await?;
    Ok((StatusCode::FOUND, [(header::LOCATION, url)]).into_response())
}

/// Finish an install
///
/// GET /slack/oauth_redirect?code&state
pub async fn oauth_redirect(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<OAuthRedirectQuery>,
) -> ApiResult<Html<String>> {
    let outcome = InstallService::new(state.service_context())
        .complete_install(&query.code, &query.state, Utc::now())
        .await?;

    info!(
        team_id = %outcome.installation.team_id,
        first_install = outcome.first_install,
        "Install completed"
    );
    Ok(Html(messages::install_success_html(
        outcome.installation.team_name.as_deref(),
    )))
}
