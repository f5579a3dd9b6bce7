//! OAuth access - result of exchanging an install code at `oauth.v2.access`

use super::installation::NewInstallation;

/// Bot credentials granted to a workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthAccess {
    pub team_id: String,
    pub team_name: Option<String>,
    pub access_token: String,
    pub bot_user_id: String,
    pub app_id: Option<String>,
    pub scopes: Vec<String>,
    pub authed_user_id: Option<String>,
}

impl From<OAuthAccess> for NewInstallation {
    fn from(access: OAuthAccess) -> Self {
        NewInstallation {
            team_id: access.team_id,
            team_name: access.team_name,
            bot_token: access.access_token,
            bot_user_id: access.bot_user_id,
            bot_id: access.app_id,
            scopes: access.scopes,
            installer_user_id: access.authed_user_id,
        }
    }
}
