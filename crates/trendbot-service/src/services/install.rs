//! OAuth install flow and uninstall cleanup

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use tracing::{error, info, instrument, warn};

use trendbot_core::events::FirstMessageBody;
use trendbot_core::trend::FIRST_MESSAGE_DELAY_MINUTES;
use trendbot_core::{DomainError, InstallOutcome, NewInstallation, OutgoingMessage, TaskPayload};

use super::context::{ServiceContext, ServiceSettings};
use super::error::ServiceResult;
use super::messages;
use super::workspace;

/// Random bytes in an OAuth state token
const STATE_BYTES: usize = 20;

/// Install service
pub struct InstallService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> InstallService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Issue a state token and return the authorize URL to redirect to
    #[instrument(skip(self))]
    pub async fn begin_install(&self) -> ServiceResult<String> {
        let state = generate_state();
        self.ctx.oauth_states().save(&state).await?;
        Ok(authorize_url(self.ctx.settings(), &state))
    }

    /// Finish an install: consume the state, exchange the code and store the credentials.
    ///
    /// A first install also schedules the welcome DM.
    #[instrument(skip(self, code, state))]
    pub async fn complete_install(
        &self,
        code: &str,
        state: &str,
        now: DateTime<Utc>,
    ) -> ServiceResult<InstallOutcome> {
        if !self.ctx.oauth_states().consume(state).await? {
            return Err(DomainError::OAuthStateNotFound.into());
        }

        let access = self.ctx.slack().exchange_oauth_code(code).await?;
        let installer = access.authed_user_id.clone();
        let outcome = self
            .ctx
            .installations()
            .save_install(&NewInstallation::from(access))
            .await?;
        let team_id = outcome.installation.team_id.clone();

        info!(team_id = %team_id, first_install = outcome.first_install, "Stored installation");

        if outcome.first_install {
            match installer {
                Some(user_id) => {
                    let task = TaskPayload::SendFirstMessage(FirstMessageBody {
                        team_id: team_id.clone(),
                        user_id,
                    });
                    let execute_at = now + Duration::minutes(FIRST_MESSAGE_DELAY_MINUTES);
                    if let Err(e) = self.ctx.task_queue().enqueue(&task, execute_at).await {
                        error!(team_id = %team_id, error = %e, "Failed to schedule first message");
                    }
                }
                None => warn!(team_id = %team_id, "No installing user, skipping first message"),
            }
        }

        Ok(outcome)
    }

    /// `send-first-message` task: DM the installer
    #[instrument(skip(self, body), fields(team_id = %body.team_id))]
    pub async fn send_first_message(&self, body: &FirstMessageBody) -> ServiceResult<()> {
        let installation = workspace::load(self.ctx, &body.team_id).await?;
        let message = OutgoingMessage::text(&body.user_id, messages::FIRST_MESSAGE);
        self.ctx
            .slack()
            .post_message(&installation.bot_token, &message)
            .await?;
        Ok(())
    }

    /// Delete the installation and every record scoped to the workspace.
    ///
    /// Returns whether an installation existed.
    #[instrument(skip(self))]
    pub async fn uninstall(&self, team_id: &str) -> ServiceResult<bool> {
        let existed = self.ctx.installations().delete(team_id).await?;
        self.ctx.posted_trends().delete(team_id).await?;
        self.ctx.recommended_channels().delete(team_id).await?;
        self.ctx.accumulators().delete_team(team_id).await?;

        info!(existed, "Removed workspace data");
        Ok(existed)
    }
}

fn generate_state() -> String {
    let mut bytes = [0u8; STATE_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Slack authorize URL carrying the app's client ID, scopes and redirect
pub fn authorize_url(settings: &ServiceSettings, state: &str) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("client_id", &settings.client_id)
        .append_pair("scope", &settings.scopes.join(","))
        .append_pair("redirect_uri", &settings.redirect_uri)
        .append_pair("state", state)
        .finish();
    format!("{}?{query}", settings.authorize_url)
}
