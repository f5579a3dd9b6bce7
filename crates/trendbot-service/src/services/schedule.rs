//! Periodic fan-out
//!
//! A cron trigger names a periodic topic; every eligible workspace gets its own
//! topic message so one failing workspace never blocks the others.

use tracing::{error, info, instrument, warn};

use trendbot_core::{Installation, Topic, TopicMessage};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Schedule service
pub struct ScheduleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ScheduleService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Publish `topic` once per eligible workspace; returns how many were published
    #[instrument(skip(self))]
    pub async fn fan_out(&self, topic: Topic) -> ServiceResult<usize> {
        let candidates = match topic {
            Topic::PrunePostedTrends => self.ctx.installations().list_all().await?,
            Topic::TrendScan | Topic::WeeklyTrend | Topic::MonthlyTrend | Topic::RecommendChannel => {
                self.ctx.installations().list_with_target_channel().await?
            }
            _ => {
                warn!("Not a periodic topic");
                return Ok(0);
            }
        };

        let test_team_id = self.ctx.settings().test_team_id.as_deref();
        let mut published = 0;
        for installation in candidates
            .iter()
            .filter(|inst| is_eligible(topic, inst, test_team_id))
        {
            let Some(message) = TopicMessage::periodic(topic, installation.team_id.as_str()) else {
                continue;
            };
            match self.ctx.publisher().publish(&message).await {
                Ok(()) => published += 1,
                Err(e) => {
                    error!(team_id = %installation.team_id, error = %e, "Failed to publish periodic message");
                }
            }
        }

        info!(published, "Fanned out periodic topic");
        Ok(published)
    }
}

/// Membership rule for a periodic topic
pub fn is_eligible(topic: Topic, installation: &Installation, test_team_id: Option<&str>) -> bool {
    if test_team_id.is_some_and(|id| id != installation.team_id) {
        return false;
    }
    match topic {
        Topic::PrunePostedTrends => true,
        Topic::RecommendChannel => {
            installation.target_channel().is_some() && !installation.is_all_public_channel
        }
        Topic::TrendScan | Topic::WeeklyTrend | Topic::MonthlyTrend => {
            installation.target_channel().is_some()
        }
        _ => false,
    }
}
