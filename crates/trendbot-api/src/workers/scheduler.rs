//! Cron scheduler
//!
//! Fires periodic topics at their cron times, evaluated in the configured
//! time zone.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use cron::Schedule;
use tokio::sync::watch;
use tracing::{error, info};
use trendbot_common::ScheduleConfig;
use trendbot_core::Topic;
use trendbot_service::{ScheduleService, ServiceContext};

#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("invalid cron expression '{expr}' for {topic}: {reason}")]
    InvalidCron {
        topic: Topic,
        expr: String,
        reason: String,
    },

    #[error("invalid timezone '{0}'")]
    InvalidTimezone(String),
}

/// One periodic topic and when it fires
#[derive(Debug, Clone)]
pub struct CronTrigger {
    pub topic: Topic,
    schedule: Schedule,
}

impl CronTrigger {
    pub fn new(topic: Topic, expr: &str) -> Result<Self, SchedulerError> {
        let schedule = Schedule::from_str(expr).map_err(|e| SchedulerError::InvalidCron {
            topic,
            expr: expr.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { topic, schedule })
    }

    /// First firing strictly after `after`
    pub fn next_after(&self, after: DateTime<Utc>, tz: Tz) -> Option<DateTime<Utc>> {
        self.schedule
            .after(&after.with_timezone(&tz))
            .next()
            .map(|t| t.with_timezone(&Utc))
    }
}

/// Periodic trigger loop
#[derive(Debug, Clone)]
pub struct Scheduler {
    triggers: Vec<CronTrigger>,
    tz: Tz,
}

impl Scheduler {
    pub fn from_config(config: &ScheduleConfig) -> Result<Self, SchedulerError> {
        let tz: Tz = config
            .timezone
            .parse()
            .map_err(|_| SchedulerError::InvalidTimezone(config.timezone.clone()))?;

        let triggers = [
            (Topic::TrendScan, &config.hourly),
            (Topic::WeeklyTrend, &config.weekly),
            (Topic::MonthlyTrend, &config.monthly),
            (Topic::RecommendChannel, &config.recommend),
            (Topic::PrunePostedTrends, &config.prune),
        ]
        .into_iter()
        .map(|(topic, expr)| CronTrigger::new(topic, expr))
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { triggers, tz })
    }

    pub fn triggers(&self) -> &[CronTrigger] {
        &self.triggers
    }

    /// Earliest upcoming firing after `now` and every topic due at that instant
    pub fn next_due(&self, now: DateTime<Utc>) -> Option<(DateTime<Utc>, Vec<Topic>)> {
        let upcoming: Vec<(DateTime<Utc>, Topic)> = self
            .triggers
            .iter()
            .filter_map(|t| t.next_after(now, self.tz).map(|at| (at, t.topic)))
            .collect();
        let at = upcoming.iter().map(|(at, _)| *at).min()?;
        let topics = upcoming
            .into_iter()
            .filter(|(t, _)| *t == at)
            .map(|(_, topic)| topic)
            .collect();
        Some((at, topics))
    }

    /// Sleep until each firing and fan out its topics, until shutdown
    pub async fn run(self, ctx: ServiceContext, mut shutdown: watch::Receiver<bool>) {
        info!(triggers = self.triggers.len(), tz = %self.tz, "Scheduler started");

        loop {
            let Some((at, topics)) = self.next_due(Utc::now()) else {
                error!("No upcoming cron firings, scheduler stopping");
                break;
            };
            let wait = (at - Utc::now()).to_std().unwrap_or_default();

            tokio::select! {
                () = tokio::time::sleep(wait) => {
                    for topic in topics {
                        match ScheduleService::new(&ctx).fan_out(topic).await {
                            Ok(published) => info!(%topic, published, "Periodic trigger fired"),
                            Err(e) => error!(%topic, error = %e, "Periodic trigger failed"),
                        }
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Scheduler stopped");
    }
}
