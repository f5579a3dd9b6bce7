//! Trend announcement
//!
//! Hourly announcements, digest counting and posting, and dedupe pruning.
//! Selection itself lives in [`trendbot_core::trend::selector`].

use chrono::{DateTime, Months, Utc};
use tracing::{info, instrument};

use trendbot_core::events::{ChannelBatchBody, TeamBody};
use trendbot_core::trend::{retain_recent, select_trending, ScanPlan, PRUNE_HORIZON_MONTHS};
use trendbot_core::{Installation, OutgoingMessage, TrendMessage, TrendPeriod};

use super::context::ServiceContext;
use super::error::ServiceResult;
use super::messages;
use super::workspace;

/// How an announcement is introduced and formatted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Announcement {
    Hourly,
    Digest(TrendPeriod),
}

/// Trend service
pub struct TrendService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> TrendService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Read history for each channel since `oldest`, in order
    async fn collect(
        &self,
        installation: &Installation,
        channel_ids: &[String],
        oldest: DateTime<Utc>,
    ) -> ServiceResult<Vec<TrendMessage>> {
        let mut candidates = Vec::new();
        for channel_id in channel_ids {
            let history = self
                .ctx
                .slack()
                .conversation_history(&installation.bot_token, channel_id, oldest)
                .await?;
            candidates.extend(
                history
                    .into_iter()
                    .map(|m| TrendMessage::new(channel_id.as_str(), m.ts, m.reactions)),
            );
        }
        Ok(candidates)
    }

    /// Resolve every permalink first, then post the intro and one message per item.
    ///
    /// A failed permalink aborts before anything is posted.
    async fn announce(
        &self,
        installation: &Installation,
        target: &str,
        chosen: &[TrendMessage],
        kind: Announcement,
    ) -> ServiceResult<()> {
        let token = &installation.bot_token;
        let slack = self.ctx.slack();

        let mut permalinks = Vec::with_capacity(chosen.len());
        for message in chosen {
            permalinks.push(slack.get_permalink(token, &message.channel_id, &message.ts).await?);
        }

        let intro = match kind {
            Announcement::Hourly => messages::TREND_INTRO.to_string(),
            Announcement::Digest(period) => messages::digest_intro(period, chosen.len()),
        };
        slack.post_message(token, &OutgoingMessage::text(target, intro)).await?;

        for (message, permalink) in chosen.iter().zip(&permalinks) {
            let text = match kind {
                Announcement::Hourly => messages::trend_item(&message.channel_id, &message.reactions, permalink),
                Announcement::Digest(_) => messages::digest_item(&message.reactions, permalink),
            };
            slack.post_message(token, &OutgoingMessage::text(target, text)).await?;
        }
        Ok(())
    }

    /// `post-trend-message` task: announce the top new message of a channel batch.
    ///
    /// Returns how many messages were announced.
    #[instrument(skip(self, body), fields(team_id = %body.team_id, channels = body.channel_ids.len()))]
    pub async fn post_trend_message(&self, body: &ChannelBatchBody, now: DateTime<Utc>) -> ServiceResult<usize> {
        let installation = workspace::load_configured(self.ctx, &body.team_id).await?;
        let target = workspace::target_channel(&installation)?;
        let plan = ScanPlan::hourly();

        let already_posted = self.ctx.posted_trends().get(&body.team_id).await?;
        let candidates = self
            .collect(&installation, &body.channel_ids, plan.lookback.oldest(now))
            .await?;
        let selection = select_trending(
            candidates,
            installation.trend_threshold(),
            &already_posted,
            plan.max_results,
        );
        if selection.is_empty() {
            return Ok(0);
        }

        self.announce(&installation, &target, &selection.chosen, Announcement::Hourly)
            .await?;
        self.ctx
            .posted_trends()
            .replace(&body.team_id, &selection.posted)
            .await?;

        info!(announced = selection.chosen.len(), "Posted trend message");
        Ok(selection.chosen.len())
    }

    /// `count-*-trend-message` task: add a batch's top messages to the period accumulator
    #[instrument(skip(self, body), fields(team_id = %body.team_id, channels = body.channel_ids.len()))]
    pub async fn count_trend(
        &self,
        period: TrendPeriod,
        body: &ChannelBatchBody,
        now: DateTime<Utc>,
    ) -> ServiceResult<usize> {
        let installation = workspace::load_configured(self.ctx, &body.team_id).await?;
        let plan = ScanPlan::digest(period);

        let candidates = self
            .collect(&installation, &body.channel_ids, plan.lookback.oldest(now))
            .await?;
        // Any reaction at all qualifies
        let selection = select_trending(candidates, 1, &[], plan.max_results);
        if !selection.is_empty() {
            self.ctx
                .accumulators()
                .append(&body.team_id, period, &selection.chosen)
                .await?;
        }
        Ok(selection.chosen.len())
    }

    /// `post-*-trend-message` task: announce the period's best and clear the accumulator
    #[instrument(skip(self, body), fields(team_id = %body.team_id))]
    pub async fn post_digest(&self, period: TrendPeriod, body: &TeamBody) -> ServiceResult<usize> {
        let installation = workspace::load_configured(self.ctx, &body.team_id).await?;
        let target = workspace::target_channel(&installation)?;
        let plan = ScanPlan::digest(period);

        let accumulated = self.ctx.accumulators().get(&body.team_id, period).await?;
        if accumulated.is_empty() {
            return Ok(0);
        }

        let selection = select_trending(accumulated, 0, &[], plan.max_results);
        self.announce(&installation, &target, &selection.chosen, Announcement::Digest(period))
            .await?;
        self.ctx.accumulators().clear(&body.team_id, period).await?;

        info!(%period, announced = selection.chosen.len(), "Posted digest");
        Ok(selection.chosen.len())
    }

    /// Drop dedupe entries older than the prune horizon; returns how many were removed
    #[instrument(skip(self))]
    pub async fn prune_posted(&self, team_id: &str, now: DateTime<Utc>) -> ServiceResult<usize> {
        let posted = self.ctx.posted_trends().get(team_id).await?;
        let before = posted.len();
        let cutoff = now
            .checked_sub_months(Months::new(PRUNE_HORIZON_MONTHS))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let kept = retain_recent(posted, cutoff);
        let removed = before - kept.len();
        if removed > 0 {
            self.ctx.posted_trends().replace(team_id, &kept).await?;
            info!(removed, kept = kept.len(), "Pruned posted trends");
        }
        Ok(removed)
    }
}
