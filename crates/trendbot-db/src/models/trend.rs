//! Trend bookkeeping models

use sqlx::types::Json;
use sqlx::FromRow;

use trendbot_core::entities::{PostedMessage, TrendMessage};

#[derive(Debug, Clone, FromRow)]
pub struct PostedTrendsModel {
    pub team_id: String,
    pub messages: Json<Vec<PostedMessage>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct AccumulatorModel {
    pub team_id: String,
    pub period: String,
    pub messages: Json<Vec<TrendMessage>>,
}

#[derive(Debug, Clone, FromRow)]
pub struct RecommendedChannelsModel {
    pub team_id: String,
    pub channel_ids: Vec<String>,
}
