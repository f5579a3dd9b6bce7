//! Domain entities - core business objects

mod channel;
mod installation;
mod message;
mod oauth;
mod reaction;
mod trend;

pub use channel::{member_channel_ids, non_member_channel_ids, sort_by_members, ChannelInfo};
pub use installation::{
    InstallOutcome, Installation, NewInstallation, DEFAULT_TREND_NUM, TREND_NUM_CHOICES,
};
pub use message::HistoryMessage;
pub use oauth::OAuthAccess;
pub use reaction::{reaction_summary, total_reaction_count, Reaction};
pub use trend::{PostedMessage, TrendMessage, TrendPeriod};
