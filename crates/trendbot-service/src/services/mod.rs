//! Business logic services
//!
//! Each service borrows the [`ServiceContext`] and handles one slice of the
//! bot: trend announcements, channel membership, the interactive router, the
//! install flow, and the routing of topic messages and task callbacks.

pub mod batch;
pub mod channel;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod home;
pub mod install;
pub mod interactive;
pub mod messages;
pub mod recommend;
pub mod schedule;
pub mod trend;
mod workspace;

// Re-export all services for convenience
pub use batch::ChannelBatchService;
pub use channel::ChannelService;
pub use context::{ServiceContext, ServiceContextBuilder, ServiceSettings};
pub use dispatch::{DispatchService, TaskOutcome};
pub use error::{OrSkip, ServiceError, ServiceResult};
pub use event::EventService;
pub use home::{home_view, HomeService};
pub use install::{authorize_url, InstallService};
pub use interactive::InteractiveService;
pub use recommend::RecommendService;
pub use schedule::ScheduleService;
pub use trend::TrendService;
