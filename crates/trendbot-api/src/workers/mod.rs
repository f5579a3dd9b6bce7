//! Background workers
//!
//! Each worker runs until the shared shutdown flag flips to `true`.

mod scheduler;
mod subscriber;

pub use scheduler::{CronTrigger, Scheduler, SchedulerError};
pub use subscriber::run_subscriber;
