//! # trendbot-service
//!
//! Application layer: the services behind every HTTP endpoint, topic and
//! task queue, plus the request and response DTOs.

pub mod dto;
pub mod services;

pub use services::{
    DispatchService, EventService, HomeService, InstallService, InteractiveService,
    ScheduleService, ServiceContext, ServiceError, ServiceResult, ServiceSettings, TaskOutcome,
};
