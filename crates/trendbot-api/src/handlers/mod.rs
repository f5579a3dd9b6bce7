//! Route handlers

pub mod events;
pub mod health;
pub mod interactive;
pub mod oauth;
pub mod tasks;
