//! API routes

pub mod health;
pub mod sweep;
pub mod webhooks;
