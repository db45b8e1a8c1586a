//! Webhook dispatch and reminder scheduling

pub mod handler;
pub mod presenter;
pub mod reminders;
pub mod sweep;


pub use handler::EventHandler;
pub use sweep::{SweepConfig, SweepService, SweepStats};
