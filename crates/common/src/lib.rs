//! Common types and utilities for the LINE bots

pub mod config;
pub mod error;
pub mod models;

pub use config::{Config, GithubConfig, WebhookConfig};
pub use error::{Error, Result};
