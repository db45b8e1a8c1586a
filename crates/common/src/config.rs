//! Application configuration

use std::env;

use crate::error::{Error, Result};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Due-reminder sweep interval in seconds (0 = disabled)
    pub sweep_interval_secs: u64,
    pub webhook: WebhookConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Fails when the LINE webhook credentials are missing; everything
    /// else falls back to a default.
    pub fn from_env() -> Result<Self> {
        let webhook = WebhookConfig::from_env()?;

        Ok(Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite:line_bots.db".to_string()),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            sweep_interval_secs: env::var("SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            webhook,
        })
    }
}

/// LINE webhook credentials plus the optional user allow-list
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub channel_secret: String,
    pub channel_token: String,
    pub allowed_user_id: Option<String>,
}

impl WebhookConfig {
    /// Build a webhook config, collecting every missing field before failing.
    pub fn new(
        channel_secret: Option<String>,
        channel_token: Option<String>,
        allowed_user_id: Option<String>,
    ) -> Result<Self> {
        let mut errors = Vec::new();

        let channel_secret = channel_secret.filter(|s| !s.is_empty());
        let channel_token = channel_token.filter(|s| !s.is_empty());

        if channel_secret.is_none() {
            errors.push("channelSecret is required".to_string());
        }
        if channel_token.is_none() {
            errors.push("channelToken is required".to_string());
        }

        match (channel_secret, channel_token) {
            (Some(channel_secret), Some(channel_token)) => Ok(Self {
                channel_secret,
                channel_token,
                allowed_user_id: allowed_user_id.filter(|s| !s.is_empty()),
            }),
            _ => Err(Error::Config(errors)),
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::new(
            env::var("LINE_CHANNEL_SECRET").ok(),
            env::var("LINE_CHANNEL_TOKEN").ok(),
            env::var("LINE_OWN_USER_ID").ok(),
        )
    }

    /// Allow-list check. Open mode (no allow-list configured) admits everyone.
    pub fn is_allowed_user(&self, user_id: &str) -> bool {
        match &self.allowed_user_id {
            Some(allowed) => user_id == allowed,
            None => true,
        }
    }
}

const DEFAULT_COMMITTER_NAME: &str = "Line Webhook";
const DEFAULT_COMMITTER_EMAIL: &str = "line_webhook@example.com";

/// GitHub contents-API settings for the memo bot
#[derive(Debug, Clone)]
pub struct GithubConfig {
    pub token: String,
    pub owner: String,
    pub repo: String,
    /// Directory inside the repository where memo files are committed
    pub path: String,
    pub committer_name: String,
    pub committer_email: String,
}

impl GithubConfig {
    /// Resolve the GitHub settings from the environment, listing every
    /// missing variable at once. Resolved per memo request, so an
    /// unconfigured deployment still serves the reminder endpoints.
    pub fn from_env() -> Result<Self> {
        let mut missing = Vec::new();
        let mut require = |name: &str| match env_non_empty(name) {
            Some(value) => value,
            None => {
                missing.push(format!("{} is required", name));
                String::new()
            }
        };

        let token = require("GITHUB_TOKEN");
        let owner = require("GITHUB_REPO_OWNER");
        let repo = require("GITHUB_REPO_NAME");
        let path = require("GITHUB_PUSH_DIRECTORY_PATH");

        if !missing.is_empty() {
            return Err(Error::Config(missing));
        }

        Ok(Self {
            token,
            owner,
            repo,
            path,
            committer_name: env_non_empty("GITHUB_COMMITTER_NAME")
                .unwrap_or_else(|| DEFAULT_COMMITTER_NAME.to_string()),
            committer_email: env_non_empty("GITHUB_COMMITTER_EMAIL")
                .unwrap_or_else(|| DEFAULT_COMMITTER_EMAIL.to_string()),
        })
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}
