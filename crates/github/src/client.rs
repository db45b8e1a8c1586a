//! GitHub REST API client for committing files via the contents API

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use common::GithubConfig;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use serde_json::json;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("GitHub API error: {status} - {message}")]
    Api { status: u16, message: String },
}

const API_BASE: &str = "https://api.github.com";

/// Commit message attached to every memo file
const COMMIT_MESSAGE: &str = "Add message from LINE";

/// GitHub API client
#[derive(Clone)]
pub struct GithubClient {
    client: reqwest::Client,
    base_url: String,
}

impl Default for GithubClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GithubClient {
    pub fn new() -> Self {
        Self::with_base_url(API_BASE.to_string())
    }

    /// Client against a non-default endpoint (mock servers in tests)
    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }

    fn headers(&self, token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("line-bots/0.1"));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        if let Ok(val) = HeaderValue::from_str(&format!("Bearer {}", token)) {
            headers.insert(AUTHORIZATION, val);
        }
        headers
    }

    /// Create and commit a file via `PUT /repos/{owner}/{repo}/contents/{path}`.
    ///
    /// The directory path and file name are percent-encoded into a single
    /// path segment, matching how the contents API addresses nested files.
    /// Only 201 counts as success; anything else surfaces as an API error.
    pub async fn create_file(
        &self,
        config: &GithubConfig,
        file_name: &str,
        content: &str,
    ) -> Result<(), ClientError> {
        let directory = config.path.strip_prefix('/').unwrap_or(&config.path);
        let file_path = urlencoding::encode(&format!("{}/{}", directory, file_name)).into_owned();
        let url = format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url, config.owner, config.repo, file_path
        );
        debug!("PUT {}", url);

        let body = json!({
            "message": COMMIT_MESSAGE,
            "content": BASE64.encode(content.as_bytes()),
            "committer": {
                "name": config.committer_name,
                "email": config.committer_email,
            },
        });

        let resp = self
            .client
            .put(&url)
            .headers(self.headers(&config.token))
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if status != reqwest::StatusCode::CREATED {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
