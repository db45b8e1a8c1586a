//! LINE messaging API client for reply and push messages

use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("LINE API error: {status} - {message}")]
    Api { status: u16, message: String },
}

const API_BASE: &str = "https://api.line.me";

/// LINE messaging API client
#[derive(Clone)]
pub struct LineClient {
    client: reqwest::Client,
    channel_token: String,
    base_url: String,
}

impl LineClient {
    pub fn new(channel_token: String) -> Self {
        Self::with_base_url(channel_token, API_BASE.to_string())
    }

    /// Client against a non-default endpoint (mock servers in tests)
    pub fn with_base_url(channel_token: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            channel_token,
            base_url,
        }
    }

    /// Reply to a webhook event with a text message
    pub async fn reply_text(&self, reply_token: &str, text: &str) -> Result<(), ClientError> {
        self.send(
            "reply",
            json!({
                "replyToken": reply_token,
                "messages": [{"type": "text", "text": text}],
            }),
        )
        .await
    }

    /// Reply to a webhook event with a flex message
    pub async fn reply_flex(
        &self,
        reply_token: &str,
        alt_text: &str,
        contents: Value,
    ) -> Result<(), ClientError> {
        self.send(
            "reply",
            json!({
                "replyToken": reply_token,
                "messages": [{"type": "flex", "altText": alt_text, "contents": contents}],
            }),
        )
        .await
    }

    /// Push a text message to a user, optionally with a quick reply
    pub async fn push_text(
        &self,
        to: &str,
        text: &str,
        quick_reply: Option<Value>,
    ) -> Result<(), ClientError> {
        let mut message = json!({"type": "text", "text": text});
        if let Some(quick_reply) = quick_reply {
            message["quickReply"] = quick_reply;
        }

        self.send("push", json!({"to": to, "messages": [message]})).await
    }

    async fn send(&self, endpoint: &str, body: Value) -> Result<(), ClientError> {
        let url = format!("{}/v2/bot/message/{}", self.base_url, endpoint);
        debug!("POST {}", url);

        let resp = self
            .client
            .post(&url)
            .bearer_auth(&self.channel_token)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}
