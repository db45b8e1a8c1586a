//! LINE webhook payload types
//!
//! Serde mirrors of the wire format (camelCase). Fields that LINE marks
//! optional stay optional here; required-field enforcement belongs to the
//! validators, not the deserializer.

use serde::Deserialize;
use std::collections::HashMap;

/// Webhook request body: `{destination, events: [...]}`
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookRequestBody {
    pub destination: Option<String>,
    #[serde(default)]
    pub events: Vec<Event>,
}

/// A single webhook event, before discrimination
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "type")]
    pub event_type: String,
    pub reply_token: Option<String>,
    pub mode: Option<String>,
    pub timestamp: Option<i64>,
    pub source: Option<EventSource>,
    pub webhook_event_id: Option<String>,
    pub message: Option<Message>,
    pub postback: Option<Postback>,
}

impl Event {
    /// User id of the sender. Present for user and group sources only.
    pub fn user_id(&self) -> Option<&str> {
        match &self.source {
            Some(EventSource::User { user_id }) => Some(user_id),
            Some(EventSource::Group { user_id, .. }) => user_id.as_deref(),
            _ => None,
        }
    }
}

/// Where the event came from
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum EventSource {
    #[serde(rename_all = "camelCase")]
    User { user_id: String },
    #[serde(rename_all = "camelCase")]
    Group {
        group_id: String,
        user_id: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Room {
        room_id: String,
        user_id: Option<String>,
    },
    #[serde(other)]
    Unknown,
}

/// Message attached to a `message` event
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub message_type: String,
    pub quote_token: Option<String>,
    pub text: Option<String>,
}

/// Postback attached to a `postback` event
#[derive(Debug, Clone, Deserialize)]
pub struct Postback {
    pub data: Option<String>,
    pub params: Option<HashMap<String, String>>,
}
