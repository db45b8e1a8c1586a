//! Webhook event extraction and discrimination

use common::Error;
use tracing::{debug, warn};

use crate::events::WebhookRequestBody;

/// A discriminated webhook event, produced once by [`WebhookEvent::parse`].
///
/// Raw fields stay optional; the validators in [`crate::validate`] enforce
/// presence and produce the normalized commands.
#[derive(Debug, Clone)]
pub enum WebhookEvent {
    TextMessage(TextMessageEvent),
    Postback(PostbackEvent),
    Unsupported { event_type: String },
}

#[derive(Debug, Clone)]
pub struct TextMessageEvent {
    pub text: Option<String>,
    pub user_id: Option<String>,
    pub reply_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PostbackEvent {
    pub data: Option<String>,
    pub user_id: Option<String>,
    pub reply_token: Option<String>,
}

impl WebhookEvent {
    /// Parse a webhook body and extract its first event.
    ///
    /// LINE delivers events in a batch; only `events[0]` is processed and
    /// the rest are ignored. Malformed JSON and an absent or empty `events`
    /// array are both parse failures (the caller answers 400).
    pub fn parse(body: &[u8]) -> Result<Self, Error> {
        let body: WebhookRequestBody = serde_json::from_slice(body).map_err(|e| {
            debug!("Webhook body did not deserialize: {}", e);
            Error::Parse("Invalid webhook request body".to_string())
        })?;

        let event = body
            .events
            .into_iter()
            .next()
            .ok_or_else(|| Error::Parse("No events in webhook request".to_string()))?;

        let user_id = event.user_id().map(str::to_string);

        match (event.event_type.as_str(), &event.message, &event.postback) {
            ("message", Some(message), _) if message.message_type == "text" => {
                Ok(WebhookEvent::TextMessage(TextMessageEvent {
                    text: message.text.clone(),
                    user_id,
                    reply_token: event.reply_token,
                }))
            }
            ("postback", _, Some(postback)) => Ok(WebhookEvent::Postback(PostbackEvent {
                data: postback.data.clone(),
                user_id,
                reply_token: event.reply_token,
            })),
            _ => {
                warn!("Unsupported webhook event type: {}", event.event_type);
                Ok(WebhookEvent::Unsupported {
                    event_type: event.event_type,
                })
            }
        }
    }
}
