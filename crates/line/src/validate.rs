//! Event validators
//!
//! Each validator checks every required field and fails with the full list
//! of violations rather than stopping at the first. A command is only ever
//! constructed from input that passed all checks.

use common::Error;

use crate::postback::parse_data;
use crate::webhooks::{PostbackEvent, TextMessageEvent};

/// Normalized text-message command: trimmed, non-empty text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextCommand {
    pub text: String,
    pub user_id: String,
    pub reply_token: String,
}

/// Normalized postback command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostbackCommand {
    pub action: PostbackAction,
    pub user_id: String,
    pub reply_token: String,
}

/// What a postback button asked for.
///
/// Types this layer does not know become `Other`; rejecting them is the
/// dispatcher's call, not a validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostbackAction {
    List,
    Detail { group_id: String },
    Delete { group_id: String },
    Other(String),
}

/// Validate a text-message event into a [`TextCommand`].
///
/// Requires text that is non-empty after trimming, a user id and a reply
/// token; the command carries the trimmed text.
pub fn validate_text_message(event: &TextMessageEvent) -> Result<TextCommand, Error> {
    let mut errors = Vec::new();

    let text = required(&event.text, "message", &mut errors);
    let user_id = required(&event.user_id, "userId", &mut errors);
    let reply_token = required(&event.reply_token, "replyToken", &mut errors);

    if !errors.is_empty() {
        return Err(Error::Validation {
            context: "Invalid message event data".to_string(),
            errors,
        });
    }

    Ok(TextCommand {
        text: text.trim().to_string(),
        user_id,
        reply_token,
    })
}

/// Validate a postback event into a [`PostbackCommand`].
///
/// Checks the common fields, parses `data` with [`parse_data`] and applies
/// the per-command rules: `delete` and `detail` need a `groupId`, `list`
/// needs nothing extra.
pub fn validate_postback(event: &PostbackEvent) -> Result<PostbackCommand, Error> {
    let mut errors = Vec::new();

    let data = required(&event.data, "data", &mut errors);
    let user_id = required(&event.user_id, "userId", &mut errors);
    let reply_token = required(&event.reply_token, "replyToken", &mut errors);

    let parsed = parse_data(&data);
    let postback_type = parsed.get("type").map(String::as_str).unwrap_or("");

    let group_id = |errors: &mut Vec<String>| match parsed.get("groupId") {
        Some(g) if !g.trim().is_empty() => g.clone(),
        _ => {
            errors.push("data must contain groupId".to_string());
            String::new()
        }
    };

    let (context, action) = match postback_type {
        "list" => (
            "Invalid postback event data: show reminder list",
            PostbackAction::List,
        ),
        "detail" => (
            "Invalid postback event data: show reminder detail",
            PostbackAction::Detail {
                group_id: group_id(&mut errors),
            },
        ),
        "delete" => (
            "Invalid postback event data: delete reminder",
            PostbackAction::Delete {
                group_id: group_id(&mut errors),
            },
        ),
        other => (
            "Invalid postback event data",
            PostbackAction::Other(other.to_string()),
        ),
    };

    if !errors.is_empty() {
        return Err(Error::Validation {
            context: context.to_string(),
            errors,
        });
    }

    Ok(PostbackCommand {
        action,
        user_id,
        reply_token,
    })
}

/// Presence check shared by both validators: `None`, empty and
/// whitespace-only all count as missing. Returns the raw value (or an empty
/// placeholder once an error is recorded).
fn required(value: &Option<String>, field: &str, errors: &mut Vec<String>) -> String {
    match value {
        Some(v) if !v.trim().is_empty() => v.clone(),
        _ => {
            errors.push(format!("{} is required and cannot be empty", field));
            String::new()
        }
    }
}
