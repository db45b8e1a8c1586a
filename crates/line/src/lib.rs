//! LINE webhook verification, event normalization and messaging client

pub mod client;
pub mod events;
pub mod postback;
pub mod validate;
pub mod verify;
pub mod webhooks;

pub use client::{ClientError, LineClient};
pub use validate::{validate_postback, validate_text_message, PostbackAction, PostbackCommand, TextCommand};
pub use verify::verify_signature;
pub use webhooks::{PostbackEvent, TextMessageEvent, WebhookEvent};
