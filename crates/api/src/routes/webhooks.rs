//! LINE webhook routes
//!
//! Both bots share the same boundary: verify the `x-line-signature`
//! header against the raw body, parse the first event, dispatch.

use axum::{body::Bytes, extract::State, http::HeaderMap, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

use crate::error::ApiResult;
use crate::state::AppState;
use line::{verify_signature, WebhookEvent};

#[derive(Serialize)]
pub struct WebhookResponse {
    ok: bool,
}

pub async fn memo(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookResponse>> {
    let event = verify_and_parse(&state, &headers, &body)?;
    state.event_handler.handle_memo(event).await?;

    info!("Processed memo webhook");
    Ok(Json(WebhookResponse { ok: true }))
}

pub async fn reminder(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookResponse>> {
    let event = verify_and_parse(&state, &headers, &body)?;
    state.event_handler.handle_reminder(event).await?;

    info!("Processed reminder webhook");
    Ok(Json(WebhookResponse { ok: true }))
}

fn verify_and_parse(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<WebhookEvent, common::Error> {
    let signature = headers
        .get("x-line-signature")
        .and_then(|v| v.to_str().ok());

    if !verify_signature(signature, &state.config.webhook.channel_secret, body) {
        warn!("Invalid webhook signature");
        return Err(common::Error::Signature);
    }

    WebhookEvent::parse(body)
}
