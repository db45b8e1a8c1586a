//! Manual sweep trigger

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Serialize)]
pub struct SweepResponse {
    status: &'static str,
    due: usize,
    sent: usize,
    failed: usize,
}

/// Run one reminder delivery pass outside the schedule
pub async fn trigger(State(state): State<Arc<AppState>>) -> ApiResult<Json<SweepResponse>> {
    let stats = processor::sweep::sweep_due(&state.pool, &state.line).await?;

    info!(
        "Manual sweep delivered {}/{} due reminders",
        stats.sent, stats.due
    );

    Ok(Json(SweepResponse {
        status: "ok",
        due: stats.due,
        sent: stats.sent,
        failed: stats.failed,
    }))
}
