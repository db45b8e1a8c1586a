//! Scheduled reminder delivery

use std::time::Duration;

use chrono::Utc;
use common::models::Reminder;
use common::Error;
use line::LineClient;
use sqlx::SqlitePool;
use tokio::time::interval;
use tracing::{error, info};

use crate::presenter;

/// Configuration for the sweep service
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Interval between delivery passes
    pub interval: Duration,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
        }
    }
}

/// Outcome of one delivery pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepStats {
    pub due: usize,
    pub sent: usize,
    pub failed: usize,
}

/// Background service that pushes due reminders to their users
pub struct SweepService {
    pool: SqlitePool,
    line: LineClient,
    config: SweepConfig,
}

impl SweepService {
    pub fn new(pool: SqlitePool, line: LineClient, config: SweepConfig) -> Self {
        Self { pool, line, config }
    }

    /// Start the background delivery loop
    pub async fn run(self) {
        info!(
            "Starting sweep service (interval: {:?})",
            self.config.interval
        );

        let mut ticker = interval(self.config.interval);

        // Skip the first immediate tick - let the server start up first
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match sweep_due(&self.pool, &self.line).await {
                Ok(stats) if stats.due > 0 => {
                    info!(
                        "Delivered {}/{} due reminders ({} failed)",
                        stats.sent, stats.due, stats.failed
                    );
                }
                Ok(_) => {}
                Err(e) => error!("Sweep failed: {}", e),
            }
        }
    }
}

/// Run a single delivery pass over every due reminder.
///
/// Each reminder is pushed and then deleted. A failed push leaves its row
/// in place for the next pass and does not stop the others.
pub async fn sweep_due(pool: &SqlitePool, line: &LineClient) -> Result<SweepStats, Error> {
    let due = db::reminders::list_due(pool, Utc::now())
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

    let mut stats = SweepStats {
        due: due.len(),
        ..Default::default()
    };

    for reminder in due {
        match deliver(pool, line, &reminder).await {
            Ok(()) => stats.sent += 1,
            Err(e) => {
                error!("Failed to deliver reminder {}: {}", reminder.id, e);
                stats.failed += 1;
            }
        }
    }

    Ok(stats)
}

async fn deliver(pool: &SqlitePool, line: &LineClient, reminder: &Reminder) -> Result<(), Error> {
    let text = presenter::due_reminder_message(reminder);
    let group_key = reminder.group_id.as_deref().unwrap_or(&reminder.id);
    let quick_reply = presenter::delete_quick_reply(group_key);

    line.push_text(&reminder.user_id, &text, Some(quick_reply))
        .await
        .map_err(|e| Error::Downstream(e.to_string()))?;

    // Delete only after the push succeeded so undelivered rows are retried
    db::reminders::delete_by_id(pool, &reminder.id, &reminder.user_id)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

    Ok(())
}
