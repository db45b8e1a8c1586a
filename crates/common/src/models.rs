//! Domain models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A scheduled reminder row.
///
/// Reminders created from one message share a `group_id`; each row in the
/// group fires at a different offset and is deleted once delivered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reminder {
    pub id: String,
    pub user_id: String,
    pub message: String,
    pub execution_time: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub group_id: Option<String>,
    /// Human-readable offset, e.g. "in 3 days"
    pub interval_label: Option<String>,
}

/// Insert shape for a reminder; id and created_at are assigned by the store
#[derive(Debug, Clone)]
pub struct ReminderInput {
    pub message: String,
    pub execution_time: DateTime<Utc>,
    pub group_id: Option<String>,
    pub interval_label: Option<String>,
}
