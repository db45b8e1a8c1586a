//! Reminder scheduling rules

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use common::models::ReminderInput;
use common::Error;
use sqlx::SqlitePool;
use uuid::Uuid;

/// Minute offsets scheduled for every reminder message
pub const REMINDER_INTERVALS: [(i64, &str); 5] = [
    (5, "in 5 minutes"),
    (1440, "in 1 day"),
    (4320, "in 3 days"),
    (10080, "in 7 days"),
    (43200, "in 30 days"),
];

/// One scheduled delivery within a reminder group
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledTime {
    pub label: String,
    pub execution_time: DateTime<Utc>,
}

/// Outcome of registering a reminder message
#[derive(Debug, Clone)]
pub struct CreateReminderResult {
    pub message: String,
    pub group_id: String,
    pub scheduled: Vec<ScheduledTime>,
}

/// Row shown in the reminder list, one per group
#[derive(Debug, Clone)]
pub struct ReminderListItem {
    pub id: String,
    pub group_id: Option<String>,
    pub message: String,
    pub execution_time: DateTime<Utc>,
}

impl ReminderListItem {
    /// Key carried in postback data. Rows without a group fall back to
    /// their own id.
    pub fn group_key(&self) -> &str {
        self.group_id.as_deref().unwrap_or(&self.id)
    }
}

/// Full view of one reminder group
#[derive(Debug, Clone)]
pub struct ReminderDetail {
    pub group_id: String,
    pub message: String,
    pub scheduled: Vec<ScheduledTime>,
}

/// Register a reminder message as one row per interval, all sharing a
/// freshly assigned group id
pub async fn create_reminder_group(
    pool: &SqlitePool,
    user_id: &str,
    message: &str,
    now: DateTime<Utc>,
) -> Result<CreateReminderResult, Error> {
    let group_id = Uuid::new_v4().to_string();
    let mut scheduled = Vec::with_capacity(REMINDER_INTERVALS.len());

    for (minutes, label) in REMINDER_INTERVALS {
        let input = ReminderInput {
            message: message.to_string(),
            execution_time: now + Duration::minutes(minutes),
            group_id: Some(group_id.clone()),
            interval_label: Some(label.to_string()),
        };
        let reminder = db::reminders::insert(pool, user_id, &input)
            .await
            .map_err(|e| Error::Database(e.to_string()))?;

        scheduled.push(ScheduledTime {
            label: label.to_string(),
            execution_time: reminder.execution_time,
        });
    }

    Ok(CreateReminderResult {
        message: message.to_string(),
        group_id,
        scheduled,
    })
}

/// List a user's reminders collapsed to one entry per group.
///
/// Rows arrive ordered by execution time, so the earliest pending delivery
/// represents its group.
pub async fn list_reminder_groups(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<ReminderListItem>, Error> {
    let reminders = db::reminders::list_by_user(pool, user_id)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

    let mut seen = HashSet::new();
    Ok(reminders
        .into_iter()
        .filter(|r| seen.insert(r.group_id.clone().unwrap_or_else(|| r.id.clone())))
        .map(|r| ReminderListItem {
            id: r.id,
            group_id: r.group_id,
            message: r.message,
            execution_time: r.execution_time,
        })
        .collect())
}

/// Fetch one reminder group, or `None` when the user owns no such group
pub async fn get_reminder_detail(
    pool: &SqlitePool,
    group_id: &str,
    user_id: &str,
) -> Result<Option<ReminderDetail>, Error> {
    let reminders = db::reminders::list_by_group(pool, group_id, user_id)
        .await
        .map_err(|e| Error::Database(e.to_string()))?;

    let first = match reminders.first() {
        Some(first) => first,
        None => return Ok(None),
    };

    Ok(Some(ReminderDetail {
        group_id: group_id.to_string(),
        message: first.message.clone(),
        scheduled: reminders
            .iter()
            .map(|r| ScheduledTime {
                label: r.interval_label.clone().unwrap_or_default(),
                execution_time: r.execution_time,
            })
            .collect(),
    }))
}

/// Delete every pending delivery of a group. Returns the rows removed.
pub async fn delete_reminder_group(
    pool: &SqlitePool,
    group_id: &str,
    user_id: &str,
) -> Result<u64, Error> {
    db::reminders::delete_by_group(pool, group_id, user_id)
        .await
        .map_err(|e| Error::Database(e.to_string()))
}
