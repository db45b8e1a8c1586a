//! Formatting of reminder data into LINE message payloads

use chrono::{DateTime, Utc};
use common::models::Reminder;
use serde_json::{json, Value};

use crate::reminders::{CreateReminderResult, ReminderDetail, ReminderListItem};

/// Longest button label LINE accepts
const MAX_BUTTON_LABEL_CHARS: usize = 20;

/// Buttons per flex bubble; longer lists become a carousel
const BUTTONS_PER_BUBBLE: usize = 10;

fn format_time(time: &DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M").to_string()
}

fn truncate_label(message: &str) -> String {
    message.chars().take(MAX_BUTTON_LABEL_CHARS).collect()
}

/// Reply confirming a registered reminder, listing its delivery schedule
pub fn created_reminder_message(result: &CreateReminderResult) -> String {
    let times = result
        .scheduled
        .iter()
        .map(|t| format!("・ {} ({})", t.label, format_time(&t.execution_time)))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "✅ Reminder registered\n\n📝 {}\n\n📅 Scheduled:\n{}",
        result.message, times
    )
}

/// Button menu of the user's reminder groups. Each button opens the
/// group's detail view; menus over ten entries split into a carousel.
pub fn reminder_list_flex(items: &[ReminderListItem]) -> Value {
    let buttons: Vec<Value> = items
        .iter()
        .map(|item| {
            json!({
                "type": "button",
                "action": {
                    "type": "postback",
                    "label": truncate_label(&item.message),
                    "data": format!("type=detail&groupId={}", item.group_key()),
                },
            })
        })
        .collect();

    if buttons.len() <= BUTTONS_PER_BUBBLE {
        return button_bubble(buttons);
    }

    let bubbles: Vec<Value> = buttons
        .chunks(BUTTONS_PER_BUBBLE)
        .map(|chunk| button_bubble(chunk.to_vec()))
        .collect();

    json!({"type": "carousel", "contents": bubbles})
}

fn button_bubble(buttons: Vec<Value>) -> Value {
    json!({
        "type": "bubble",
        "body": {"type": "box", "layout": "vertical", "contents": buttons},
    })
}

/// Detail bubble for one reminder group with a delete button in the footer
pub fn reminder_detail_flex(detail: &ReminderDetail) -> Value {
    let mut contents = vec![
        json!({"type": "text", "text": detail.message, "weight": "bold"}),
        json!({"type": "spacer", "size": "sm"}),
    ];

    for time in &detail.scheduled {
        contents.push(json!({
            "type": "text",
            "text": format!("{}: {}", time.label, format_time(&time.execution_time)),
            "size": "sm",
        }));
    }

    json!({
        "type": "bubble",
        "body": {"type": "box", "layout": "vertical", "contents": contents},
        "footer": {
            "type": "box",
            "layout": "vertical",
            "contents": [{
                "type": "button",
                "action": {
                    "type": "postback",
                    "label": "🗑 Delete",
                    "data": format!("type=delete&groupId={}", detail.group_id),
                },
                "style": "secondary",
            }],
        },
    })
}

/// Push message for a due reminder
pub fn due_reminder_message(reminder: &Reminder) -> String {
    match &reminder.interval_label {
        Some(label) => format!("🔔 Reminder [{}]\n\n{}", label, reminder.message),
        None => format!("🔔 Reminder\n\n{}", reminder.message),
    }
}

/// Quick reply offering to delete the rest of the reminder's group
pub fn delete_quick_reply(group_key: &str) -> Value {
    json!({
        "items": [{
            "type": "action",
            "action": {
                "type": "postback",
                "label": "Delete reminder",
                "data": format!("type=delete&groupId={}", group_key),
            },
        }],
    })
}
