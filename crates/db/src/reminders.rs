//! Reminder queries

use chrono::{DateTime, Utc};
use common::models::{Reminder, ReminderInput};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use uuid::Uuid;

fn map_reminder(row: &SqliteRow) -> Reminder {
    Reminder {
        id: row.get("id"),
        user_id: row.get("user_id"),
        message: row.get("message"),
        execution_time: row.get("execution_time"),
        created_at: row.get("created_at"),
        group_id: row.get("group_id"),
        interval_label: row.get("interval_label"),
    }
}

/// Insert a reminder, assigning a fresh id and creation timestamp
pub async fn insert(
    pool: &SqlitePool,
    user_id: &str,
    input: &ReminderInput,
) -> Result<Reminder, sqlx::Error> {
    let id = Uuid::new_v4().to_string();
    let created_at = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO reminders (id, user_id, message, execution_time, created_at, group_id, interval_label)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(user_id)
    .bind(&input.message)
    .bind(input.execution_time)
    .bind(created_at)
    .bind(input.group_id.as_deref())
    .bind(input.interval_label.as_deref())
    .execute(pool)
    .await?;

    Ok(Reminder {
        id,
        user_id: user_id.to_string(),
        message: input.message.clone(),
        execution_time: input.execution_time,
        created_at,
        group_id: input.group_id.clone(),
        interval_label: input.interval_label.clone(),
    })
}

/// List a user's reminders ordered by execution time
pub async fn list_by_user(pool: &SqlitePool, user_id: &str) -> Result<Vec<Reminder>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, message, execution_time, created_at, group_id, interval_label
        FROM reminders
        WHERE user_id = ?
        ORDER BY execution_time ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_reminder).collect())
}

/// List the reminders of one group, scoped to the owning user
pub async fn list_by_group(
    pool: &SqlitePool,
    group_id: &str,
    user_id: &str,
) -> Result<Vec<Reminder>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, message, execution_time, created_at, group_id, interval_label
        FROM reminders
        WHERE group_id = ? AND user_id = ?
        ORDER BY execution_time ASC
        "#,
    )
    .bind(group_id)
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_reminder).collect())
}

/// Delete a single reminder. Returns whether a row was removed.
pub async fn delete_by_id(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM reminders WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete every reminder in a group. Returns the number of rows removed.
pub async fn delete_by_group(
    pool: &SqlitePool,
    group_id: &str,
    user_id: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM reminders WHERE group_id = ? AND user_id = ?")
        .bind(group_id)
        .bind(user_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected())
}

/// List reminders whose execution time has passed, across all users
pub async fn list_due(pool: &SqlitePool, now: DateTime<Utc>) -> Result<Vec<Reminder>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, message, execution_time, created_at, group_id, interval_label
        FROM reminders
        WHERE execution_time <= ?
        ORDER BY execution_time ASC
        "#,
    )
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(map_reminder).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sqlx::sqlite::SqlitePoolOptions;

    // In-memory SQLite loses its schema if the pool opens a second
    // connection, so tests pin the pool to one.
    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        crate::run_migrations(&pool).await.unwrap();
        pool
    }

    fn input(
        message: &str,
        execution_time: DateTime<Utc>,
        group_id: Option<&str>,
        interval_label: Option<&str>,
    ) -> ReminderInput {
        ReminderInput {
            message: message.to_string(),
            execution_time,
            group_id: group_id.map(str::to_string),
            interval_label: interval_label.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_insert_round_trips() {
        let pool = test_pool().await;
        let at = Utc::now() + Duration::minutes(5);

        let created = insert(
            &pool,
            "U123",
            &input("buy milk", at, Some("g1"), Some("in 5 minutes")),
        )
        .await
        .unwrap();

        let listed = list_by_user(&pool, "U123").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, created.id);
        assert_eq!(listed[0].message, "buy milk");
        assert_eq!(listed[0].execution_time, at);
        assert_eq!(listed[0].group_id.as_deref(), Some("g1"));
        assert_eq!(listed[0].interval_label.as_deref(), Some("in 5 minutes"));
    }

    #[tokio::test]
    async fn test_list_by_user_orders_by_execution_time() {
        let pool = test_pool().await;
        let now = Utc::now();

        insert(&pool, "U123", &input("later", now + Duration::days(3), None, None))
            .await
            .unwrap();
        insert(&pool, "U123", &input("sooner", now + Duration::minutes(5), None, None))
            .await
            .unwrap();
        insert(&pool, "U999", &input("other user", now, None, None))
            .await
            .unwrap();

        let listed = list_by_user(&pool, "U123").await.unwrap();
        let messages: Vec<&str> = listed.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["sooner", "later"]);
    }

    #[tokio::test]
    async fn test_list_by_group_scopes_to_user() {
        let pool = test_pool().await;
        let now = Utc::now();

        insert(&pool, "U123", &input("mine", now, Some("g1"), Some("in 5 minutes")))
            .await
            .unwrap();
        insert(&pool, "U123", &input("mine", now + Duration::days(1), Some("g1"), Some("in 1 day")))
            .await
            .unwrap();
        insert(&pool, "U999", &input("theirs", now, Some("g1"), None))
            .await
            .unwrap();

        let grouped = list_by_group(&pool, "g1", "U123").await.unwrap();
        assert_eq!(grouped.len(), 2);
        assert!(grouped.iter().all(|r| r.user_id == "U123"));
        assert_eq!(grouped[0].interval_label.as_deref(), Some("in 5 minutes"));
    }

    #[tokio::test]
    async fn test_delete_by_id_scoped_to_user() {
        let pool = test_pool().await;
        let created = insert(&pool, "U123", &input("buy milk", Utc::now(), None, None))
            .await
            .unwrap();

        assert!(!delete_by_id(&pool, &created.id, "U999").await.unwrap());
        assert!(delete_by_id(&pool, &created.id, "U123").await.unwrap());
        assert!(!delete_by_id(&pool, &created.id, "U123").await.unwrap());
    }

    #[tokio::test]
    async fn test_delete_by_group_counts_rows() {
        let pool = test_pool().await;
        let now = Utc::now();

        insert(&pool, "U123", &input("a", now, Some("g1"), None)).await.unwrap();
        insert(&pool, "U123", &input("a", now, Some("g1"), None)).await.unwrap();
        insert(&pool, "U123", &input("b", now, Some("g2"), None)).await.unwrap();

        assert_eq!(delete_by_group(&pool, "g1", "U123").await.unwrap(), 2);
        assert_eq!(list_by_user(&pool, "U123").await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_list_due_returns_past_reminders_only() {
        let pool = test_pool().await;
        let now = Utc::now();

        insert(&pool, "U123", &input("past", now - Duration::minutes(1), None, None))
            .await
            .unwrap();
        insert(&pool, "U999", &input("also past", now - Duration::days(1), None, None))
            .await
            .unwrap();
        insert(&pool, "U123", &input("future", now + Duration::minutes(1), None, None))
            .await
            .unwrap();

        let due = list_due(&pool, now).await.unwrap();
        let messages: Vec<&str> = due.iter().map(|r| r.message.as_str()).collect();
        assert_eq!(messages, vec!["also past", "past"]);
    }
}
