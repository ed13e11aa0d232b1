//! Admin notification rows (the dashboard half of escalation).

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::AdminNotification;

const NOTIFICATION_COLUMNS: &str = "id, building_id, title, body, severity, read, created_at";

/// Insert a notification for a building's administrators.
pub async fn create_notification(
    pool: &SqlitePool,
    building_id: &str,
    title: &str,
    body: &str,
    severity: &str,
) -> Result<AdminNotification> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO admin_notifications (id, building_id, title, body, severity)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(building_id)
    .bind(title)
    .bind(body)
    .bind(severity)
    .execute(pool)
    .await?;

    get_notification(pool, &id).await
}

/// Get a notification by ID.
pub async fn get_notification(pool: &SqlitePool, id: &str) -> Result<AdminNotification> {
    sqlx::query_as::<_, AdminNotification>(&format!(
        r#"
        SELECT {NOTIFICATION_COLUMNS}
        FROM admin_notifications
        WHERE id = ?
        "#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "AdminNotification",
        id: id.to_string(),
    })
}

/// List a building's unread notifications, newest first.
pub async fn list_unread(pool: &SqlitePool, building_id: &str) -> Result<Vec<AdminNotification>> {
    let notifications = sqlx::query_as::<_, AdminNotification>(&format!(
        r#"
        SELECT {NOTIFICATION_COLUMNS}
        FROM admin_notifications
        WHERE building_id = ? AND read = 0
        ORDER BY created_at DESC
        "#,
    ))
    .bind(building_id)
    .fetch_all(pool)
    .await?;

    Ok(notifications)
}

/// Mark a notification as read.
pub async fn mark_read(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE admin_notifications SET read = 1 WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "AdminNotification",
            id: id.to_string(),
        });
    }

    Ok(())
}
