//! Conversation operations.
//!
//! The uniqueness invariant lives in the `conversations_one_active` partial
//! index; `create_active` surfaces a losing race as `AlreadyExists` so the
//! caller can re-fetch the winner.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::Conversation;

const CONVERSATION_COLUMNS: &str =
    "id, building_id, resident_id, channel, status, last_activity_at, created_at";

/// Find the active conversation for a (building, resident, channel) tuple.
pub async fn find_active(
    pool: &SqlitePool,
    building_id: &str,
    resident_id: &str,
    channel: &str,
) -> Result<Option<Conversation>> {
    let conversation = sqlx::query_as::<_, Conversation>(&format!(
        r#"
        SELECT {CONVERSATION_COLUMNS}
        FROM conversations
        WHERE building_id = ? AND resident_id = ? AND channel = ? AND status = 'active'
        "#,
    ))
    .bind(building_id)
    .bind(resident_id)
    .bind(channel)
    .fetch_optional(pool)
    .await?;

    Ok(conversation)
}

/// Create a new active conversation.
///
/// Fails with `AlreadyExists` when an active conversation for the tuple
/// already exists (including a concurrent writer winning the race).
pub async fn create_active(
    pool: &SqlitePool,
    building_id: &str,
    resident_id: &str,
    channel: &str,
) -> Result<Conversation> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO conversations (id, building_id, resident_id, channel)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(building_id)
    .bind(resident_id)
    .bind(channel)
    .execute(pool)
    .await
    .map_err(|e| {
        DatabaseError::on_unique(e, "Conversation", format!("{resident_id}/{channel}"))
    })?;

    get_conversation(pool, &id).await
}

/// Get a conversation by ID.
pub async fn get_conversation(pool: &SqlitePool, id: &str) -> Result<Conversation> {
    sqlx::query_as::<_, Conversation>(&format!(
        r#"
        SELECT {CONVERSATION_COLUMNS}
        FROM conversations
        WHERE id = ?
        "#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Conversation",
        id: id.to_string(),
    })
}

/// Bump a conversation's last-activity timestamp.
pub async fn touch(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE conversations
        SET last_activity_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Conversation",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// Close a conversation (admin action from the dashboard).
pub async fn close(pool: &SqlitePool, id: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE conversations
        SET status = 'closed'
        WHERE id = ? AND status = 'active'
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Conversation",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List conversations for a building, most recently active first.
pub async fn list_for_building(pool: &SqlitePool, building_id: &str) -> Result<Vec<Conversation>> {
    let conversations = sqlx::query_as::<_, Conversation>(&format!(
        r#"
        SELECT {CONVERSATION_COLUMNS}
        FROM conversations
        WHERE building_id = ?
        ORDER BY last_activity_at DESC
        "#,
    ))
    .bind(building_id)
    .fetch_all(pool)
    .await?;

    Ok(conversations)
}
