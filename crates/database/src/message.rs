//! Message log operations. Append-only: messages are never mutated.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::{Message, NewMessage};

const MESSAGE_COLUMNS: &str = r#"id, conversation_id, provider_sid, sender_type, content,
       channel, intent, priority, route_to, requires_human_review, created_at"#;

/// Append a message to a conversation and bump its last-activity timestamp.
pub async fn append_message(pool: &SqlitePool, new: &NewMessage) -> Result<Message> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO messages
            (id, conversation_id, provider_sid, sender_type, content,
             channel, intent, priority, route_to, requires_human_review)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new.conversation_id)
    .bind(&new.provider_sid)
    .bind(&new.sender_type)
    .bind(&new.content)
    .bind(&new.channel)
    .bind(&new.intent)
    .bind(&new.priority)
    .bind(&new.route_to)
    .bind(new.requires_human_review)
    .execute(pool)
    .await
    .map_err(|e| {
        DatabaseError::on_unique(
            e,
            "Message",
            new.provider_sid.clone().unwrap_or_else(|| id.clone()),
        )
    })?;

    sqlx::query(
        r#"
        UPDATE conversations SET last_activity_at = datetime('now') WHERE id = ?
        "#,
    )
    .bind(&new.conversation_id)
    .execute(pool)
    .await?;

    get_message(pool, &id).await
}

/// Get a message by ID.
pub async fn get_message(pool: &SqlitePool, id: &str) -> Result<Message> {
    sqlx::query_as::<_, Message>(&format!(
        r#"
        SELECT {MESSAGE_COLUMNS}
        FROM messages
        WHERE id = ?
        "#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Message",
        id: id.to_string(),
    })
}

/// Whether a message with this transport SID was already persisted for the
/// building. Used as the idempotency check for webhook redelivery.
pub async fn provider_sid_exists(
    pool: &SqlitePool,
    building_id: &str,
    provider_sid: &str,
) -> Result<bool> {
    let found = sqlx::query_scalar::<_, i32>(
        r#"
        SELECT 1
        FROM messages m
        INNER JOIN conversations c ON c.id = m.conversation_id
        WHERE c.building_id = ? AND m.provider_sid = ?
        "#,
    )
    .bind(building_id)
    .bind(provider_sid)
    .fetch_optional(pool)
    .await?;

    Ok(found.is_some())
}

/// List a conversation's messages in chronological order.
pub async fn list_for_conversation(
    pool: &SqlitePool,
    conversation_id: &str,
) -> Result<Vec<Message>> {
    let messages = sqlx::query_as::<_, Message>(&format!(
        r#"
        SELECT {MESSAGE_COLUMNS}
        FROM messages
        WHERE conversation_id = ?
        ORDER BY created_at, id
        "#,
    ))
    .bind(conversation_id)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}
