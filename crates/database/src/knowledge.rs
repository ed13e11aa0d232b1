//! Knowledge entry operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::KnowledgeEntry;

const ENTRY_COLUMNS: &str =
    "id, building_id, question, answer, category, keywords, priority, embedding";

/// Create a knowledge entry.
pub async fn create_entry(pool: &SqlitePool, entry: &KnowledgeEntry) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO knowledge_entries
            (id, building_id, question, answer, category, keywords, priority, embedding)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&entry.id)
    .bind(&entry.building_id)
    .bind(&entry.question)
    .bind(&entry.answer)
    .bind(&entry.category)
    .bind(&entry.keywords)
    .bind(entry.priority)
    .bind(&entry.embedding)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::on_unique(e, "KnowledgeEntry", entry.id.clone()))?;

    Ok(())
}

/// Store the embedding vector for an entry (JSON-encoded f32 array).
pub async fn set_embedding(pool: &SqlitePool, id: &str, embedding: &str) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE knowledge_entries SET embedding = ? WHERE id = ?
        "#,
    )
    .bind(embedding)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "KnowledgeEntry",
            id: id.to_string(),
        });
    }

    Ok(())
}

/// List a building's entries that have a stored embedding.
pub async fn list_embedded(pool: &SqlitePool, building_id: &str) -> Result<Vec<KnowledgeEntry>> {
    let entries = sqlx::query_as::<_, KnowledgeEntry>(&format!(
        r#"
        SELECT {ENTRY_COLUMNS}
        FROM knowledge_entries
        WHERE building_id = ? AND embedding IS NOT NULL
        "#,
    ))
    .bind(building_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// Substring match against question, answer, and keywords, ordered by the
/// stored priority. This is the degraded path when embeddings are
/// unavailable or produce no hits.
pub async fn keyword_search(
    pool: &SqlitePool,
    building_id: &str,
    query: &str,
    limit: u32,
) -> Result<Vec<KnowledgeEntry>> {
    let pattern = format!("%{}%", query.trim());

    let entries = sqlx::query_as::<_, KnowledgeEntry>(&format!(
        r#"
        SELECT {ENTRY_COLUMNS}
        FROM knowledge_entries
        WHERE building_id = ?1
          AND (question LIKE ?2 OR answer LIKE ?2 OR keywords LIKE ?2)
        ORDER BY priority DESC
        LIMIT ?3
        "#,
    ))
    .bind(building_id)
    .bind(pattern)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}

/// List all entries for a building.
pub async fn list_for_building(pool: &SqlitePool, building_id: &str) -> Result<Vec<KnowledgeEntry>> {
    let entries = sqlx::query_as::<_, KnowledgeEntry>(&format!(
        r#"
        SELECT {ENTRY_COLUMNS}
        FROM knowledge_entries
        WHERE building_id = ?
        ORDER BY priority DESC
        "#,
    ))
    .bind(building_id)
    .fetch_all(pool)
    .await?;

    Ok(entries)
}
