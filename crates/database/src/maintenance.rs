//! Maintenance request operations.
//!
//! The pipeline only ever creates `open` requests; status transitions are
//! driven from the dashboard.

use sqlx::SqlitePool;
use uuid::Uuid;

use crate::error::{DatabaseError, Result};
use crate::models::MaintenanceRequest;

const REQUEST_COLUMNS: &str = r#"id, building_id, unit_id, resident_id, conversation_id,
       category, description, priority, status, created_at, resolved_at"#;

/// Fields for creating a maintenance request.
#[derive(Debug, Clone)]
pub struct NewMaintenanceRequest {
    pub building_id: String,
    pub unit_id: Option<String>,
    pub resident_id: String,
    pub conversation_id: Option<String>,
    pub category: String,
    pub description: String,
    pub priority: String,
}

/// Create a maintenance request with status `open`.
pub async fn create_request(
    pool: &SqlitePool,
    new: &NewMaintenanceRequest,
) -> Result<MaintenanceRequest> {
    let id = Uuid::new_v4().to_string();

    sqlx::query(
        r#"
        INSERT INTO maintenance_requests
            (id, building_id, unit_id, resident_id, conversation_id,
             category, description, priority)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&id)
    .bind(&new.building_id)
    .bind(&new.unit_id)
    .bind(&new.resident_id)
    .bind(&new.conversation_id)
    .bind(&new.category)
    .bind(&new.description)
    .bind(&new.priority)
    .execute(pool)
    .await?;

    get_request(pool, &id).await
}

/// Get a maintenance request by ID.
pub async fn get_request(pool: &SqlitePool, id: &str) -> Result<MaintenanceRequest> {
    sqlx::query_as::<_, MaintenanceRequest>(&format!(
        r#"
        SELECT {REQUEST_COLUMNS}
        FROM maintenance_requests
        WHERE id = ?
        "#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "MaintenanceRequest",
        id: id.to_string(),
    })
}

/// Whether a status change is allowed. open -> in_progress -> resolved/closed;
/// open can also jump straight to a terminal state.
fn valid_transition(from: &str, to: &str) -> bool {
    matches!(
        (from, to),
        ("open", "in_progress")
            | ("open", "resolved")
            | ("open", "closed")
            | ("in_progress", "resolved")
            | ("in_progress", "closed")
    )
}

/// Move a maintenance request to a new status (dashboard action).
///
/// Sets `resolved_at` when entering a terminal state. Invalid transitions
/// (including reopening) are rejected.
pub async fn update_status(pool: &SqlitePool, id: &str, status: &str) -> Result<MaintenanceRequest> {
    let current = get_request(pool, id).await?;

    if !valid_transition(&current.status, status) {
        return Err(DatabaseError::InvalidTransition {
            entity: "MaintenanceRequest",
            from: current.status,
            to: status.to_string(),
        });
    }

    let terminal = status == "resolved" || status == "closed";
    sqlx::query(
        r#"
        UPDATE maintenance_requests
        SET status = ?,
            resolved_at = CASE WHEN ? THEN datetime('now') ELSE resolved_at END
        WHERE id = ?
        "#,
    )
    .bind(status)
    .bind(terminal)
    .bind(id)
    .execute(pool)
    .await?;

    get_request(pool, id).await
}

/// List a building's maintenance requests, optionally filtered by status.
pub async fn list_for_building(
    pool: &SqlitePool,
    building_id: &str,
    status: Option<&str>,
) -> Result<Vec<MaintenanceRequest>> {
    let requests = match status {
        Some(status) => {
            sqlx::query_as::<_, MaintenanceRequest>(&format!(
                r#"
                SELECT {REQUEST_COLUMNS}
                FROM maintenance_requests
                WHERE building_id = ? AND status = ?
                ORDER BY created_at DESC
                "#,
            ))
            .bind(building_id)
            .bind(status)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, MaintenanceRequest>(&format!(
                r#"
                SELECT {REQUEST_COLUMNS}
                FROM maintenance_requests
                WHERE building_id = ?
                ORDER BY created_at DESC
                "#,
            ))
            .bind(building_id)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(requests)
}
