//! Building (tenant) CRUD operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Building;

/// Create a new building.
pub async fn create_building(pool: &SqlitePool, building: &Building) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO buildings (id, name, whatsapp_number, sms_number, admin_email, language, tier)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&building.id)
    .bind(&building.name)
    .bind(&building.whatsapp_number)
    .bind(&building.sms_number)
    .bind(&building.admin_email)
    .bind(&building.language)
    .bind(&building.tier)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::on_unique(e, "Building", building.id.clone()))?;

    Ok(())
}

/// Get a building by ID.
pub async fn get_building(pool: &SqlitePool, id: &str) -> Result<Building> {
    sqlx::query_as::<_, Building>(
        r#"
        SELECT id, name, whatsapp_number, sms_number, admin_email, language, tier, created_at
        FROM buildings
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Building",
        id: id.to_string(),
    })
}

/// Find the building that owns an inbound number on the given channel.
///
/// Returns `Ok(None)` when no building is provisioned with that number;
/// the webhook treats that as an unrecognized recipient, not an error.
pub async fn find_building_by_inbound_number(
    pool: &SqlitePool,
    number: &str,
    channel: &str,
) -> Result<Option<Building>> {
    let column = match channel {
        "whatsapp" => "whatsapp_number",
        _ => "sms_number",
    };

    let building = sqlx::query_as::<_, Building>(&format!(
        r#"
        SELECT id, name, whatsapp_number, sms_number, admin_email, language, tier, created_at
        FROM buildings
        WHERE {column} = ?
        "#,
    ))
    .bind(number)
    .fetch_optional(pool)
    .await?;

    Ok(building)
}

/// Update a building's mutable configuration (identity fields stay fixed).
pub async fn update_building(pool: &SqlitePool, building: &Building) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE buildings
        SET name = ?, whatsapp_number = ?, sms_number = ?, admin_email = ?, language = ?, tier = ?
        WHERE id = ?
        "#,
    )
    .bind(&building.name)
    .bind(&building.whatsapp_number)
    .bind(&building.sms_number)
    .bind(&building.admin_email)
    .bind(&building.language)
    .bind(&building.tier)
    .bind(&building.id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Building",
            id: building.id.clone(),
        });
    }

    Ok(())
}

/// List all buildings.
pub async fn list_buildings(pool: &SqlitePool) -> Result<Vec<Building>> {
    let buildings = sqlx::query_as::<_, Building>(
        r#"
        SELECT id, name, whatsapp_number, sms_number, admin_email, language, tier, created_at
        FROM buildings
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(buildings)
}
