//! Unit CRUD operations.

use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::Unit;

/// Create a new unit.
pub async fn create_unit(pool: &SqlitePool, unit: &Unit) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO units (id, building_id, unit_number, owner_id, renter_id)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&unit.id)
    .bind(&unit.building_id)
    .bind(&unit.unit_number)
    .bind(&unit.owner_id)
    .bind(&unit.renter_id)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::on_unique(e, "Unit", unit.id.clone()))?;

    Ok(())
}

/// Get a unit by ID.
pub async fn get_unit(pool: &SqlitePool, id: &str) -> Result<Unit> {
    sqlx::query_as::<_, Unit>(
        r#"
        SELECT id, building_id, unit_number, owner_id, renter_id
        FROM units
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Unit",
        id: id.to_string(),
    })
}

/// Update a unit's occupancy (owner/renter references).
pub async fn update_unit(pool: &SqlitePool, unit: &Unit) -> Result<()> {
    let result = sqlx::query(
        r#"
        UPDATE units
        SET unit_number = ?, owner_id = ?, renter_id = ?
        WHERE id = ? AND building_id = ?
        "#,
    )
    .bind(&unit.unit_number)
    .bind(&unit.owner_id)
    .bind(&unit.renter_id)
    .bind(&unit.id)
    .bind(&unit.building_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Unit",
            id: unit.id.clone(),
        });
    }

    Ok(())
}

/// List units of a building.
pub async fn list_units(pool: &SqlitePool, building_id: &str) -> Result<Vec<Unit>> {
    let units = sqlx::query_as::<_, Unit>(
        r#"
        SELECT id, building_id, unit_number, owner_id, renter_id
        FROM units
        WHERE building_id = ?
        ORDER BY unit_number
        "#,
    )
    .bind(building_id)
    .fetch_all(pool)
    .await?;

    Ok(units)
}
