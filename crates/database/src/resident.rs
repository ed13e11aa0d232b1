//! Resident CRUD and contact-address lookup.

use sqlx::SqlitePool;
use tracing::warn;

use crate::error::{DatabaseError, Result};
use crate::models::Resident;
use crate::validation;

const RESIDENT_COLUMNS: &str = r#"id, building_id, name, role, phone, whatsapp, email,
       whatsapp_opt_in, sms_opt_in, language, unit_id, created_at"#;

/// Create a new resident. Contact fields are validated first.
pub async fn create_resident(pool: &SqlitePool, resident: &Resident) -> Result<()> {
    validation::validate_resident_contacts(resident)?;

    sqlx::query(
        r#"
        INSERT INTO residents
            (id, building_id, name, role, phone, whatsapp, email,
             whatsapp_opt_in, sms_opt_in, language, unit_id)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&resident.id)
    .bind(&resident.building_id)
    .bind(&resident.name)
    .bind(&resident.role)
    .bind(&resident.phone)
    .bind(&resident.whatsapp)
    .bind(&resident.email)
    .bind(resident.whatsapp_opt_in)
    .bind(resident.sms_opt_in)
    .bind(&resident.language)
    .bind(&resident.unit_id)
    .execute(pool)
    .await
    .map_err(|e| DatabaseError::on_unique(e, "Resident", resident.id.clone()))?;

    Ok(())
}

/// Get a resident by ID.
pub async fn get_resident(pool: &SqlitePool, id: &str) -> Result<Resident> {
    sqlx::query_as::<_, Resident>(&format!(
        r#"
        SELECT {RESIDENT_COLUMNS}
        FROM residents
        WHERE id = ?
        "#,
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "Resident",
        id: id.to_string(),
    })
}

/// Find the resident a message came from, by contact address scoped to a
/// building and channel.
///
/// The lookup must be unambiguous: zero matches is `NotFound` (the caller
/// treats the sender as unknown), more than one is `Ambiguous` (a data
/// defect that must be surfaced, never resolved by picking the first row).
pub async fn find_resident_by_contact(
    pool: &SqlitePool,
    building_id: &str,
    address: &str,
    channel: &str,
) -> Result<Resident> {
    let residents = match channel {
        "whatsapp" => {
            sqlx::query_as::<_, Resident>(&format!(
                r#"
                SELECT {RESIDENT_COLUMNS}
                FROM residents
                WHERE building_id = ?1
                  AND (whatsapp = ?2 OR (whatsapp IS NULL AND phone = ?2))
                "#,
            ))
            .bind(building_id)
            .bind(address)
            .fetch_all(pool)
            .await?
        }
        _ => {
            sqlx::query_as::<_, Resident>(&format!(
                r#"
                SELECT {RESIDENT_COLUMNS}
                FROM residents
                WHERE building_id = ?1 AND phone = ?2
                "#,
            ))
            .bind(building_id)
            .bind(address)
            .fetch_all(pool)
            .await?
        }
    };

    let count = residents.len();
    if count > 1 {
        warn!(
            building_id,
            address, count, "ambiguous resident contact lookup"
        );
        return Err(DatabaseError::Ambiguous {
            entity: "Resident",
            key: address.to_string(),
            count,
        });
    }

    residents
        .into_iter()
        .next()
        .ok_or_else(|| DatabaseError::NotFound {
            entity: "Resident",
            id: address.to_string(),
        })
}

/// List residents of a building.
pub async fn list_residents(pool: &SqlitePool, building_id: &str) -> Result<Vec<Resident>> {
    let residents = sqlx::query_as::<_, Resident>(&format!(
        r#"
        SELECT {RESIDENT_COLUMNS}
        FROM residents
        WHERE building_id = ?
        ORDER BY name
        "#,
    ))
    .bind(building_id)
    .fetch_all(pool)
    .await?;

    Ok(residents)
}

/// Update an existing resident. Contact fields are validated first.
pub async fn update_resident(pool: &SqlitePool, resident: &Resident) -> Result<()> {
    validation::validate_resident_contacts(resident)?;

    let result = sqlx::query(
        r#"
        UPDATE residents
        SET name = ?, role = ?, phone = ?, whatsapp = ?, email = ?,
            whatsapp_opt_in = ?, sms_opt_in = ?, language = ?, unit_id = ?
        WHERE id = ? AND building_id = ?
        "#,
    )
    .bind(&resident.name)
    .bind(&resident.role)
    .bind(&resident.phone)
    .bind(&resident.whatsapp)
    .bind(&resident.email)
    .bind(resident.whatsapp_opt_in)
    .bind(resident.sms_opt_in)
    .bind(&resident.language)
    .bind(&resident.unit_id)
    .bind(&resident.id)
    .bind(&resident.building_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::NotFound {
            entity: "Resident",
            id: resident.id.clone(),
        });
    }

    Ok(())
}
