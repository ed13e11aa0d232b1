//! Maintenance request extraction.

use classifier_core::{Classification, Intent};
use database::models::{MaintenanceRequest, Resident};
use database::NewMaintenanceRequest;
use sqlx::SqlitePool;
use tracing::info;

use crate::error::Result;

/// Category used when the model did not extract one.
const DEFAULT_CATEGORY: &str = "general";

/// Create a maintenance request when the classification calls for one.
///
/// Triggers only for `maintenance_request` intent. Every qualifying
/// message creates a new record; the pipeline does not deduplicate
/// against existing open requests for the same issue.
pub async fn maybe_create_request(
    pool: &SqlitePool,
    classification: &Classification,
    resident: &Resident,
    conversation_id: &str,
    raw_text: &str,
) -> Result<Option<MaintenanceRequest>> {
    if classification.intent != Intent::MaintenanceRequest {
        return Ok(None);
    }

    let category = classification
        .maintenance_category()
        .unwrap_or(DEFAULT_CATEGORY);

    let request = database::maintenance::create_request(
        pool,
        &NewMaintenanceRequest {
            building_id: resident.building_id.clone(),
            unit_id: resident.unit_id.clone(),
            resident_id: resident.id.clone(),
            conversation_id: Some(conversation_id.to_string()),
            category: category.to_string(),
            description: raw_text.to_string(),
            priority: classification.priority.as_str().to_string(),
        },
    )
    .await?;

    info!(request_id = %request.id, category, "Maintenance request created");

    Ok(Some(request))
}

#[cfg(test)]
mod tests {
    use super::*;
    use classifier_core::{Priority, RouteTo};
    use database::models::Building;
    use database::Database;
    use std::collections::BTreeMap;

    async fn seed() -> (Database, Resident, String) {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        db.migrate().await.unwrap();

        let building = Building {
            id: "b1".to_string(),
            name: "Torre del Mar".to_string(),
            whatsapp_number: None,
            sms_number: None,
            admin_email: None,
            language: "es".to_string(),
            tier: "basic".to_string(),
            created_at: String::new(),
        };
        database::building::create_building(db.pool(), &building)
            .await
            .unwrap();

        let resident = Resident {
            id: "r1".to_string(),
            building_id: "b1".to_string(),
            name: "Ana García".to_string(),
            role: "renter".to_string(),
            phone: Some("+15552223333".to_string()),
            whatsapp: None,
            email: None,
            whatsapp_opt_in: true,
            sms_opt_in: true,
            language: "es".to_string(),
            unit_id: None,
            created_at: String::new(),
        };
        database::resident::create_resident(db.pool(), &resident)
            .await
            .unwrap();

        let conversation = database::conversation::create_active(db.pool(), "b1", "r1", "whatsapp")
            .await
            .unwrap();

        (db, resident, conversation.id)
    }

    fn maintenance_classification(category: Option<&str>) -> Classification {
        let mut extracted_data = BTreeMap::new();
        if let Some(c) = category {
            extracted_data.insert(
                "maintenance_category".to_string(),
                serde_json::Value::String(c.to_string()),
            );
        }

        Classification {
            intent: Intent::MaintenanceRequest,
            priority: Priority::High,
            route_to: RouteTo::Admin,
            suggested_response: None,
            requires_human_review: false,
            extracted_data,
        }
    }

    #[tokio::test]
    async fn test_non_maintenance_intent_creates_nothing() {
        let (db, resident, conv_id) = seed().await;

        let mut c = maintenance_classification(None);
        c.intent = Intent::GeneralQuestion;

        let result = maybe_create_request(db.pool(), &c, &resident, &conv_id, "hola")
            .await
            .unwrap();
        assert!(result.is_none());

        let open = database::maintenance::list_for_building(db.pool(), "b1", Some("open"))
            .await
            .unwrap();
        assert!(open.is_empty());
    }

    #[tokio::test]
    async fn test_creates_with_extracted_category() {
        let (db, resident, conv_id) = seed().await;

        let c = maintenance_classification(Some("plumbing"));
        let request = maybe_create_request(db.pool(), &c, &resident, &conv_id, "Hay una fuga")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(request.category, "plumbing");
        assert_eq!(request.status, "open");
        assert_eq!(request.priority, "high");
        assert_eq!(request.description, "Hay una fuga");
    }

    #[tokio::test]
    async fn test_category_defaults_when_absent() {
        let (db, resident, conv_id) = seed().await;

        let c = maintenance_classification(None);
        let request = maybe_create_request(db.pool(), &c, &resident, &conv_id, "algo está roto")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(request.category, "general");
    }

    #[tokio::test]
    async fn test_each_qualifying_message_creates_a_record() {
        let (db, resident, conv_id) = seed().await;

        let c = maintenance_classification(Some("plumbing"));
        maybe_create_request(db.pool(), &c, &resident, &conv_id, "fuga")
            .await
            .unwrap();
        maybe_create_request(db.pool(), &c, &resident, &conv_id, "sigue la fuga")
            .await
            .unwrap();

        let open = database::maintenance::list_for_building(db.pool(), "b1", Some("open"))
            .await
            .unwrap();
        assert_eq!(open.len(), 2);
    }
}
