//! Escalation gating and delivery.
//!
//! Two pure predicates drive the policy, then `escalate` performs the
//! side effects: a dashboard notification row, plus a best-effort email
//! when the building has an admin address configured.

use classifier_core::{Classification, Priority};
use database::models::{Building, Resident};
use mailer::{Email, Mailer};
use sqlx::SqlitePool;
use tracing::{error, info};

/// Whether the automatic reply may go out.
///
/// Suppressed only when the message needs human review AND the priority
/// is elevated. A review flag at low/medium priority is informational and
/// does not block the reply.
pub fn should_auto_reply(classification: &Classification) -> bool {
    !(classification.requires_human_review && classification.priority.is_elevated())
}

/// Whether to alert the building's administrators out-of-band.
///
/// Emergencies always escalate; high priority escalates when flagged for
/// human review.
pub fn should_escalate(classification: &Classification) -> bool {
    classification.priority == Priority::Emergency
        || (classification.priority.is_elevated() && classification.requires_human_review)
}

/// Deliver an escalation: insert the dashboard notification row and email
/// the building admin if an address is configured.
///
/// Both side effects are best-effort; failures are logged and never
/// propagate into the pipeline.
pub async fn escalate(
    pool: &SqlitePool,
    mail: &dyn Mailer,
    building: &Building,
    resident: &Resident,
    classification: &Classification,
    message_text: &str,
) {
    let severity = match classification.priority {
        Priority::Emergency => "urgent",
        _ => "warning",
    };

    let title = format!(
        "{} message from {}",
        classification.priority.as_str(),
        resident.name
    );
    let body = format!(
        "Intent: {}\nPriority: {}\n\n{}",
        classification.intent.as_str(),
        classification.priority.as_str(),
        message_text
    );

    match database::notification::create_notification(pool, &building.id, &title, &body, severity)
        .await
    {
        Ok(notification) => {
            info!(notification_id = %notification.id, severity, "Escalation notification created");
        }
        Err(e) => {
            error!(building_id = %building.id, error = %e, "Failed to create escalation notification");
        }
    }

    let Some(admin_email) = &building.admin_email else {
        info!(building_id = %building.id, "No admin email configured, skipping escalation email");
        return;
    };

    let email = Email {
        to: admin_email.clone(),
        subject: format!("[{}] {}", building.name, title),
        body,
    };

    if let Err(e) = mail.send(email).await {
        error!(building_id = %building.id, error = %e, "Failed to send escalation email");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classifier_core::{Intent, RouteTo};
    use std::collections::BTreeMap;

    fn classification(priority: Priority, requires_human_review: bool) -> Classification {
        Classification {
            intent: Intent::Other,
            priority,
            route_to: RouteTo::Admin,
            suggested_response: Some("ok".to_string()),
            requires_human_review,
            extracted_data: BTreeMap::new(),
        }
    }

    #[test]
    fn test_auto_reply_suppression_table() {
        // (priority, review flag, reply allowed)
        let cases = [
            (Priority::Low, false, true),
            (Priority::Low, true, true),
            (Priority::Medium, false, true),
            (Priority::Medium, true, true),
            (Priority::High, false, true),
            (Priority::High, true, false),
            (Priority::Emergency, false, true),
            (Priority::Emergency, true, false),
        ];

        for (priority, review, expected) in cases {
            let c = classification(priority, review);
            assert_eq!(
                should_auto_reply(&c),
                expected,
                "priority={:?} review={}",
                priority,
                review
            );
        }
    }

    #[test]
    fn test_escalation_table() {
        let cases = [
            (Priority::Low, false, false),
            (Priority::Low, true, false),
            (Priority::Medium, false, false),
            (Priority::Medium, true, false),
            (Priority::High, false, false),
            (Priority::High, true, true),
            (Priority::Emergency, false, true),
            (Priority::Emergency, true, true),
        ];

        for (priority, review, expected) in cases {
            let c = classification(priority, review);
            assert_eq!(
                should_escalate(&c),
                expected,
                "priority={:?} review={}",
                priority,
                review
            );
        }
    }
}
