//! Recipient routing: who besides the admin gets a forwarded copy.

use classifier_core::{RouteTo, SenderRole};
use database::models::{Resident, Unit};
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::normalizer::Channel;
use crate::sender::DeliverySender;
use crate::texts;

/// The decision table, as resident ids. Pure; gating by opt-in and
/// contact address happens at dispatch.
///
/// | route_to | sender role | forwards to |
/// |----------|-------------|-------------|
/// | admin    | any         | nobody (admin sees the dashboard) |
/// | owner    | renter      | the unit's owner |
/// | owner    | owner       | nobody |
/// | renter   | owner       | the unit's renter |
/// | renter   | renter      | nobody |
/// | both     | any         | owner and renter, minus the sender |
pub fn forward_recipients(
    route_to: RouteTo,
    sender_role: SenderRole,
    unit: &Unit,
    sender_id: &str,
) -> Vec<String> {
    let mut recipients = Vec::new();

    match (route_to, sender_role) {
        (RouteTo::Admin, _) => {}
        (RouteTo::Owner, SenderRole::Renter) => {
            recipients.push(unit.owner_id.clone());
        }
        (RouteTo::Owner, SenderRole::Owner) => {}
        (RouteTo::Renter, SenderRole::Owner) => {
            recipients.extend(unit.renter_id.clone());
        }
        (RouteTo::Renter, SenderRole::Renter) => {}
        (RouteTo::Both, _) => {
            recipients.push(unit.owner_id.clone());
            recipients.extend(unit.renter_id.clone());
        }
    }

    recipients.retain(|id| id != sender_id);
    recipients
}

/// Forward the original message to the other party(ies) per the decision
/// table.
///
/// Each forward is independent: a recipient without an opted-in contact
/// address on the channel is skipped, and a delivery failure is logged
/// without affecting the other forward or the pipeline. Returns the number
/// of forwards actually delivered.
pub async fn dispatch_forwards(
    pool: &SqlitePool,
    delivery: &dyn DeliverySender,
    route_to: RouteTo,
    sender_resident: &Resident,
    unit: &Unit,
    channel: Channel,
    from_number: &str,
    raw_text: &str,
) -> usize {
    let sender_role = SenderRole::from_str(&sender_resident.role);
    let recipients = forward_recipients(route_to, sender_role, unit, &sender_resident.id);

    let mut delivered = 0;

    for recipient_id in recipients {
        let recipient = match database::resident::get_resident(pool, &recipient_id).await {
            Ok(r) => r,
            Err(e) => {
                warn!(recipient_id, error = %e, "Forward target not loadable, skipping");
                continue;
            }
        };

        if !recipient.opted_in(channel.as_str()) {
            info!(recipient_id = %recipient.id, %channel, "Forward skipped: not opted in");
            continue;
        }

        let Some(address) = recipient.address_for_channel(channel.as_str()) else {
            info!(recipient_id = %recipient.id, %channel, "Forward skipped: no contact address");
            continue;
        };

        let body = texts::forward_wrapper(
            &recipient.language,
            &unit.unit_number,
            &sender_resident.name,
            raw_text,
        );

        match delivery.send(channel, from_number, address, &body).await {
            Ok(_) => {
                info!(recipient_id = %recipient.id, "Forwarded message copy");
                delivered += 1;
            }
            Err(e) => {
                // One failed forward must not block the other party
                warn!(recipient_id = %recipient.id, error = %e, "Forward delivery failed");
            }
        }
    }

    delivered
}
