//! Database models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A condominium building (tenant). The top-level isolation boundary:
/// every other row hangs off a building id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Building {
    /// UUID.
    pub id: String,
    /// Display name (e.g., "Torre del Mar").
    pub name: String,
    /// Inbound WhatsApp number, if provisioned.
    pub whatsapp_number: Option<String>,
    /// Inbound SMS number, if provisioned.
    pub sms_number: Option<String>,
    /// Where escalation emails go, if configured.
    pub admin_email: Option<String>,
    /// Preferred language code (e.g., "es", "en").
    pub language: String,
    /// Subscription tier (gates dashboard features, not the pipeline).
    pub tier: String,
    /// Creation timestamp.
    pub created_at: String,
}

/// A resident of a building, reachable on one or more channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Resident {
    /// UUID.
    pub id: String,
    /// Owning building.
    pub building_id: String,
    /// Display name.
    pub name: String,
    /// "owner" or "renter".
    pub role: String,
    /// Phone number for SMS (E.164).
    pub phone: Option<String>,
    /// WhatsApp number (E.164), may differ from `phone`.
    pub whatsapp: Option<String>,
    /// Email address.
    pub email: Option<String>,
    /// Consent to receive WhatsApp messages.
    pub whatsapp_opt_in: bool,
    /// Consent to receive SMS.
    pub sms_opt_in: bool,
    /// Preferred language code.
    pub language: String,
    /// Unit this resident belongs to, if assigned.
    pub unit_id: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

impl Resident {
    /// The contact address for a channel, if the resident has one.
    pub fn address_for_channel(&self, channel: &str) -> Option<&str> {
        match channel {
            "whatsapp" => self.whatsapp.as_deref().or(self.phone.as_deref()),
            _ => self.phone.as_deref(),
        }
    }

    /// Whether the resident has opted into a channel.
    pub fn opted_in(&self, channel: &str) -> bool {
        match channel {
            "whatsapp" => self.whatsapp_opt_in,
            _ => self.sms_opt_in,
        }
    }
}

/// A unit within a building. Owner is required, renter optional; this
/// pairing drives who "the other party" is when forwarding messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Unit {
    pub id: String,
    pub building_id: String,
    pub unit_number: String,
    pub owner_id: String,
    pub renter_id: Option<String>,
}

/// A conversation thread between one resident and the building, on one
/// channel. At most one active row per (building, resident, channel).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Conversation {
    pub id: String,
    pub building_id: String,
    pub resident_id: String,
    /// "whatsapp" or "sms".
    pub channel: String,
    /// "active" or "closed".
    pub status: String,
    pub last_activity_at: String,
    pub created_at: String,
}

/// One message in a conversation. Append-only; classification metadata is
/// embedded on resident messages and absent on ai/admin messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: String,
    pub conversation_id: String,
    /// Transport message SID, used as an idempotency key for retries.
    pub provider_sid: Option<String>,
    /// "resident", "ai", or "admin".
    pub sender_type: String,
    pub content: String,
    pub channel: String,
    pub intent: Option<String>,
    pub priority: Option<String>,
    pub route_to: Option<String>,
    pub requires_human_review: Option<bool>,
    pub created_at: String,
}

/// Fields for appending a new message.
#[derive(Debug, Clone, Default)]
pub struct NewMessage {
    pub conversation_id: String,
    pub provider_sid: Option<String>,
    pub sender_type: String,
    pub content: String,
    pub channel: String,
    pub intent: Option<String>,
    pub priority: Option<String>,
    pub route_to: Option<String>,
    pub requires_human_review: Option<bool>,
}

/// A maintenance request materialized from a classified message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct MaintenanceRequest {
    pub id: String,
    pub building_id: String,
    pub unit_id: Option<String>,
    pub resident_id: String,
    pub conversation_id: Option<String>,
    pub category: String,
    pub description: String,
    pub priority: String,
    /// "open", "in_progress", "resolved", or "closed".
    pub status: String,
    pub created_at: String,
    pub resolved_at: Option<String>,
}

/// A building-scoped Q&A fact used to ground automated replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct KnowledgeEntry {
    pub id: String,
    pub building_id: String,
    pub question: String,
    pub answer: String,
    pub category: String,
    /// Comma-separated keywords for the fallback search.
    pub keywords: String,
    /// Ordering weight for the fallback search (higher first).
    pub priority: i64,
    /// JSON-encoded f32 vector, absent until embedded.
    pub embedding: Option<String>,
}

/// An out-of-band alert row shown on the admin dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AdminNotification {
    pub id: String,
    pub building_id: String,
    pub title: String,
    pub body: String,
    /// "info", "warning", or "urgent".
    pub severity: String,
    pub read: bool,
    pub created_at: String,
}
