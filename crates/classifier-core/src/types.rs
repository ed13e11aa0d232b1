//! Classification request and result types.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Intent category assigned to an inbound message.
///
/// Unknown categories from the model decode as `Other` rather than failing
/// the parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    MaintenanceRequest,
    GeneralQuestion,
    Complaint,
    PaymentQuestion,
    AmenityBooking,
    Emergency,
    #[serde(other)]
    Other,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::MaintenanceRequest => "maintenance_request",
            Intent::GeneralQuestion => "general_question",
            Intent::Complaint => "complaint",
            Intent::PaymentQuestion => "payment_question",
            Intent::AmenityBooking => "amenity_booking",
            Intent::Emergency => "emergency",
            Intent::Other => "other",
        }
    }
}

/// Message priority tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Emergency,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Emergency => "emergency",
        }
    }

    /// High or emergency.
    pub fn is_elevated(&self) -> bool {
        matches!(self, Priority::High | Priority::Emergency)
    }
}

/// Who besides the admin should see a copy of the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteTo {
    Admin,
    Owner,
    Renter,
    Both,
}

impl RouteTo {
    pub fn as_str(&self) -> &'static str {
        match self {
            RouteTo::Admin => "admin",
            RouteTo::Owner => "owner",
            RouteTo::Renter => "renter",
            RouteTo::Both => "both",
        }
    }
}

/// Role of the resident who sent the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SenderRole {
    Owner,
    Renter,
}

impl SenderRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderRole::Owner => "owner",
            SenderRole::Renter => "renter",
        }
    }

    /// Parse from a stored role string, defaulting unknown values to renter.
    pub fn from_str(s: &str) -> Self {
        match s {
            "owner" => SenderRole::Owner,
            _ => SenderRole::Renter,
        }
    }
}

/// A knowledge fact used to ground the classification and suggested reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeFact {
    pub question: String,
    pub answer: String,
    pub category: String,
}

/// The structured output of the classifier, embedded into the persisted
/// message and driving all downstream routing/escalation/reply decisions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub intent: Intent,
    pub priority: Priority,
    pub route_to: RouteTo,
    /// Localized reply text suggested by the model.
    #[serde(default)]
    pub suggested_response: Option<String>,
    #[serde(default)]
    pub requires_human_review: bool,
    /// Free-form extracted facts (e.g., maintenance_category, unit hints).
    #[serde(default)]
    pub extracted_data: BTreeMap<String, serde_json::Value>,
}

impl Classification {
    /// The deterministic fallback used whenever the model call or parse
    /// fails: route to the admin, mark for human review, reply with a
    /// canned localized acknowledgment.
    pub fn fallback(language: &str) -> Self {
        let suggested = match language {
            "en" => "Thank you for your message. An administrator will respond to you soon.",
            _ => "Gracias por su mensaje. Un administrador le responderá pronto.",
        };

        Self {
            intent: Intent::Other,
            priority: Priority::Medium,
            route_to: RouteTo::Admin,
            suggested_response: Some(suggested.to_string()),
            requires_human_review: true,
            extracted_data: BTreeMap::new(),
        }
    }

    /// The maintenance category extracted by the model, if any.
    pub fn maintenance_category(&self) -> Option<&str> {
        self.extracted_data
            .get("maintenance_category")
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    }
}

/// Everything the classifier needs about one inbound message.
#[derive(Debug, Clone)]
pub struct ClassifyRequest {
    /// Raw message text as received.
    pub text: String,
    /// Role of the sender within the building.
    pub sender_role: SenderRole,
    /// Language code for the suggested reply ("es", "en", ...).
    pub language: String,
    /// Building display name, for reply phrasing.
    pub building_name: String,
    /// Grounding facts from the knowledge lookup (at most a handful).
    pub knowledge: Vec<KnowledgeFact>,
}
