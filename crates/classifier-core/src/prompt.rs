//! Prompt construction for the intent classifier.

use crate::types::ClassifyRequest;

/// System instruction requiring a JSON-only classification response.
///
/// Enumerates the fixed intent categories, priority levels, and routing
/// targets; the shape mirrors [`crate::types::Classification`] exactly.
pub const CLASSIFIER_SYSTEM_PROMPT: &str = r#"You classify inbound messages from condominium residents. Analyze the message and respond with JSON only.

Output a single JSON object with exactly these fields:
- "intent": one of "maintenance_request", "general_question", "complaint", "payment_question", "amenity_booking", "emergency", "other"
- "priority": one of "low", "medium", "high", "emergency"
- "route_to": who else must see this message:
    "admin" - building administration only (default)
    "owner" - the unit's owner should receive a copy (e.g., a renter reporting damage)
    "renter" - the unit's renter should receive a copy (e.g., an owner scheduling access)
    "both" - both parties of the unit should receive a copy
- "suggested_response": a short, polite reply in the resident's language
- "requires_human_review": true when an administrator should look at this personally
- "extracted_data": object of extracted facts; for maintenance use "maintenance_category" with one of "plumbing", "electrical", "ac", "appliance", "structural", "general"

Guidelines:
- Water leaks, gas smells, fire, or security threats are "emergency" priority.
- Broken equipment is "maintenance_request"; severity sets the priority.
- If BUILDING FACTS answer the question, ground the suggested_response in them.
- When unsure, use intent "other", priority "medium", route_to "admin", requires_human_review true.

Respond with JSON only. No explanation."#;

/// Format the user-turn input for one classification call.
pub fn build_prompt(request: &ClassifyRequest) -> String {
    let mut parts = Vec::new();

    parts.push(format!("[BUILDING: {}]", request.building_name));
    parts.push(format!("[SENDER ROLE: {}]", request.sender_role.as_str()));
    parts.push(format!("[LANGUAGE: {}]", request.language));

    if !request.knowledge.is_empty() {
        let facts: Vec<String> = request
            .knowledge
            .iter()
            .map(|f| format!("- Q: {} A: {}", f.question, f.answer))
            .collect();
        parts.push(format!("[BUILDING FACTS:\n{}]", facts.join("\n")));
    }

    parts.push(format!("[MESSAGE: {}]", request.text));

    parts.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KnowledgeFact, SenderRole};

    fn request() -> ClassifyRequest {
        ClassifyRequest {
            text: "¿A qué hora cierra la piscina?".to_string(),
            sender_role: SenderRole::Owner,
            language: "es".to_string(),
            building_name: "Torre del Mar".to_string(),
            knowledge: vec![],
        }
    }

    #[test]
    fn test_build_prompt_without_facts() {
        let prompt = build_prompt(&request());
        assert!(prompt.contains("[BUILDING: Torre del Mar]"));
        assert!(prompt.contains("[SENDER ROLE: owner]"));
        assert!(prompt.contains("[LANGUAGE: es]"));
        assert!(prompt.contains("[MESSAGE: ¿A qué hora cierra la piscina?]"));
        assert!(!prompt.contains("BUILDING FACTS"));
    }

    #[test]
    fn test_build_prompt_with_facts() {
        let mut req = request();
        req.knowledge.push(KnowledgeFact {
            question: "Horario de la piscina".to_string(),
            answer: "9:00 a 21:00".to_string(),
            category: "amenities".to_string(),
        });

        let prompt = build_prompt(&req);
        assert!(prompt.contains("BUILDING FACTS"));
        assert!(prompt.contains("9:00 a 21:00"));
        // Facts come before the message so the model reads them as context.
        let facts_pos = prompt.find("BUILDING FACTS").unwrap();
        let msg_pos = prompt.find("[MESSAGE:").unwrap();
        assert!(facts_pos < msg_pos);
    }

    #[test]
    fn test_system_prompt_enumerates_enums() {
        for token in [
            "maintenance_request",
            "general_question",
            "complaint",
            "payment_question",
            "amenity_booking",
            "emergency",
            "other",
            "low",
            "medium",
            "high",
            "admin",
            "owner",
            "renter",
            "both",
        ] {
            assert!(
                CLASSIFIER_SYSTEM_PROMPT.contains(token),
                "prompt missing {token}"
            );
        }
    }
}
