//! Defensive parsing of model output.
//!
//! The model is instructed to reply with JSON only, but real responses show
//! up wrapped in code fences, prefixed with prose, or with trailing junk.
//! Treat the raw text as untrusted: extract one balanced JSON object, then
//! schema-check it.

use crate::error::ClassifierError;
use crate::types::Classification;

/// Parse a raw model response into a validated classification.
pub fn parse_classification(raw: &str) -> Result<Classification, ClassifierError> {
    let json_str = extract_json(raw);

    serde_json::from_str::<Classification>(json_str).map_err(|e| {
        ClassifierError::InvalidResponse(format!("parse error: {}, response was: {}", e, raw))
    })
}

/// Extract JSON from a response that may contain markdown or other text.
pub fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();

    // If it starts with {, extract balanced JSON object
    if trimmed.starts_with('{') {
        return extract_balanced_json(trimmed);
    }

    // Try to find JSON in markdown code block
    if let Some(start) = trimmed.find("```json") {
        let json_start = start + 7;
        if let Some(end) = trimmed[json_start..].find("```") {
            let extracted = trimmed[json_start..json_start + end].trim();
            return extract_balanced_json(extracted);
        }
    }

    // Try to find JSON in generic code block
    if let Some(start) = trimmed.find("```") {
        let after_backticks = &trimmed[start + 3..];
        // Skip optional language identifier
        let json_start = after_backticks.find('\n').map(|i| i + 1).unwrap_or(0);
        if let Some(end) = after_backticks[json_start..].find("```") {
            let extracted = after_backticks[json_start..json_start + end].trim();
            return extract_balanced_json(extracted);
        }
    }

    // Try to find a JSON object in the text
    if let Some(start) = trimmed.find('{') {
        return extract_balanced_json(&trimmed[start..]);
    }

    trimmed
}

/// Extract a balanced JSON object from a string that starts with '{'.
///
/// This handles cases where the model adds trailing characters like extra
/// braces or commentary after the object.
fn extract_balanced_json(s: &str) -> &str {
    if !s.starts_with('{') {
        return s;
    }

    let mut depth = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in s.char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }

        match ch {
            '\\' if in_string => {
                escape_next = true;
            }
            '"' => {
                in_string = !in_string;
            }
            '{' if !in_string => {
                depth += 1;
            }
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    return &s[..=i];
                }
            }
            _ => {}
        }
    }

    // If we didn't find balanced braces, return the original
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Intent, Priority, RouteTo};

    const VALID: &str = r#"{
        "intent": "maintenance_request",
        "priority": "high",
        "route_to": "owner",
        "suggested_response": "Hemos registrado su reporte.",
        "requires_human_review": true,
        "extracted_data": {"maintenance_category": "ac"}
    }"#;

    #[test]
    fn test_parse_clean_json() {
        let c = parse_classification(VALID).unwrap();
        assert_eq!(c.intent, Intent::MaintenanceRequest);
        assert_eq!(c.priority, Priority::High);
        assert_eq!(c.route_to, RouteTo::Owner);
        assert!(c.requires_human_review);
        assert_eq!(c.maintenance_category(), Some("ac"));
    }

    #[test]
    fn test_parse_fenced_json() {
        let fenced = format!("```json\n{}\n```", VALID);
        let c = parse_classification(&fenced).unwrap();
        assert_eq!(c.intent, Intent::MaintenanceRequest);
    }

    #[test]
    fn test_parse_generic_fence() {
        let fenced = format!("```\n{}\n```", VALID);
        let c = parse_classification(&fenced).unwrap();
        assert_eq!(c.priority, Priority::High);
    }

    #[test]
    fn test_parse_with_leading_prose() {
        let noisy = format!("Here is the classification you asked for:\n{}", VALID);
        let c = parse_classification(&noisy).unwrap();
        assert_eq!(c.route_to, RouteTo::Owner);
    }

    #[test]
    fn test_extract_balanced_json_trailing_braces() {
        let input = r#"{"intent": "other", "priority": "low", "route_to": "admin"}}}"#;
        let result = extract_json(input);
        assert_eq!(
            result,
            r#"{"intent": "other", "priority": "low", "route_to": "admin"}"#
        );
    }

    #[test]
    fn test_extract_balanced_json_with_strings() {
        // Braces inside strings must not confuse the scanner
        let input = r#"{"suggested_response": "use { and } carefully", "intent": "other", "priority": "low", "route_to": "admin"}"#;
        assert_eq!(extract_json(input), input);
    }

    #[test]
    fn test_extract_balanced_json_with_escaped_quotes() {
        let input = r#"{"suggested_response": "dijo \"hola\"", "intent": "other", "priority": "low", "route_to": "admin"}"#;
        assert_eq!(extract_json(input), input);
    }

    #[test]
    fn test_parse_missing_fields_fails() {
        let result = parse_classification(r#"{"intent": "other"}"#);
        assert!(matches!(result, Err(ClassifierError::InvalidResponse(_))));
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(parse_classification("I cannot classify this message.").is_err());
        assert!(parse_classification("").is_err());
    }

    #[test]
    fn test_parse_unknown_intent_degrades_to_other() {
        let input = r#"{"intent": "lost_pet", "priority": "low", "route_to": "admin"}"#;
        let c = parse_classification(input).unwrap();
        assert_eq!(c.intent, Intent::Other);
    }

    #[test]
    fn test_parse_unknown_priority_fails() {
        let input = r#"{"intent": "other", "priority": "urgent", "route_to": "admin"}"#;
        assert!(parse_classification(input).is_err());
    }
}
