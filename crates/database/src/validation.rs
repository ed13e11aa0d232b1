//! Contact-field validation applied before resident writes.
//!
//! Contact addresses feed the unambiguous-lookup indexes and outbound
//! delivery; a malformed value is rejected at the write, not discovered
//! when a message fails to route.

use thiserror::Error;

use crate::models::Resident;

/// A contact field that failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: &'static str,
    pub reason: String,
}

impl ValidationError {
    fn new(field: &'static str, reason: impl Into<String>) -> Self {
        Self {
            field,
            reason: reason.into(),
        }
    }
}

/// True when `value` is an E.164-style number: an optional leading `+`
/// followed by 7 to 15 digits, nothing else.
pub fn is_e164(value: &str) -> bool {
    let digits = value.strip_prefix('+').unwrap_or(value);
    (7..=15).contains(&digits.len()) && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Check every contact field present on a resident row.
pub fn validate_resident_contacts(resident: &Resident) -> Result<(), ValidationError> {
    if let Some(phone) = &resident.phone {
        validate_phone("phone", phone)?;
    }
    if let Some(whatsapp) = &resident.whatsapp {
        validate_phone("whatsapp", whatsapp)?;
    }
    if let Some(email) = &resident.email {
        validate_email(email)?;
    }
    Ok(())
}

fn validate_phone(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if is_e164(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new(field, "not an E.164 number"))
    }
}

fn validate_email(value: &str) -> Result<(), ValidationError> {
    let email = value.trim();

    if email.len() > 254 {
        return Err(ValidationError::new("email", "longer than 254 characters"));
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::new("email", "missing @"));
    };

    if local.is_empty() || domain.contains('@') {
        return Err(ValidationError::new("email", "malformed local part"));
    }

    if !domain.contains('.') || domain.split('.').any(str::is_empty) {
        return Err(ValidationError::new("email", "malformed domain"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resident(phone: Option<&str>, whatsapp: Option<&str>, email: Option<&str>) -> Resident {
        Resident {
            id: "r1".to_string(),
            building_id: "b1".to_string(),
            name: "Ana García".to_string(),
            role: "renter".to_string(),
            phone: phone.map(String::from),
            whatsapp: whatsapp.map(String::from),
            email: email.map(String::from),
            whatsapp_opt_in: true,
            sms_opt_in: true,
            language: "es".to_string(),
            unit_id: None,
            created_at: String::new(),
        }
    }

    #[test]
    fn test_is_e164() {
        assert!(is_e164("+5215512345678"));
        assert!(is_e164("5512345678"));

        assert!(!is_e164(""));
        assert!(!is_e164("+"));
        assert!(!is_e164("+52 55 1234"));
        assert!(!is_e164("123"));
        assert!(!is_e164("+1234567890123456"));
        assert!(!is_e164("call-me-maybe"));
    }

    #[test]
    fn test_all_contacts_valid() {
        let r = resident(
            Some("+5215512345678"),
            Some("+5215512345678"),
            Some("ana@torredelmar.example"),
        );
        assert!(validate_resident_contacts(&r).is_ok());
    }

    #[test]
    fn test_absent_contacts_are_fine() {
        assert!(validate_resident_contacts(&resident(None, None, None)).is_ok());
    }

    #[test]
    fn test_bad_phone_names_the_field() {
        let err = validate_resident_contacts(&resident(Some("not-a-number"), None, None))
            .unwrap_err();
        assert_eq!(err.field, "phone");

        let err = validate_resident_contacts(&resident(None, Some("123"), None)).unwrap_err();
        assert_eq!(err.field, "whatsapp");
    }

    #[test]
    fn test_malformed_emails_rejected() {
        for bad in [
            "",
            "no-at-sign",
            "two@@signs.example",
            "@missing-local.example",
            "user@nodot",
            "user@.leading.dot",
            "user@double..dot.example",
        ] {
            let err = validate_resident_contacts(&resident(None, None, Some(bad)));
            assert!(err.is_err(), "accepted {bad:?}");
        }

        assert!(
            validate_resident_contacts(&resident(None, None, Some("ana@torremar.example")))
                .is_ok()
        );
    }
}
