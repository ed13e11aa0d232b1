//! Localized canned texts sent by the pipeline itself.
//!
//! Spanish is the default; English is selected for "en". Model-generated
//! replies are already localized by the classifier prompt.

/// Notice sent back when the sender's number is not registered with the
/// building.
pub fn unknown_sender_notice(language: &str) -> &'static str {
    match language {
        "en" => {
            "This number is not registered with the building. \
             Please contact your administrator to be added."
        }
        _ => {
            "Este número no está registrado en el edificio. \
             Por favor contacte a su administrador para ser agregado."
        }
    }
}

/// Wrapper applied to forwarded copies, naming the unit and the original
/// sender.
pub fn forward_wrapper(language: &str, unit_number: &str, sender_name: &str, text: &str) -> String {
    match language {
        "en" => format!(
            "Message from {} (Unit {}):\n{}",
            sender_name, unit_number, text
        ),
        _ => format!(
            "Mensaje de {} (Unidad {}):\n{}",
            sender_name, unit_number, text
        ),
    }
}
