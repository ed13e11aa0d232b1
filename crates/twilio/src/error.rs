use thiserror::Error;

#[derive(Debug, Error)]
pub enum TwilioError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Twilio API error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<i64>,
        message: String,
    },
}

pub type Result<T> = std::result::Result<T, TwilioError>;
