use thiserror::Error;

#[derive(Debug, Error)]
pub enum KnowledgeError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Embedding provider error: {0}")]
    Embedding(String),

    #[error("Database error: {0}")]
    Database(#[from] database::DatabaseError),
}

pub type Result<T> = std::result::Result<T, KnowledgeError>;
