//! Database error types.

use thiserror::Error;

/// Errors that can occur during database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// SQLx error (connection, query, etc.)
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Migration error
    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Record not found
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Record already exists
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// A lookup that must match exactly one row matched several.
    /// Contact-address lookups are required to be unambiguous; this is a
    /// data defect, not something to resolve by picking the first row.
    #[error("{entity} lookup for {key} is ambiguous: {count} matches")]
    Ambiguous {
        entity: &'static str,
        key: String,
        count: usize,
    },

    /// A contact field failed validation before a write.
    #[error(transparent)]
    Validation(#[from] crate::validation::ValidationError),

    /// Invalid state transition (e.g., reopening a closed maintenance request).
    #[error("invalid {entity} transition: {from} -> {to}")]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },
}

/// Result type for database operations.
pub type Result<T> = std::result::Result<T, DatabaseError>;

impl DatabaseError {
    /// Map a sqlx error to `AlreadyExists` when it is a unique violation.
    pub(crate) fn on_unique(e: sqlx::Error, entity: &'static str, id: impl Into<String>) -> Self {
        if let sqlx::Error::Database(ref db_err) = e {
            if db_err.is_unique_violation() {
                return DatabaseError::AlreadyExists {
                    entity,
                    id: id.into(),
                };
            }
        }
        DatabaseError::Sqlx(e)
    }
}
