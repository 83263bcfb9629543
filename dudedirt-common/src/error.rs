// ================================================================
// File: dudedirt-common/src/error.rs
// ================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),

    /// A wizard step was submitted with bad or missing input. The `field`
    /// names the offending input so the caller can highlight it.
    #[error("Validation failed on '{field}': {message}")]
    Validation { field: String, message: String },

    /// Another booking claimed the same service/time slot first.
    #[error("The requested time slot is no longer available")]
    SlotConflict,

    #[error("Insufficient points: need {needed}, have {available}")]
    InsufficientPoints { needed: i64, available: i64 },

    /// A `service_completed` transaction already references this booking.
    #[error("Completion points were already awarded for this booking")]
    AlreadyAwarded,

    /// The wizard was already committed; it is inert now.
    #[error("This booking was already committed")]
    AlreadyCommitted,

    #[error("The booking session has expired")]
    WizardExpired,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Authentication error: {0}")]
    Auth(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl Error {
    pub fn validation(field: &str, message: impl Into<String>) -> Self {
        Error::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl From<String> for Error {
    fn from(s: String) -> Self {
        Error::Parse(s)
    }
}

impl From<&str> for Error {
    fn from(s: &str) -> Self {
        Error::Parse(s.to_string())
    }
}

impl From<chrono::format::ParseError> for Error {
    fn from(err: chrono::format::ParseError) -> Self {
        Error::Parse(err.to_string())
    }
}
