//! Error types

use thiserror::Error;

/// Main error type for the LINE bots.
///
/// Every variant maps to one HTTP status via [`Error::status_code`]; the
/// webhook boundary converts whatever bubbles up into a `{message, errors}`
/// JSON response with that status.
#[derive(Error, Debug)]
pub enum Error {
    /// Required configuration values are missing (carries every missing name)
    #[error("Invalid configuration: {}", .0.join(", "))]
    Config(Vec<String>),

    #[error("Invalid signature")]
    Signature,

    /// Malformed webhook body or an empty event list
    #[error("{0}")]
    Parse(String),

    /// Field-level validation failure carrying every violated field
    #[error("{context}")]
    Validation { context: String, errors: Vec<String> },

    #[error("Unauthorized user")]
    Unauthorized,

    #[error("Unsupported event type: {0}")]
    Unsupported(String),

    #[error("Database error: {0}")]
    Database(String),

    /// A collaborator call (GitHub, LINE, store) failed; never retried
    #[error("Downstream error: {0}")]
    Downstream(String),
}

impl Error {
    /// HTTP status the webhook boundary answers with for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Config(_) => 500,
            Error::Signature => 401,
            Error::Parse(_) => 400,
            Error::Validation { .. } => 400,
            Error::Unauthorized => 403,
            Error::Unsupported(_) => 400,
            Error::Database(_) => 500,
            Error::Downstream(_) => 500,
        }
    }

    /// Per-field messages for the response `errors` array
    pub fn details(&self) -> Vec<String> {
        match self {
            Error::Config(errors) => errors.clone(),
            Error::Validation { errors, .. } => errors.clone(),
            _ => Vec::new(),
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
