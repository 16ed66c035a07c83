use crate::remote::RemoteError;
use crate::validation::ValidationError;

/// Custom error type for the secondbrain library
///
/// Local-store failures surface here and fail the operation that caused them.
/// Remote failures only surface through `Remote` when a whole pass depends on
/// the call (listing a collection during a pull); everywhere else they are
/// recorded and swallowed by the repository.
#[derive(Debug, thiserror::Error)]
pub enum SecondBrainError {
    /// Database-related errors (SQLite)
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O errors (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Remote service errors
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Input rejected by the validation layer
    #[error("Validation failed: {}", join_messages(.0))]
    Validation(Vec<ValidationError>),

    /// Bookmark not found (or soft-deleted)
    #[error("Bookmark with ID {0} not found")]
    BookmarkNotFound(i64),

    /// Collection not found
    #[error("Collection with ID {0} not found")]
    CollectionNotFound(i64),

    /// Invalid input or arguments
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// YAML parsing/serialization errors
    #[error("YAML error: {0}")]
    Yaml(String),

    /// JSON errors
    #[error("JSON error: {0}")]
    Json(String),

    /// A thread panicked while holding the database connection
    #[error("Database lock poisoned")]
    LockPoisoned,

    /// Browser integration errors
    #[error("Browser error: {0}")]
    Browser(String),

    /// Generic error for cases that don't fit other categories
    #[error("{0}")]
    Other(String),
}

/// Result type alias using SecondBrainError
pub type Result<T> = std::result::Result<T, SecondBrainError>;

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<String> for SecondBrainError {
    fn from(s: String) -> Self {
        SecondBrainError::Other(s)
    }
}

impl From<&str> for SecondBrainError {
    fn from(s: &str) -> Self {
        SecondBrainError::Other(s.to_string())
    }
}

impl From<serde_yaml::Error> for SecondBrainError {
    fn from(err: serde_yaml::Error) -> Self {
        SecondBrainError::Yaml(err.to_string())
    }
}

impl From<serde_json::Error> for SecondBrainError {
    fn from(err: serde_json::Error) -> Self {
        SecondBrainError::Json(err.to_string())
    }
}

impl SecondBrainError {
    /// Violations carried by a validation failure, empty for every other kind
    pub fn violations(&self) -> &[ValidationError] {
        match self {
            SecondBrainError::Validation(errors) => errors,
            _ => &[],
        }
    }
}
