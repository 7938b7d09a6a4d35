//! Error types for the library console

use thiserror::Error;
use validator::ValidationErrors;

/// Coarse error category, for callers that branch on the kind of failure
/// rather than on the exact variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Query,
    Transaction,
    NotFound,
    Validation,
    Rule,
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not connected to database")]
    NotConnected,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Transaction failed: {0}")]
    Transaction(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not available: {0}")]
    Unavailable(String),

    #[error("Borrowing {0} has already been returned")]
    AlreadyReturned(i64),

    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::NotConnected | AppError::Connection(_) | AppError::Timeout(_) => {
                ErrorKind::Connection
            }
            AppError::Database(_) | AppError::Config(_) => ErrorKind::Query,
            AppError::Transaction(_) => ErrorKind::Transaction,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Unavailable(_) | AppError::AlreadyReturned(_) | AppError::BusinessRule(_) => {
                ErrorKind::Rule
            }
        }
    }

    /// True when the engine rejected the statement because of a UNIQUE,
    /// FOREIGN KEY or CHECK constraint.
    pub fn is_constraint_violation(&self) -> bool {
        match self {
            AppError::Database(sqlx::Error::Database(db)) => matches!(
                db.kind(),
                sqlx::error::ErrorKind::UniqueViolation
                    | sqlx::error::ErrorKind::ForeignKeyViolation
                    | sqlx::error::ErrorKind::CheckViolation
                    | sqlx::error::ErrorKind::NotNullViolation
            ),
            _ => false,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => format!("{}: {}", field, msg),
                    None => format!("{}: {}", field, e.code),
                })
            })
            .collect();
        messages.sort();
        AppError::Validation(messages.join("; "))
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
