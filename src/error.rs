//! Error types for the logbook core.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LogbookError {
    #[error("Database error: {0}")]
    DatabaseError(String),
    /// A query referenced a model, field or association the schema does not know.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Constraint violation on {table}: {reason}")]
    ConstraintViolation { table: String, reason: String },
    #[error("Transaction error: {0}")]
    TransactionError(String),
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LogbookError {
    pub fn unknown_model(model: &str) -> Self {
        Self::ConfigurationError(format!("unknown model '{model}'"))
    }

    pub fn unknown_field(model: &str, field: &str) -> Self {
        Self::ConfigurationError(format!("unknown field '{field}' on model '{model}'"))
    }

    pub fn unknown_association(model: &str, association: &str) -> Self {
        Self::ConfigurationError(format!(
            "unknown association '{association}' on model '{model}'"
        ))
    }
}

impl From<serde_json::Error> for LogbookError {
    fn from(error: serde_json::Error) -> Self {
        LogbookError::SerializationError(error.to_string())
    }
}

impl From<sqlx::Error> for LogbookError {
    fn from(err: sqlx::Error) -> Self {
        LogbookError::DatabaseError(err.to_string())
    }
}

impl From<config::ConfigError> for LogbookError {
    fn from(err: config::ConfigError) -> Self {
        LogbookError::ConfigurationError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LogbookError>;
