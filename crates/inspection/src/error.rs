//! Inspection error types

use thiserror::Error;

/// Errors that can occur while handling inspections
#[derive(Error, Debug, Clone)]
pub enum InspectionError {
    /// No transformer carries the given transformer number
    #[error("Transformer not found: {0}")]
    TransformerNotFound(String),

    /// Inspection not found
    #[error("Inspection not found: {0}")]
    NotFound(i64),

    /// Storage error
    #[error("Storage error: {0}")]
    StorageError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl InspectionError {
    /// True for the variants that surface as "not found" to callers
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::TransformerNotFound(_) | Self::NotFound(_))
    }
}

#[cfg(feature = "postgres")]
impl From<sqlx::Error> for InspectionError {
    fn from(err: sqlx::Error) -> Self {
        InspectionError::StorageError(err.to_string())
    }
}

/// Result type for inspection operations
pub type InspectionResult<T> = std::result::Result<T, InspectionError>;
