//! Error types for pubgraph.
//!
//! The ingestion and build paths are fail-open and never return these to
//! callers directly. They appear at the configuration boundary and, in strict
//! mode, inside diagnostics explaining why a record was discarded.

use thiserror::Error;

/// Validation errors raised while coercing records or checking configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required field '{field}' is missing")]
    MissingField {
        field: String,
    },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

impl ValidationError {
    /// Creates a missing-field error.
    #[must_use]
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

/// Top-level error type for pubgraph.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GraphError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is an I/O error.
    #[must_use]
    pub const fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}

/// Result type alias for pubgraph operations.
pub type GraphResult<T> = Result<T, GraphError>;
