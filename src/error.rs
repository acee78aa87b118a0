//! Error types for `equipment_tracker`.
//!
//! Every fallible operation in the crate returns [`Result`]. The four kinds the
//! storage core produces are `NotFound`, `Validation`/`ValidationErrors`,
//! `Storage` and `Backup`; the remaining variants belong to the configuration
//! and CLI layers.

use std::path::PathBuf;
use thiserror::Error;

/// Primary error type for equipment tracker operations.
#[derive(Error, Debug)]
pub enum TrackerError {
    // === Lookup Errors ===
    /// Equipment with the specified ID was not found.
    #[error("Equipment not found: {id}")]
    NotFound { id: String },

    // === Validation Errors ===
    /// Field validation failed.
    #[error("Validation failed: {field}: {reason}")]
    Validation { field: String, reason: String },

    /// Multiple validation errors occurred.
    #[error("Validation errors: {errors:?}")]
    ValidationErrors { errors: Vec<ValidationError> },

    /// A persisted change type could not be decoded.
    #[error("Invalid change type: {value}")]
    InvalidChangeType { value: String },

    // === Storage Errors ===
    /// Underlying SQLite failure (I/O, constraint violation, busy file).
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Database file was written by a newer schema than this binary knows.
    #[error("Unsupported schema version {found} (this build supports up to {supported})")]
    SchemaVersion { found: i32, supported: i32 },

    /// Snapshot of the database file could not be taken.
    #[error("Backup failed for {path}: {reason}")]
    Backup { path: PathBuf, reason: String },

    // === Workspace Errors ===
    /// No `.equipment` directory was found.
    #[error("Not initialized: run 'eqt init' first")]
    NotInitialized,

    /// `init` was run against an existing database.
    #[error("Already initialized at {path}")]
    AlreadyInitialized { path: PathBuf },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    // === I/O Errors ===
    /// File system I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML configuration parse error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// CSV export error.
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
}

/// A single field validation error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

impl TrackerError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::NotFound { id: id.into() }
    }

    #[must_use]
    pub fn backup(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Backup {
            path: path.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn from_validation_errors(errors: Vec<ValidationError>) -> Self {
        if errors.len() == 1 {
            let err = &errors[0];
            Self::Validation {
                field: err.field.clone(),
                reason: err.message.clone(),
            }
        } else {
            Self::ValidationErrors { errors }
        }
    }

    /// True for both single and multi-field validation failures.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::ValidationErrors { .. })
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type using `TrackerError`.
pub type Result<T> = std::result::Result<T, TrackerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_validation_error_collapses() {
        let err = TrackerError::from_validation_errors(vec![ValidationError::new(
            "name",
            "cannot be empty",
        )]);
        assert!(matches!(err, TrackerError::Validation { ref field, .. } if field == "name"));
        assert!(err.is_validation());
    }

    #[test]
    fn multiple_validation_errors_are_kept() {
        let err = TrackerError::from_validation_errors(vec![
            ValidationError::new("name", "cannot be empty"),
            ValidationError::new("quantity", "must be >= 0"),
        ]);
        match err {
            TrackerError::ValidationErrors { errors } => assert_eq!(errors.len(), 2),
            other => panic!("expected ValidationErrors, got {other:?}"),
        }
    }

    #[test]
    fn messages_name_the_subject() {
        assert_eq!(
            TrackerError::not_found("eq-abc").to_string(),
            "Equipment not found: eq-abc"
        );
        let err = TrackerError::backup("/tmp/out.db", "source missing");
        assert!(err.to_string().contains("/tmp/out.db"));
        assert!(err.to_string().contains("source missing"));
    }
}
