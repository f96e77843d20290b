//! Error types for the workflow engine.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::StepId;

/// Comprehensive error type for all workflow operations.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// Process not found for the given ID
    #[error("Process with ID {id} not found")]
    ProcessNotFound { id: String },
    /// Step identifier outside the catalog
    #[error("Unknown step '{id}'")]
    UnknownStep { id: String },
    /// Required fields of a step are not filled in
    #[error("Step '{step}' is missing required fields: {}", fields.join(", "))]
    ValidationFailed { step: StepId, fields: Vec<String> },
    /// The selected role may not save or send this process
    #[error("Process {id} cannot be edited: {reason}")]
    NotEditable { id: String, reason: String },
    /// The workflow snapshot could not be written
    #[error("Failed to persist workflow state: {message}")]
    PersistenceWriteFailed { message: String },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// CSV export errors
    #[error("Export error: {source}")]
    Export {
        #[from]
        source: csv::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> WorkflowError {
        WorkflowError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> WorkflowError {
        WorkflowError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl WorkflowError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Shorthand for [`WorkflowError::ProcessNotFound`].
    pub fn process_not_found(id: impl Into<String>) -> Self {
        Self::ProcessNotFound { id: id.into() }
    }

    /// Whether the caller can recover by showing a message instead of
    /// aborting.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ProcessNotFound { .. }
                | Self::ValidationFailed { .. }
                | Self::NotEditable { .. }
                | Self::PersistenceWriteFailed { .. }
                | Self::InvalidInput { .. }
        )
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| WorkflowError::database(message).with_source(e))
    }
}

/// Result type alias for workflow operations
pub type Result<T> = std::result::Result<T, WorkflowError>;
