//! Error types for rowlite

use thiserror::Error;

/// Result type alias for rowlite operations
pub type QueryResult<T> = Result<T, QueryError>;

/// Result type alias for connection-layer operations
pub type DriverResult<T> = Result<T, DriverError>;

/// Errors raised by the connection layer.
///
/// Drivers implementing [`Connection`](crate::Connection) report failures
/// through this type so the query layer can tell a native constraint
/// violation apart from an ordinary execution failure.
#[derive(Debug, Error)]
pub enum DriverError {
    /// Native uniqueness/constraint violation
    #[error("Integrity violation: {0}")]
    Integrity(String),

    /// Statement execution failure
    #[error("Execution error: {0}")]
    Execution(String),

    /// Feature not supported by the driver (e.g. parameter binding)
    #[error("Unsupported: {0}")]
    Unsupported(String),

    /// The connection has been closed
    #[error("Connection closed")]
    Closed,
}

/// Error types for query-layer operations
#[derive(Debug, Error)]
pub enum QueryError {
    /// Connection-layer error
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// A condition, filter, or unique-group member names a column the table
    /// does not have
    #[error("Unknown column `{0}`")]
    UnknownColumn(String),

    /// update/delete called without a condition and without the explicit
    /// all-rows flag
    #[error("Missing condition: {0}")]
    MissingCondition(String),

    /// A record's key set does not match the target model's field set
    #[error("Schema mismatch at record {index}: {message}")]
    SchemaMismatch { index: usize, message: String },

    /// A raw row's width disagrees with the column count
    #[error("Row width {got} does not match column count {expected}")]
    FormatWidth { expected: usize, got: usize },

    /// Misconfigured call (filter without a column name, model output
    /// requested without a model, ...)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Value decode/mapping error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Invalid regex filter pattern
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// JSON serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl QueryError {
    /// Create an unknown-column error
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn(column.into())
    }

    /// Create a missing-condition error
    pub fn missing_condition(message: impl Into<String>) -> Self {
        Self::MissingCondition(message.into())
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is an unknown-column error
    pub fn is_unknown_column(&self) -> bool {
        matches!(self, Self::UnknownColumn(_))
    }

    /// Check if this is a missing-condition error
    pub fn is_missing_condition(&self) -> bool {
        matches!(self, Self::MissingCondition(_))
    }

    /// Check if this is a schema-mismatch error
    pub fn is_schema_mismatch(&self) -> bool {
        matches!(self, Self::SchemaMismatch { .. })
    }

    /// Check if this wraps a native integrity violation
    pub fn is_integrity_violation(&self) -> bool {
        matches!(self, Self::Driver(DriverError::Integrity(_)))
    }
}

impl From<serde_json::Error> for QueryError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
