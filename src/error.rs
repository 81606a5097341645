//! Error types for esql.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EsqlError {
    /// A member has no mapped field on the queried type.
    #[error("Field '{member}' not found on type '{type_name}'.{}", .suggestion.as_ref().map(|s| format!(" Did you mean '{}'?", s)).unwrap_or_default())]
    FieldNotFound {
        type_name: &'static str,
        member: String,
        suggestion: Option<String>,
    },

    /// The compiler does not recognize this expression shape.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// An argument is out of range or malformed.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Two bound parameters collapsed onto the same final name.
    #[error("Ambiguous parameter name: '{0}'")]
    AmbiguousParameterName(String),

    /// Remote execution failure, surfaced by the transport layer.
    #[error("Execution failed with status {status}: {body}")]
    Execution { status: u16, body: String },
}

impl EsqlError {
    /// Create an unsupported-operation error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::UnsupportedOperation(message.into())
    }

    /// Create an invalid-argument error.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result type alias for esql operations.
pub type EsqlResult<T> = Result<T, EsqlError>;
