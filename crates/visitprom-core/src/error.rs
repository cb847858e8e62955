//! Shared error type across visitprom crates.

use thiserror::Error;

/// Stable error codes, usable in logs and responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// The collector rejected a metric family.
    Registration,
    /// Wrong number of label values for a family.
    LabelArity,
    /// Any other collector failure.
    Collector,
    /// Invalid configuration or command line input.
    BadRequest,
    /// The listener could not be bound.
    Bind,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Registration => "REGISTRATION",
            ErrorCode::LabelArity => "LABEL_ARITY",
            ErrorCode::Collector => "COLLECTOR",
            ErrorCode::BadRequest => "BAD_REQUEST",
            ErrorCode::Bind => "BIND",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, VisitPromError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum VisitPromError {
    #[error("register metric family {name:?}: {source}")]
    Registration {
        name: String,
        #[source]
        source: prometheus::Error,
    },
    #[error("metric family {family:?} expects {expected} label values, got {got}")]
    LabelArity {
        family: String,
        expected: usize,
        got: usize,
    },
    #[error("collector: {0}")]
    Collector(#[from] prometheus::Error),
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("internal: {0}")]
    Internal(String),
}

impl VisitPromError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            VisitPromError::Registration { .. } => ErrorCode::Registration,
            VisitPromError::LabelArity { .. } => ErrorCode::LabelArity,
            VisitPromError::Collector(_) => ErrorCode::Collector,
            VisitPromError::BadRequest(_) => ErrorCode::BadRequest,
            VisitPromError::Bind { .. } => ErrorCode::Bind,
            VisitPromError::Internal(_) => ErrorCode::Internal,
        }
    }
}
