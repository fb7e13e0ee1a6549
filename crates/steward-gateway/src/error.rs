//! Remote error types for the gateway abstraction layer.
//!
//! These are the only failure kinds a gateway backend may report. The
//! reconciliation core translates them into its own caller-facing taxonomy.

use std::fmt;

/// Errors reported by the remote system for a single gateway call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The addressed resource does not exist.
    #[error("Resource not found: {resource}/{id}")]
    NotFound {
        /// What was addressed (a resource kind or "arn").
        resource: String,
        /// The identity or ARN that was not found.
        id: String,
    },

    /// The operation is not valid in the resource's current state.
    #[error("Invalid operation: {message}")]
    InvalidOperation {
        /// Description of why the operation was rejected.
        message: String,
    },

    /// A request parameter is invalid.
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of the invalid input.
        message: String,
    },

    /// A value has the wrong type for the addressed resource.
    #[error("Invalid type: {message}")]
    InvalidType {
        /// Description of the type mismatch.
        message: String,
    },

    /// A service quota or per-call maximum was exceeded.
    #[error("Limit exceeded: {message}")]
    LimitExceeded {
        /// Description of the exceeded limit.
        message: String,
    },

    /// The write carried an update token that is no longer current.
    #[error("Stale update token for {id}: {presented} is no longer current")]
    StaleToken {
        /// The identity of the resource being written.
        id: String,
        /// The token the caller presented.
        presented: String,
    },

    /// The remote system failed internally.
    #[error("Internal error: {message}")]
    Internal {
        /// Description of the internal error.
        message: String,
    },
}

impl RemoteError {
    /// Creates a new `NotFound` error.
    #[must_use]
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Creates a new `InvalidOperation` error.
    #[must_use]
    pub fn invalid_operation(message: impl Into<String>) -> Self {
        Self::InvalidOperation {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a new `InvalidType` error.
    #[must_use]
    pub fn invalid_type(message: impl Into<String>) -> Self {
        Self::InvalidType {
            message: message.into(),
        }
    }

    /// Creates a new `LimitExceeded` error.
    #[must_use]
    pub fn limit_exceeded(message: impl Into<String>) -> Self {
        Self::LimitExceeded {
            message: message.into(),
        }
    }

    /// Creates a new `StaleToken` error.
    #[must_use]
    pub fn stale_token(id: impl Into<String>, presented: impl Into<String>) -> Self {
        Self::StaleToken {
            id: id.into(),
            presented: presented.into(),
        }
    }

    /// Creates a new `Internal` error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns `true` if this is a not found error.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Returns `true` if this is a stale update token error.
    #[must_use]
    pub fn is_stale_token(&self) -> bool {
        matches!(self, Self::StaleToken { .. })
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::NotFound { .. } => ErrorCategory::NotFound,
            Self::InvalidOperation { .. }
            | Self::InvalidInput { .. }
            | Self::InvalidType { .. } => ErrorCategory::Validation,
            Self::LimitExceeded { .. } => ErrorCategory::Limit,
            Self::StaleToken { .. } => ErrorCategory::Conflict,
            Self::Internal { .. } => ErrorCategory::Internal,
        }
    }
}

/// Categories of remote errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Resource not found.
    NotFound,
    /// Invalid operation, input or type.
    Validation,
    /// Quota or per-call maximum.
    Limit,
    /// Optimistic concurrency conflict.
    Conflict,
    /// Remote internal failure.
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::Validation => write!(f, "validation"),
            Self::Limit => write!(f, "limit"),
            Self::Conflict => write!(f, "conflict"),
            Self::Internal => write!(f, "internal"),
        }
    }
}
