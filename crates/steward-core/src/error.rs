//! Caller-facing error taxonomy for lifecycle operations.
//!
//! Every failure carries an [`ErrorCode`]; remote failures are translated
//! through `From<RemoteError>` and never retried here.

use std::fmt;

use serde::{Deserialize, Serialize};
use steward_gateway::{FailedItem, RemoteError, ResourceKind};

/// Errors returned by lifecycle and reconciliation operations.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleError {
    /// The addressed resource does not exist, or no identifier was supplied.
    #[error("Resource not found: {resource}/{id}")]
    NotFound { resource: String, id: String },

    /// The remote system rejected the operation, input or type.
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// A service quota or per-call maximum was exceeded.
    #[error("Service limit exceeded: {message}")]
    ServiceLimitExceeded { message: String },

    /// The remote system failed internally.
    #[error("Service internal error: {message}")]
    ServiceInternalError { message: String },

    /// A write carried a stale update token.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// Some items of a batched change were refused by the remote system.
    #[error("{operation} failed for {} item(s): {}", .failures.len(), format_failures(.failures))]
    PartialFailure {
        operation: String,
        failures: Vec<FailedItem>,
    },

    /// Membership or tag convergence failed after the parent was created.
    ///
    /// The created parent has been deleted on a best-effort basis.
    #[error("Post-create reconciliation failed for {id}: {source}")]
    PostCreateReconciliation {
        id: String,
        #[source]
        source: Box<LifecycleError>,
    },

    /// A remote list call returned a cursor it had already issued.
    #[error("Protocol error: {message}")]
    Protocol { message: String },

    /// An unexpected local failure, such as a malformed response.
    #[error("Internal failure: {message}")]
    InternalFailure { message: String },
}

fn format_failures(failures: &[FailedItem]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl LifecycleError {
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// Missing or blank identifier on a request that requires one.
    pub fn missing_identifier(kind: ResourceKind) -> Self {
        Self::not_found(kind.as_str(), "<unspecified>")
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    pub fn partial_failure(operation: impl Into<String>, failures: Vec<FailedItem>) -> Self {
        Self::PartialFailure {
            operation: operation.into(),
            failures,
        }
    }

    pub fn post_create(id: impl Into<String>, source: LifecycleError) -> Self {
        Self::PostCreateReconciliation {
            id: id.into(),
            source: Box::new(source),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::InternalFailure {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// The taxonomy code reported to callers.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::InvalidRequest { .. } => ErrorCode::InvalidRequest,
            Self::ServiceLimitExceeded { .. } => ErrorCode::ServiceLimitExceeded,
            Self::ServiceInternalError { .. } => ErrorCode::ServiceInternalError,
            Self::Conflict { .. } => ErrorCode::Conflict,
            Self::PartialFailure { .. } => ErrorCode::PartialFailure,
            Self::PostCreateReconciliation { .. } => ErrorCode::PostCreateReconciliationError,
            Self::Protocol { .. } | Self::InternalFailure { .. } => ErrorCode::InternalFailure,
        }
    }

    /// Whether repeating the same request may succeed.
    ///
    /// Post-create failures are never retryable: the half-configured resource
    /// has already been removed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Conflict { .. } | Self::ServiceInternalError { .. } | Self::PartialFailure { .. }
        )
    }
}

impl From<RemoteError> for LifecycleError {
    fn from(err: RemoteError) -> Self {
        match err {
            RemoteError::NotFound { resource, id } => Self::NotFound { resource, id },
            RemoteError::InvalidOperation { message }
            | RemoteError::InvalidInput { message }
            | RemoteError::InvalidType { message } => Self::InvalidRequest { message },
            RemoteError::LimitExceeded { message } => Self::ServiceLimitExceeded { message },
            RemoteError::Internal { message } => Self::ServiceInternalError { message },
            stale @ RemoteError::StaleToken { .. } => Self::Conflict {
                message: stale.to_string(),
            },
        }
    }
}

impl From<serde_json::Error> for LifecycleError {
    fn from(err: serde_json::Error) -> Self {
        Self::internal(format!("malformed payload: {err}"))
    }
}

/// Taxonomy codes surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    NotFound,
    InvalidRequest,
    ServiceLimitExceeded,
    ServiceInternalError,
    Conflict,
    PartialFailure,
    PostCreateReconciliationError,
    InternalFailure,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Self::NotFound => "NotFound",
            Self::InvalidRequest => "InvalidRequest",
            Self::ServiceLimitExceeded => "ServiceLimitExceeded",
            Self::ServiceInternalError => "ServiceInternalError",
            Self::Conflict => "Conflict",
            Self::PartialFailure => "PartialFailure",
            Self::PostCreateReconciliationError => "PostCreateReconciliationError",
            Self::InternalFailure => "InternalFailure",
        };
        f.write_str(code)
    }
}

/// Convenience result type for lifecycle operations
pub type Result<T> = std::result::Result<T, LifecycleError>;
