//! # steward-gateway
//!
//! Remote gateway abstraction for Steward.
//!
//! This crate defines the single collaborator the reconciliation core talks
//! to: a [`RemoteGateway`] that issues individual create/read/update/delete/list,
//! associate/disassociate and tag/untag calls against the remote system.
//! It does not contain a transport - backends live in separate crates.
//!
//! ## Example
//!
//! ```ignore
//! use steward_gateway::{RemoteGateway, RemoteError, ResourceKind};
//!
//! async fn token_of(
//!     gateway: &dyn RemoteGateway,
//!     id: &str,
//! ) -> Result<String, RemoteError> {
//!     let record = gateway.get_parent(ResourceKind::ResourceSet, id).await?;
//!     Ok(record.update_token)
//! }
//! ```
//!
//! ## Backends
//!
//! To plug in a backend, implement [`RemoteGateway`]:
//!
//! ```ignore
//! use async_trait::async_trait;
//! use steward_gateway::{RemoteGateway, RemoteError, ParentRecord, ResourceKind};
//!
//! struct MyGateway {
//!     // ...
//! }
//!
//! #[async_trait]
//! impl RemoteGateway for MyGateway {
//!     async fn create_parent(
//!         &self,
//!         kind: ResourceKind,
//!         spec: &serde_json::Value,
//!     ) -> Result<ParentRecord, RemoteError> {
//!         // Implementation
//!     }
//!     // ... other methods
//! }
//! ```

mod error;
pub mod traced;
mod traits;
mod types;

pub use error::{ErrorCategory, RemoteError};
pub use traced::TracedGateway;
pub use traits::RemoteGateway;
pub use types::{
    BatchOutcome, FailedItem, Page, ParentRecord, ParentSummary, ResourceKind, Tag,
};

/// Type alias for a remote gateway result.
pub type RemoteResult<T> = Result<T, RemoteError>;

/// Type alias for a shareable gateway trait object.
pub type DynGateway = std::sync::Arc<dyn RemoteGateway>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use steward_gateway::prelude::*;
/// ```
pub mod prelude {
    pub use crate::error::{ErrorCategory, RemoteError};
    pub use crate::traced::TracedGateway;
    pub use crate::traits::RemoteGateway;
    pub use crate::types::{
        BatchOutcome, FailedItem, Page, ParentRecord, ParentSummary, ResourceKind, Tag,
    };
    pub use crate::{DynGateway, RemoteResult};
}
