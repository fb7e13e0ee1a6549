//! Gateway trait for the remote system.
//!
//! This module defines the one collaborator interface the reconciliation core
//! consumes.

use async_trait::async_trait;
use serde_json::Value;

use crate::error::RemoteError;
use crate::types::{BatchOutcome, Page, ParentRecord, ParentSummary, ResourceKind, Tag};

/// The remote system as seen by the reconciliation core.
///
/// Every method is a single request/response exchange. Transport, credentials,
/// retries and timeouts belong to the implementation; callers treat any error
/// as terminal for the current operation. Implementations must be thread-safe
/// (`Send + Sync`).
///
/// # Example
///
/// ```ignore
/// use steward_gateway::{RemoteGateway, RemoteError, Tag};
///
/// async fn tag_keys(gateway: &dyn RemoteGateway, arn: &str) -> Result<Vec<String>, RemoteError> {
///     let tags = gateway.list_tags(arn).await?;
///     Ok(tags.into_iter().map(|t| t.key).collect())
/// }
/// ```
#[async_trait]
pub trait RemoteGateway: Send + Sync {
    // ==================== Parent resource ====================

    /// Creates a parent resource from a descriptive payload.
    ///
    /// The remote system assigns the identity, ARN and first update token.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::InvalidInput` if the payload is malformed.
    /// Returns `RemoteError::LimitExceeded` if a quota is reached.
    async fn create_parent(
        &self,
        kind: ResourceKind,
        spec: &Value,
    ) -> Result<ParentRecord, RemoteError>;

    /// Reads a parent resource, including its current update token.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotFound` if the resource does not exist.
    async fn get_parent(&self, kind: ResourceKind, id: &str) -> Result<ParentRecord, RemoteError>;

    /// Replaces the payload of a parent resource.
    ///
    /// `update_token` must be the most recently observed token; the returned
    /// record carries the rotated one.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotFound` if the resource does not exist.
    /// Returns `RemoteError::StaleToken` if `update_token` is not current.
    async fn update_parent(
        &self,
        kind: ResourceKind,
        id: &str,
        spec: &Value,
        update_token: &str,
    ) -> Result<ParentRecord, RemoteError>;

    /// Deletes a parent resource together with its membership and tags.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotFound` if the resource does not exist.
    async fn delete_parent(&self, kind: ResourceKind, id: &str) -> Result<(), RemoteError>;

    /// Lists one page of parent summaries.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::InvalidInput` for an unknown cursor or an
    /// out-of-range page size.
    async fn list_parents(
        &self,
        kind: ResourceKind,
        cursor: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<Page<ParentSummary>, RemoteError>;

    // ==================== Membership ====================

    /// Lists one page of item URIs associated with a parent.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotFound` if the parent does not exist.
    async fn list_membership(
        &self,
        id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<String>, RemoteError>;

    /// Associates items with a parent.
    ///
    /// Items the remote system refuses are reported in the outcome rather
    /// than failing the whole call.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::LimitExceeded` if `items` exceeds the per-call maximum.
    async fn associate_items(&self, id: &str, items: &[String])
    -> Result<BatchOutcome, RemoteError>;

    /// Disassociates items from a parent.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::LimitExceeded` if `items` exceeds the per-call maximum.
    async fn disassociate_items(
        &self,
        id: &str,
        items: &[String],
    ) -> Result<BatchOutcome, RemoteError>;

    // ==================== Tags ====================

    /// Lists the tags attached to the resource addressed by `arn`.
    ///
    /// # Errors
    ///
    /// Returns `RemoteError::NotFound` if nothing is addressed by `arn`.
    async fn list_tags(&self, arn: &str) -> Result<Vec<Tag>, RemoteError>;

    /// Attaches tags, overwriting values of existing keys.
    async fn add_tags(&self, arn: &str, tags: &[Tag]) -> Result<(), RemoteError>;

    /// Removes tags by key. Unknown keys are ignored.
    async fn remove_tags(&self, arn: &str, keys: &[String]) -> Result<(), RemoteError>;

    // ==================== Metadata ====================

    /// Returns the name of this backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
