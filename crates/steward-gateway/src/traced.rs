//! TracedGateway - A gateway wrapper that logs every remote call.
//!
//! This wrapper delegates all operations to an inner gateway while emitting
//! a `tracing` event after each call: `debug` on success, `warn` with the
//! error category on failure.
//!
//! # Example
//!
//! ```ignore
//! use steward_gateway::TracedGateway;
//!
//! let gateway = TracedGateway::new(in_memory_gateway);
//!
//! // A debug event with the call name and elapsed time is emitted
//! gateway.list_tags(&arn).await?;
//! ```

use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::RemoteError;
use crate::traits::RemoteGateway;
use crate::types::{BatchOutcome, Page, ParentRecord, ParentSummary, ResourceKind, Tag};

/// A gateway wrapper that logs the outcome of every call.
///
/// Results are passed through untouched.
pub struct TracedGateway<G: RemoteGateway> {
    /// The inner gateway implementation.
    inner: G,
}

impl<G: RemoteGateway> TracedGateway<G> {
    /// Create a new traced gateway wrapper.
    pub fn new(inner: G) -> Self {
        Self { inner }
    }

    /// Get a reference to the inner gateway.
    pub fn inner(&self) -> &G {
        &self.inner
    }

    fn observe<T>(
        &self,
        call: &'static str,
        target: &str,
        started: Instant,
        result: Result<T, RemoteError>,
    ) -> Result<T, RemoteError> {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(_) => debug!(
                backend = self.inner.backend_name(),
                call,
                target = %target,
                elapsed_ms,
                "Remote call succeeded"
            ),
            Err(e) => warn!(
                backend = self.inner.backend_name(),
                call,
                target = %target,
                elapsed_ms,
                category = %e.category(),
                error = %e,
                "Remote call failed"
            ),
        }
        result
    }
}

#[async_trait]
impl<G: RemoteGateway> RemoteGateway for TracedGateway<G> {
    async fn create_parent(
        &self,
        kind: ResourceKind,
        spec: &Value,
    ) -> Result<ParentRecord, RemoteError> {
        let started = Instant::now();
        let result = self.inner.create_parent(kind, spec).await;
        self.observe("create_parent", kind.as_str(), started, result)
    }

    async fn get_parent(&self, kind: ResourceKind, id: &str) -> Result<ParentRecord, RemoteError> {
        let started = Instant::now();
        let result = self.inner.get_parent(kind, id).await;
        self.observe("get_parent", id, started, result)
    }

    async fn update_parent(
        &self,
        kind: ResourceKind,
        id: &str,
        spec: &Value,
        update_token: &str,
    ) -> Result<ParentRecord, RemoteError> {
        let started = Instant::now();
        let result = self.inner.update_parent(kind, id, spec, update_token).await;
        self.observe("update_parent", id, started, result)
    }

    async fn delete_parent(&self, kind: ResourceKind, id: &str) -> Result<(), RemoteError> {
        let started = Instant::now();
        let result = self.inner.delete_parent(kind, id).await;
        self.observe("delete_parent", id, started, result)
    }

    async fn list_parents(
        &self,
        kind: ResourceKind,
        cursor: Option<&str>,
        page_size: Option<u32>,
    ) -> Result<Page<ParentSummary>, RemoteError> {
        let started = Instant::now();
        let result = self.inner.list_parents(kind, cursor, page_size).await;
        self.observe("list_parents", kind.as_str(), started, result)
    }

    async fn list_membership(
        &self,
        id: &str,
        cursor: Option<&str>,
    ) -> Result<Page<String>, RemoteError> {
        let started = Instant::now();
        let result = self.inner.list_membership(id, cursor).await;
        self.observe("list_membership", id, started, result)
    }

    async fn associate_items(
        &self,
        id: &str,
        items: &[String],
    ) -> Result<BatchOutcome, RemoteError> {
        let started = Instant::now();
        let result = self.inner.associate_items(id, items).await;
        self.observe("associate_items", id, started, result)
    }

    async fn disassociate_items(
        &self,
        id: &str,
        items: &[String],
    ) -> Result<BatchOutcome, RemoteError> {
        let started = Instant::now();
        let result = self.inner.disassociate_items(id, items).await;
        self.observe("disassociate_items", id, started, result)
    }

    async fn list_tags(&self, arn: &str) -> Result<Vec<Tag>, RemoteError> {
        let started = Instant::now();
        let result = self.inner.list_tags(arn).await;
        self.observe("list_tags", arn, started, result)
    }

    async fn add_tags(&self, arn: &str, tags: &[Tag]) -> Result<(), RemoteError> {
        let started = Instant::now();
        let result = self.inner.add_tags(arn, tags).await;
        self.observe("add_tags", arn, started, result)
    }

    async fn remove_tags(&self, arn: &str, keys: &[String]) -> Result<(), RemoteError> {
        let started = Instant::now();
        let result = self.inner.remove_tags(arn, keys).await;
        self.observe("remove_tags", arn, started, result)
    }

    fn backend_name(&self) -> &'static str {
        self.inner.backend_name()
    }
}
