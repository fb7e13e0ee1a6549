//! Membership reconciliation.
//!
//! Converges the set of item URIs associated with one parent to a desired
//! set: read everything, diff, disassociate, then associate. Both sides are
//! chunked to the remote per-call maximum.

use std::collections::BTreeSet;

use steward_gateway::{FailedItem, RemoteGateway};
use tracing::{debug, info, warn};

use crate::diff::diff;
use crate::error::{LifecycleError, Result};
use crate::pagination::collect_membership;

/// Counts of applied membership changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub added: usize,
    pub removed: usize,
}

impl ReconcileSummary {
    pub fn is_noop(&self) -> bool {
        self.added == 0 && self.removed == 0
    }
}

/// Applies membership plans for one parent at a time.
pub struct MembershipReconciler<'a> {
    gateway: &'a dyn RemoteGateway,
    batch_size: usize,
}

impl<'a> MembershipReconciler<'a> {
    pub fn new(gateway: &'a dyn RemoteGateway, batch_size: usize) -> Self {
        Self {
            gateway,
            batch_size: batch_size.max(1),
        }
    }

    /// Converges the membership of `parent_id` to `desired`.
    ///
    /// `None` removes every member. A remote call error aborts immediately;
    /// items refused within accepted calls are collected across all chunks
    /// and reported together as [`LifecycleError::PartialFailure`].
    pub async fn reconcile(
        &self,
        parent_id: &str,
        desired: Option<&BTreeSet<String>>,
    ) -> Result<ReconcileSummary> {
        let current = collect_membership(self.gateway, parent_id).await?;
        let plan = diff(&current, desired);

        if plan.is_noop() {
            debug!(id = %parent_id, members = current.len(), "Membership already converged");
            return Ok(ReconcileSummary::default());
        }
        debug!(
            id = %parent_id,
            to_add = plan.to_add.len(),
            to_remove = plan.to_remove.len(),
            "Membership plan"
        );

        let mut failures: Vec<FailedItem> = Vec::new();
        let to_remove: Vec<String> = plan.to_remove.into_iter().collect();
        let to_add: Vec<String> = plan.to_add.into_iter().collect();

        for chunk in to_remove.chunks(self.batch_size) {
            let outcome = self.gateway.disassociate_items(parent_id, chunk).await?;
            failures.extend(outcome.failed_items);
        }
        let removal_failures = failures.len();

        for chunk in to_add.chunks(self.batch_size) {
            let outcome = self.gateway.associate_items(parent_id, chunk).await?;
            failures.extend(outcome.failed_items);
        }

        if !failures.is_empty() {
            warn!(
                id = %parent_id,
                failed = failures.len(),
                "Membership change partially refused"
            );
            let operation = match (removal_failures, failures.len() - removal_failures) {
                (0, _) => "associate",
                (_, 0) => "disassociate",
                _ => "associate/disassociate",
            };
            return Err(LifecycleError::partial_failure(operation, failures));
        }

        let summary = ReconcileSummary {
            added: to_add.len(),
            removed: to_remove.len(),
        };
        info!(
            id = %parent_id,
            added = summary.added,
            removed = summary.removed,
            "Membership reconciled"
        );
        Ok(summary)
    }
}
