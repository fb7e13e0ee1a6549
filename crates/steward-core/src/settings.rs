//! Reconciliation knobs shared by every lifecycle.

use serde::{Deserialize, Serialize};

/// Which tag state an Update diffs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotPolicy {
    /// Always list the current tags before diffing.
    #[default]
    Refetch,
    /// Use the caller's previous model when one is supplied.
    ///
    /// Only correct when the caller guarantees the previous model reflects
    /// the remote state; falls back to `Refetch` otherwise.
    TrustPrevious,
}

/// Tuning for reconciliation batching and list paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileSettings {
    /// Items per associate/disassociate call.
    pub membership_batch_size: usize,
    /// Tags per add/remove call.
    pub tag_batch_size: usize,
    /// Page size requested from the parent list call.
    pub list_page_size: u32,
    pub snapshot_policy: SnapshotPolicy,
}

impl Default for ReconcileSettings {
    fn default() -> Self {
        Self {
            membership_batch_size: 100,
            tag_batch_size: 200,
            list_page_size: 100,
            snapshot_policy: SnapshotPolicy::Refetch,
        }
    }
}

impl ReconcileSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.membership_batch_size == 0 {
            return Err("reconcile.membership_batch_size must be > 0".into());
        }
        if self.tag_batch_size == 0 {
            return Err("reconcile.tag_batch_size must be > 0".into());
        }
        if !(1..=100).contains(&self.list_page_size) {
            return Err("reconcile.list_page_size must be between 1 and 100".into());
        }
        Ok(())
    }

    #[must_use]
    pub fn with_membership_batch_size(mut self, size: usize) -> Self {
        self.membership_batch_size = size;
        self
    }

    #[must_use]
    pub fn with_tag_batch_size(mut self, size: usize) -> Self {
        self.tag_batch_size = size;
        self
    }

    #[must_use]
    pub fn with_list_page_size(mut self, size: u32) -> Self {
        self.list_page_size = size;
        self
    }

    #[must_use]
    pub fn with_snapshot_policy(mut self, policy: SnapshotPolicy) -> Self {
        self.snapshot_policy = policy;
        self
    }
}
