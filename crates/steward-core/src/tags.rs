//! Tag reconciliation.
//!
//! Tags are addressed by ARN. Removal runs before addition so that a tag
//! whose value changed ends up with the new value.

use std::collections::BTreeMap;

use steward_gateway::RemoteGateway;
use tracing::{debug, info};

use crate::diff::{TagPlan, diff_tags, tag_map};
use crate::error::Result;

/// Applies tag plans for one resource at a time.
pub struct TagReconciler<'a> {
    gateway: &'a dyn RemoteGateway,
    batch_size: usize,
}

impl<'a> TagReconciler<'a> {
    pub fn new(gateway: &'a dyn RemoteGateway, batch_size: usize) -> Self {
        Self {
            gateway,
            batch_size: batch_size.max(1),
        }
    }

    /// Lists the tags currently attached to `arn`.
    pub async fn current(&self, arn: &str) -> Result<BTreeMap<String, String>> {
        Ok(tag_map(self.gateway.list_tags(arn).await?))
    }

    /// Converges the tags of `arn` from `current` to `desired`.
    ///
    /// `None` removes every tag. Returns the plan that was applied.
    pub async fn reconcile(
        &self,
        arn: &str,
        current: &BTreeMap<String, String>,
        desired: Option<&BTreeMap<String, String>>,
    ) -> Result<TagPlan> {
        let plan = diff_tags(current, desired);
        if plan.is_noop() {
            debug!(arn = %arn, "Tags already converged");
            return Ok(plan);
        }

        for keys in plan.to_remove.chunks(self.batch_size) {
            self.gateway.remove_tags(arn, keys).await?;
        }
        for tags in plan.to_add.chunks(self.batch_size) {
            self.gateway.add_tags(arn, tags).await?;
        }

        info!(
            arn = %arn,
            added = plan.to_add.len(),
            removed = plan.to_remove.len(),
            "Tags reconciled"
        );
        Ok(plan)
    }
}
