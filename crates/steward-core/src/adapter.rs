//! Resource-type adapters.
//!
//! The lifecycle state machine is written once; everything that differs
//! between resource families (payload shape, whether membership exists, how
//! a remote record is projected back) is supplied by a [`ResourceAdapter`].

use std::collections::{BTreeMap, BTreeSet};

use serde_json::Value;
use steward_gateway::{ParentRecord, ParentSummary, ResourceKind};

use crate::error::Result;

/// Everything the remote system knows about one parent.
#[derive(Debug, Clone)]
pub struct ResourceView {
    pub record: ParentRecord,
    pub tags: BTreeMap<String, String>,
    /// `None` for families without membership.
    pub membership: Option<BTreeSet<String>>,
}

/// Capability set for one resource family.
///
/// # Example
///
/// ```ignore
/// use steward_core::{Lifecycle, resources::ResourceSetAdapter};
///
/// let lifecycle = Lifecycle::new(gateway, ResourceSetAdapter);
/// let created = lifecycle.create(model).await?;
/// ```
pub trait ResourceAdapter: Send + Sync {
    /// Caller-facing model of this family.
    type Model: Clone + Send + Sync;

    fn kind(&self) -> ResourceKind;

    /// Whether parents of this family carry a membership set.
    fn has_membership(&self) -> bool {
        false
    }

    /// The remote identity carried by a model, if any.
    fn identifier<'m>(&self, model: &'m Self::Model) -> Option<&'m str>;

    /// Builds the remote payload from a desired model.
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::InvalidRequest` when the model cannot be sent.
    fn build_spec(&self, model: &Self::Model) -> Result<Value>;

    /// Desired tag state; `None` means "no tags".
    ///
    /// # Errors
    ///
    /// Returns `LifecycleError::InvalidRequest` for blank or duplicate keys.
    fn desired_tags(&self, model: &Self::Model) -> Result<Option<BTreeMap<String, String>>>;

    /// Desired membership; `None` means "no members".
    fn desired_membership(&self, _model: &Self::Model) -> Option<BTreeSet<String>> {
        None
    }

    /// Projects a complete remote view into a model.
    fn assemble(&self, view: ResourceView) -> Result<Self::Model>;

    /// Projects a list summary into a minimal model.
    fn summarize(&self, summary: &ParentSummary) -> Result<Self::Model>;
}

/// Returns the trimmed identifier, treating blank as absent.
pub(crate) fn non_blank(id: Option<&str>) -> Option<&str> {
    id.map(str::trim).filter(|id| !id.is_empty())
}
