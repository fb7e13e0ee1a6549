//! Set reconciliation.
//!
//! Computes the minimal add/remove sets that converge a current set to a
//! desired one. Pure and deterministic: ordered sets in, ordered sets out.
//!
//! An unset desired state (`None`) means "converge to empty", not "leave
//! unchanged". Callers that want to keep the current state must pass it as
//! the desired state.

use std::collections::{BTreeMap, BTreeSet};

use steward_gateway::Tag;

/// Changes needed to move from a current set to a desired set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciliationPlan<T: Ord> {
    pub to_add: BTreeSet<T>,
    pub to_remove: BTreeSet<T>,
}

impl<T: Ord> ReconciliationPlan<T> {
    /// True when current already equals desired.
    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Diffs `current` against `desired`.
///
/// - `desired == None`: nothing to add, everything current is removed.
/// - otherwise: `to_add = desired - current`, `to_remove = current - desired`.
pub fn diff<T: Ord + Clone>(current: &BTreeSet<T>, desired: Option<&BTreeSet<T>>) -> ReconciliationPlan<T> {
    match desired {
        None => ReconciliationPlan {
            to_add: BTreeSet::new(),
            to_remove: current.clone(),
        },
        Some(desired) => ReconciliationPlan {
            to_add: desired.difference(current).cloned().collect(),
            to_remove: current.difference(desired).cloned().collect(),
        },
    }
}

/// Tag changes in the shape the remote tag calls take.
///
/// Removal is by key, addition by key/value. A tag whose value changed shows
/// up in both lists and must be removed before it is re-added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPlan {
    pub to_add: Vec<Tag>,
    pub to_remove: Vec<String>,
}

impl TagPlan {
    pub fn is_noop(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Collects a tag list into a key-ordered map. Later duplicates win.
pub fn tag_map(tags: impl IntoIterator<Item = Tag>) -> BTreeMap<String, String> {
    tags.into_iter().map(|t| (t.key, t.value)).collect()
}

fn tag_set(tags: &BTreeMap<String, String>) -> BTreeSet<Tag> {
    tags.iter().map(|(k, v)| Tag::new(k, v)).collect()
}

/// Diffs tag maps with key/value pair equality.
pub fn diff_tags(
    current: &BTreeMap<String, String>,
    desired: Option<&BTreeMap<String, String>>,
) -> TagPlan {
    let desired = desired.map(tag_set);
    let plan = diff(&tag_set(current), desired.as_ref());

    TagPlan {
        to_add: plan.to_add.into_iter().collect(),
        to_remove: plan.to_remove.into_iter().map(|t| t.key).collect(),
    }
}
