//! Adapters for the supported resource families.

mod policy;
mod resource_set;

pub use policy::{PolicyAdapter, PolicyModel};
pub use resource_set::{ResourceSetAdapter, ResourceSetModel};

use std::collections::BTreeMap;

use steward_gateway::Tag;

use crate::error::{LifecycleError, Result};

pub(crate) fn require_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LifecycleError::invalid_request(format!(
            "{field} must not be empty"
        )));
    }
    Ok(())
}

/// Model tags as the map the reconciler diffs. Duplicate keys are rejected
/// rather than silently collapsed.
pub(crate) fn model_tags(tags: Option<&Vec<Tag>>) -> Result<Option<BTreeMap<String, String>>> {
    let Some(tags) = tags else {
        return Ok(None);
    };
    let mut map = BTreeMap::new();
    for tag in tags {
        if tag.key.trim().is_empty() {
            return Err(LifecycleError::invalid_request("tag keys must not be empty"));
        }
        if map.insert(tag.key.clone(), tag.value.clone()).is_some() {
            return Err(LifecycleError::invalid_request(format!(
                "duplicate tag key: {}",
                tag.key
            )));
        }
    }
    Ok(Some(map))
}

/// Remote tags as a model field: empty collapses to `None`.
pub(crate) fn view_tags(tags: BTreeMap<String, String>) -> Option<Vec<Tag>> {
    (!tags.is_empty()).then(|| tags.into_iter().map(|(k, v)| Tag::new(k, v)).collect())
}
