//! Wire types for the gateway abstraction layer.
//!
//! This module defines all data types exchanged with a [`crate::RemoteGateway`].

use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

/// The family a parent resource belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResourceKind {
    /// A protection policy. Carries tags but no membership.
    Policy,
    /// A named set of resource URIs. Carries membership and tags.
    ResourceSet,
}

impl ResourceKind {
    /// Returns the path segment used in ARNs and error messages.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Policy => "policy",
            Self::ResourceSet => "resource-set",
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parent resource as held by the remote system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentRecord {
    /// Identity assigned by the remote system on create.
    pub id: String,
    /// Addressing key for tag operations.
    pub arn: String,
    /// Opaque optimistic-concurrency token; rotates on every write.
    pub update_token: String,
    /// The resource family.
    pub kind: ResourceKind,
    /// Resource-type-specific descriptive payload.
    pub spec: Value,
    /// When the remote system last wrote this resource.
    #[serde(with = "time::serde::rfc3339")]
    pub last_updated: OffsetDateTime,
}

impl ParentRecord {
    /// Creates a new `ParentRecord` stamped with the current time.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        arn: impl Into<String>,
        update_token: impl Into<String>,
        kind: ResourceKind,
        spec: Value,
    ) -> Self {
        Self {
            id: id.into(),
            arn: arn.into(),
            update_token: update_token.into(),
            kind,
            spec,
            last_updated: OffsetDateTime::now_utc(),
        }
    }

    /// Returns the `name` field of the payload, if present.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.spec.get("name").and_then(Value::as_str)
    }
}

/// Minimal projection of a parent resource returned by list calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentSummary {
    /// Identity of the resource.
    pub id: String,
    /// ARN of the resource.
    pub arn: String,
    /// Display name of the resource.
    pub name: String,
    /// The resource family.
    pub kind: ResourceKind,
}

impl From<&ParentRecord> for ParentSummary {
    fn from(record: &ParentRecord) -> Self {
        Self {
            id: record.id.clone(),
            arn: record.arn.clone(),
            name: record.name().unwrap_or_default().to_string(),
            kind: record.kind,
        }
    }
}

/// One page of a cursor-based list call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Items on this page.
    pub items: Vec<T>,
    /// Continuation cursor; `None` or empty when this is the last page.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// Creates a final page with no continuation.
    #[must_use]
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }

    /// Creates a page followed by `cursor`.
    #[must_use]
    pub fn with_cursor(items: Vec<T>, cursor: impl Into<String>) -> Self {
        Self {
            items,
            next_cursor: Some(cursor.into()),
        }
    }

    /// Returns the continuation cursor, treating an empty string as absent.
    #[must_use]
    pub fn continuation(&self) -> Option<&str> {
        self.next_cursor.as_deref().filter(|c| !c.is_empty())
    }
}

/// A key/value tag attached to a resource.
///
/// Ordering and equality cover both key and value, so a tag whose value
/// changed compares unequal to its previous version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Tag {
    /// Tag key.
    pub key: String,
    /// Tag value.
    pub value: String,
}

impl Tag {
    /// Creates a new `Tag`.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// An item the remote system refused within an otherwise accepted batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedItem {
    /// The item URI.
    pub uri: String,
    /// The remote system's reason code.
    pub reason: String,
}

impl FailedItem {
    /// Creates a new `FailedItem`.
    #[must_use]
    pub fn new(uri: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FailedItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.uri, self.reason)
    }
}

/// Result of a batched associate/disassociate call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchOutcome {
    /// Items that were not applied.
    #[serde(default)]
    pub failed_items: Vec<FailedItem>,
}

impl BatchOutcome {
    /// Creates an outcome in which every item was applied.
    #[must_use]
    pub fn succeeded() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parent_record_serialization() {
        let record = ParentRecord::new(
            "rs-1",
            "arn:aws:fms:us-east-1:000000000000:resource-set/rs-1",
            "tok-1",
            ResourceKind::ResourceSet,
            serde_json::json!({"name": "web"}),
        );

        let json = serde_json::to_string(&record).expect("serialization failed");
        let deserialized: ParentRecord =
            serde_json::from_str(&json).expect("deserialization failed");

        assert_eq!(record.id, deserialized.id);
        assert_eq!(record.update_token, deserialized.update_token);
        assert_eq!(deserialized.kind, ResourceKind::ResourceSet);
        assert_eq!(deserialized.name(), Some("web"));
    }

    #[test]
    fn test_page_continuation_treats_empty_as_absent() {
        let page: Page<String> = Page::with_cursor(vec![], "");
        assert_eq!(page.continuation(), None);

        let page: Page<String> = Page::with_cursor(vec![], "c1");
        assert_eq!(page.continuation(), Some("c1"));

        let page: Page<String> = Page::last(vec!["a".into()]);
        assert_eq!(page.continuation(), None);
    }

    #[test]
    fn test_tag_equality_includes_value() {
        assert_eq!(Tag::new("env", "prod"), Tag::new("env", "prod"));
        assert_ne!(Tag::new("env", "prod"), Tag::new("env", "dev"));

        let json = serde_json::to_value(Tag::new("env", "prod")).unwrap();
        assert_eq!(json, serde_json::json!({"key": "env", "value": "prod"}));
    }

    #[test]
    fn test_resource_kind_display() {
        assert_eq!(ResourceKind::Policy.to_string(), "policy");
        assert_eq!(ResourceKind::ResourceSet.to_string(), "resource-set");
    }

    #[test]
    fn test_summary_from_record() {
        let record = ParentRecord::new(
            "p-1",
            "arn:p-1",
            "t",
            ResourceKind::Policy,
            serde_json::json!({"name": "baseline"}),
        );
        let summary = ParentSummary::from(&record);
        assert_eq!(summary.name, "baseline");
        assert_eq!(summary.kind, ResourceKind::Policy);
    }
}
