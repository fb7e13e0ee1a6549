use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use papaya::HashMap as PapayaHashMap;
use serde::{Deserialize, Serialize};
use steward_gateway::{ParentRecord, RemoteError, ResourceKind};
use tokio::sync::Mutex;

use crate::options::GatewayOptions;

pub type ParentKey = String; // Format: "kind/id"

pub(crate) fn make_parent_key(kind: ResourceKind, id: &str) -> ParentKey {
    format!("{kind}/{id}")
}

/// In-memory remote gateway using papaya lock-free HashMaps.
///
/// This backend provides:
/// - Parent records keyed by kind and identity, with rotating update tokens
/// - Membership sets per parent identity
/// - Tag maps addressed by ARN
/// - Cursor pagination and per-call limits taken from [`GatewayOptions`]
///
/// Reads are lock-free. Writes are serialised through a single async mutex so
/// that token checks and existence checks are atomic with the write itself.
#[derive(Debug)]
pub struct InMemoryGateway {
    /// Parent records: "kind/id" -> record
    pub(crate) parents: Arc<PapayaHashMap<ParentKey, ParentRecord>>,
    /// Membership: parent id -> item URIs
    pub(crate) membership: Arc<PapayaHashMap<String, BTreeSet<String>>>,
    /// Tags: arn -> key/value
    pub(crate) tags: Arc<PapayaHashMap<String, BTreeMap<String, String>>>,
    /// Serialises writers
    pub(crate) write_lock: Mutex<()>,
    pub(crate) options: GatewayOptions,
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryGateway {
    /// Creates a new empty gateway with default options.
    pub fn new() -> Self {
        Self::with_options(GatewayOptions::default())
    }

    /// Creates a new empty gateway with the given options.
    pub fn with_options(options: GatewayOptions) -> Self {
        Self {
            parents: Arc::new(PapayaHashMap::new()),
            membership: Arc::new(PapayaHashMap::new()),
            tags: Arc::new(PapayaHashMap::new()),
            write_lock: Mutex::new(()),
            options,
        }
    }

    /// Returns the options this gateway enforces.
    pub fn options(&self) -> &GatewayOptions {
        &self.options
    }

    /// Number of parent resources of all kinds.
    pub fn parent_count(&self) -> usize {
        self.parents.pin().len()
    }

    /// Builds the ARN for a new parent.
    pub(crate) fn make_arn(&self, kind: ResourceKind, id: &str) -> String {
        format!(
            "arn:aws:fms:{}:{}:{}/{}",
            self.options.region, self.options.account_id, kind, id
        )
    }

    /// Generates a fresh opaque update token.
    pub(crate) fn next_token() -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }

    /// Resolves a page size request against the configured maximum.
    pub(crate) fn page_size(&self, requested: Option<u32>) -> Result<usize, RemoteError> {
        let max = self.options.max_page_size;
        match requested {
            None => Ok(max as usize),
            Some(0) => Err(RemoteError::invalid_input("page size must be at least 1")),
            Some(n) if n > max => Err(RemoteError::invalid_input(format!(
                "page size {n} exceeds the maximum of {max}"
            ))),
            Some(n) => Ok(n as usize),
        }
    }

    /// Captures the complete state for persistence.
    pub fn snapshot(&self) -> GatewaySnapshot {
        let parents_guard = self.parents.pin();
        let mut parents: Vec<ParentRecord> =
            parents_guard.iter().map(|(_, record)| record.clone()).collect();
        parents.sort_by(|a, b| a.kind.cmp(&b.kind).then_with(|| a.id.cmp(&b.id)));

        let membership = self
            .membership
            .pin()
            .iter()
            .map(|(id, items)| (id.clone(), items.clone()))
            .collect();
        let tags = self
            .tags
            .pin()
            .iter()
            .map(|(arn, tags)| (arn.clone(), tags.clone()))
            .collect();

        GatewaySnapshot {
            parents,
            membership,
            tags,
        }
    }

    /// Rebuilds a gateway from a previously captured snapshot.
    pub fn from_snapshot(snapshot: GatewaySnapshot, options: GatewayOptions) -> Self {
        let gateway = Self::with_options(options);
        {
            let parents = gateway.parents.pin();
            for record in snapshot.parents {
                parents.insert(make_parent_key(record.kind, &record.id), record);
            }
        }
        {
            let membership = gateway.membership.pin();
            for (id, items) in snapshot.membership {
                membership.insert(id, items);
            }
        }
        {
            let tags = gateway.tags.pin();
            for (arn, entries) in snapshot.tags {
                tags.insert(arn, entries);
            }
        }
        gateway
    }
}

/// Serialisable image of an [`InMemoryGateway`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GatewaySnapshot {
    #[serde(default)]
    pub parents: Vec<ParentRecord>,
    #[serde(default)]
    pub membership: BTreeMap<String, BTreeSet<String>>,
    #[serde(default)]
    pub tags: BTreeMap<String, BTreeMap<String, String>>,
}

/// Decodes an offset cursor issued by this backend.
pub(crate) fn decode_cursor(cursor: Option<&str>) -> Result<usize, RemoteError> {
    match cursor.filter(|c| !c.is_empty()) {
        None => Ok(0),
        Some(c) => c
            .strip_prefix("off-")
            .and_then(|n| n.parse::<usize>().ok())
            .ok_or_else(|| RemoteError::invalid_input(format!("invalid pagination cursor: {c}"))),
    }
}

/// Slices one page out of `items` and issues the cursor for the next one.
pub(crate) fn paginate<T: Clone>(items: &[T], offset: usize, size: usize) -> (Vec<T>, Option<String>) {
    let end = offset.saturating_add(size).min(items.len());
    let page = items.get(offset..end).map(<[T]>::to_vec).unwrap_or_default();
    let next = (end < items.len()).then(|| format!("off-{end}"));
    (page, next)
}
