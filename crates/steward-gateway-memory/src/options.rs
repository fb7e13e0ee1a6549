use serde::{Deserialize, Serialize};

/// Per-call maximum for associate/disassociate item lists.
pub const DEFAULT_MAX_BATCH_ITEMS: usize = 100;

/// Per-call maximum for tag lists.
pub const DEFAULT_MAX_TAGS_PER_CALL: usize = 200;

/// Largest page any list call returns.
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

/// Behavioural knobs for the in-memory backend.
///
/// The defaults mirror the hosted service's documented limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayOptions {
    /// Region segment of generated ARNs.
    pub region: String,
    /// Account segment of generated ARNs.
    pub account_id: String,
    /// Maximum items accepted by one associate/disassociate call.
    pub max_batch_items: usize,
    /// Maximum tags accepted by one add/remove call.
    pub max_tags_per_call: usize,
    /// Maximum (and default) page size of list calls.
    pub max_page_size: u32,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            account_id: "000000000000".to_string(),
            max_batch_items: DEFAULT_MAX_BATCH_ITEMS,
            max_tags_per_call: DEFAULT_MAX_TAGS_PER_CALL,
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
        }
    }
}

impl GatewayOptions {
    /// Sets the region and account used in ARNs.
    #[must_use]
    pub fn with_account(mut self, region: impl Into<String>, account_id: impl Into<String>) -> Self {
        self.region = region.into();
        self.account_id = account_id.into();
        self
    }

    /// Sets the per-call item maximum for associate/disassociate.
    #[must_use]
    pub fn with_max_batch_items(mut self, max: usize) -> Self {
        self.max_batch_items = max;
        self
    }

    /// Sets the per-call tag maximum for add/remove.
    #[must_use]
    pub fn with_max_tags_per_call(mut self, max: usize) -> Self {
        self.max_tags_per_call = max;
        self
    }

    /// Sets the largest page size list calls return.
    #[must_use]
    pub fn with_max_page_size(mut self, max: u32) -> Self {
        self.max_page_size = max;
        self
    }
}
