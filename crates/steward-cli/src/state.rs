//! Persistence of the in-memory gateway between CLI runs.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use steward_gateway_memory::{GatewayOptions, GatewaySnapshot, InMemoryGateway};
use tracing::debug;

/// Restores the gateway from `path`, or starts empty when the file is absent.
pub fn load_gateway(path: &Path, options: GatewayOptions) -> Result<InMemoryGateway> {
    if !path.exists() {
        debug!(path = %path.display(), "No state file; starting empty");
        return Ok(InMemoryGateway::with_options(options));
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read state file: {}", path.display()))?;
    let snapshot: GatewaySnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Corrupt state file: {}", path.display()))?;
    debug!(path = %path.display(), parents = snapshot.parents.len(), "State restored");
    Ok(InMemoryGateway::from_snapshot(snapshot, options))
}

/// Writes the gateway image to `path` through a sibling temp file.
pub fn save_gateway(path: &Path, gateway: &InMemoryGateway) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create state directory: {}", dir.display()))?;
    }
    let content = serde_json::to_string_pretty(&gateway.snapshot())?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, content)
        .with_context(|| format!("Failed to write state file: {}", tmp.display()))?;
    fs::rename(&tmp, path)
        .with_context(|| format!("Failed to replace state file: {}", path.display()))?;
    debug!(path = %path.display(), "State saved");
    Ok(())
}
