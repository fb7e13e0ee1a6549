//! Layered CLI configuration: TOML file, then `STEWARD__` environment overrides.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use steward_core::ReconcileSettings;
use steward_gateway_memory::options::{
    DEFAULT_MAX_BATCH_ITEMS, DEFAULT_MAX_PAGE_SIZE, DEFAULT_MAX_TAGS_PER_CALL, GatewayOptions,
};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub reconcile: ReconcileSettings,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), String> {
        self.reconcile.validate()?;

        if self.gateway.state_file.as_os_str().is_empty() {
            return Err("gateway.state_file must not be empty".into());
        }
        if self.gateway.max_batch_items == 0 {
            return Err("gateway.max_batch_items must be > 0".into());
        }
        if self.gateway.max_tags_per_call == 0 {
            return Err("gateway.max_tags_per_call must be > 0".into());
        }
        if self.gateway.max_page_size == 0 {
            return Err("gateway.max_page_size must be > 0".into());
        }
        if self.reconcile.membership_batch_size > self.gateway.max_batch_items {
            return Err(
                "reconcile.membership_batch_size must be <= gateway.max_batch_items".into(),
            );
        }
        if self.reconcile.tag_batch_size > self.gateway.max_tags_per_call {
            return Err("reconcile.tag_batch_size must be <= gateway.max_tags_per_call".into());
        }
        if self.reconcile.list_page_size > self.gateway.max_page_size {
            return Err("reconcile.list_page_size must be <= gateway.max_page_size".into());
        }

        let lvl = self.logging.level.to_ascii_lowercase();
        let valid_levels = ["trace", "debug", "info", "warn", "error", "off"];
        if !valid_levels.contains(&lvl.as_str()) {
            return Err(format!("logging.level must be one of {valid_levels:?}"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// JSON image of the in-memory gateway, read before and written after
    /// every command.
    #[serde(default = "default_state_file")]
    pub state_file: PathBuf,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_account_id")]
    pub account_id: String,
    #[serde(default = "default_max_batch_items")]
    pub max_batch_items: usize,
    #[serde(default = "default_max_tags_per_call")]
    pub max_tags_per_call: usize,
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

fn default_state_file() -> PathBuf {
    PathBuf::from(".steward").join("state.json")
}
fn default_region() -> String {
    "us-east-1".into()
}
fn default_account_id() -> String {
    "000000000000".into()
}
fn default_max_batch_items() -> usize {
    DEFAULT_MAX_BATCH_ITEMS
}
fn default_max_tags_per_call() -> usize {
    DEFAULT_MAX_TAGS_PER_CALL
}
fn default_max_page_size() -> u32 {
    DEFAULT_MAX_PAGE_SIZE
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            region: default_region(),
            account_id: default_account_id(),
            max_batch_items: default_max_batch_items(),
            max_tags_per_call: default_max_tags_per_call(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl GatewayConfig {
    pub fn options(&self) -> GatewayOptions {
        GatewayOptions::default()
            .with_account(self.region.clone(), self.account_id.clone())
            .with_max_batch_items(self.max_batch_items)
            .with_max_tags_per_call(self.max_tags_per_call)
            .with_max_page_size(self.max_page_size)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "warn".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

pub mod loader {
    use super::AppConfig;
    use config::{Config, Environment, File};
    use std::path::PathBuf;

    /// File name looked up in the working directory, then in `~/.steward/`.
    pub const DEFAULT_CONFIG_FILE: &str = "steward.toml";

    fn default_path() -> Option<PathBuf> {
        let local = PathBuf::from(DEFAULT_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
        dirs::home_dir()
            .map(|home| home.join(".steward").join(DEFAULT_CONFIG_FILE))
            .filter(|p| p.exists())
    }

    pub fn load_config(path: Option<&str>) -> Result<AppConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(p) => {
                let pathbuf = PathBuf::from(p);
                if !pathbuf.exists() {
                    return Err(format!("config file not found: {p}"));
                }
                builder = builder.add_source(File::from(pathbuf));
            }
            None => {
                if let Some(default_path) = default_path() {
                    builder = builder.add_source(File::from(default_path));
                }
            }
        }
        // Environment variable overrides, e.g., STEWARD__RECONCILE__TAG_BATCH_SIZE=50
        builder = builder.add_source(
            Environment::with_prefix("STEWARD")
                .try_parsing(true)
                .separator("__"),
        );
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: AppConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}
