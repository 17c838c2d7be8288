use crate::fetcher::{DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::retry::{Backoff, RetryPolicy};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Extra attempts after the first one.
    pub max_retries: u32,
    /// Delay strategy between attempts: "none", "fixed" or "exponential".
    pub backoff: Backoff,
    /// Base delay in milliseconds (fixed and exponential backoff).
    pub base_delay_ms: u64,
    /// Maximum backoff delay in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff: Backoff::None,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_retries.saturating_add(1),
            backoff: self.backoff,
            base_delay: Duration::from_millis(self.base_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms.max(self.base_delay_ms)),
        }
    }
}

/// Global configuration loaded from `~/.config/assetsync/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetSyncConfig {
    /// Catalog JSON file, relative to the project root unless absolute.
    pub catalog_path: PathBuf,
    /// Directory that catalog image paths are relative to.
    pub assets_dir: PathBuf,
    /// First segment of every stored image path (folder under `assets_dir`).
    pub asset_prefix: String,
    /// Products whose name or SKU equals this (any case) are removed.
    pub skip_sentinel: String,
    /// User agent for image requests.
    pub user_agent: String,
    /// Per-attempt transfer timeout in seconds.
    pub timeout_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    pub retry: Option<RetryConfig>,
}

impl Default for AssetSyncConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("assets/data/products.json"),
            assets_dir: PathBuf::from("assets"),
            asset_prefix: "products".to_string(),
            skip_sentinel: "test".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
            retry: None,
        }
    }
}

impl AssetSyncConfig {
    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("assetsync")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<AssetSyncConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = AssetSyncConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from_path(&path)
}

/// Load configuration from an explicit file.
pub fn load_from_path(path: &Path) -> Result<AssetSyncConfig> {
    let data =
        fs::read_to_string(path).with_context(|| format!("read config {}", path.display()))?;
    let cfg: AssetSyncConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}
