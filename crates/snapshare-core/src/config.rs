//! Application configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use snapshare_batches::{DEFAULT_RETENTION_HOURS, DEFAULT_STORAGE_KEY};

use crate::error::CoreError;
use crate::Result;

/// Optional overrides file inside the data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Environment variable that relocates the data directory.
pub const DATA_DIR_ENV: &str = "SNAPSHARE_DATA_DIR";

/// Longest accepted retention window, about a century.
pub const MAX_RETENTION_HOURS: i64 = 100 * 365 * 24;

/// Longest accepted sweep period, one year.
pub const MAX_SWEEP_INTERVAL_SECS: u64 = 365 * 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Path to the database file
    pub database_path: PathBuf,
    /// Storage key holding the serialized batch map
    pub storage_key: String,
    /// How long a batch stays available after upload
    pub retention_hours: i64,
    /// Period of the background expiry sweep
    pub sweep_interval_secs: u64,
    /// Maximum number of images in one batch
    pub max_files: usize,
    /// Byte limit for everything in storage; `None` for unlimited
    pub storage_quota_bytes: Option<usize>,
    /// Base URL that share links are built on
    pub share_base_url: String,
}

/// Fields accepted in `config.json`; anything omitted keeps its default.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigOverrides {
    database_path: Option<PathBuf>,
    storage_key: Option<String>,
    retention_hours: Option<i64>,
    sweep_interval_secs: Option<u64>,
    max_files: Option<usize>,
    /// Present-but-null means "no quota", so absence and null must differ
    #[serde(deserialize_with = "present")]
    storage_quota_bytes: Option<Option<usize>>,
    share_base_url: Option<String>,
}

fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl Config {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            database_path: data_dir.join("snapshare.db"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            retention_hours: DEFAULT_RETENTION_HOURS,
            sweep_interval_secs: 60 * 60,
            max_files: 10,
            // Roughly what a browser grants a single origin
            storage_quota_bytes: Some(10 * 1024 * 1024),
            share_base_url: "snapshare://local/".to_string(),
        }
    }

    pub fn data_dir() -> PathBuf {
        if let Some(dir) = std::env::var_os(DATA_DIR_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }

        dirs::data_local_dir()
            .map(|d| d.join("SnapShare"))
            .unwrap_or_else(|| PathBuf::from(".snapshare"))
    }

    /// Defaults for `data_dir`, overlaid with `config.json` from that
    /// directory when it exists.
    pub fn load(data_dir: &Path) -> Result<Self> {
        let mut config = Self::new(data_dir.to_path_buf());
        let path = data_dir.join(CONFIG_FILE_NAME);

        if path.is_file() {
            let raw = std::fs::read_to_string(&path)?;
            let overrides: ConfigOverrides = serde_json::from_str(&raw)
                .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;
            config.apply(overrides);
            tracing::debug!(path = %path.display(), "Loaded configuration overrides");
        }

        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(v) = overrides.database_path {
            self.database_path = v;
        }
        if let Some(v) = overrides.storage_key {
            self.storage_key = v;
        }
        if let Some(v) = overrides.retention_hours {
            self.retention_hours = v;
        }
        if let Some(v) = overrides.sweep_interval_secs {
            self.sweep_interval_secs = v;
        }
        if let Some(v) = overrides.max_files {
            self.max_files = v;
        }
        if let Some(v) = overrides.storage_quota_bytes {
            self.storage_quota_bytes = v;
        }
        if let Some(v) = overrides.share_base_url {
            self.share_base_url = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.retention_hours <= 0 || self.retention_hours > MAX_RETENTION_HOURS {
            return Err(CoreError::Config(format!(
                "retention_hours must be between 1 and {MAX_RETENTION_HOURS}"
            )));
        }
        if self.sweep_interval_secs == 0 || self.sweep_interval_secs > MAX_SWEEP_INTERVAL_SECS {
            return Err(CoreError::Config(format!(
                "sweep_interval_secs must be between 1 and {MAX_SWEEP_INTERVAL_SECS}"
            )));
        }
        if self.max_files == 0 {
            return Err(CoreError::Config("max_files must be positive".to_string()));
        }
        if self.storage_key.trim().is_empty() {
            return Err(CoreError::Config("storage_key cannot be empty".to_string()));
        }
        url::Url::parse(&self.share_base_url)
            .map_err(|e| CoreError::Config(format!("share_base_url: {e}")))?;
        Ok(())
    }

    pub fn retention(&self) -> chrono::Duration {
        chrono::Duration::hours(self.retention_hours)
    }

    pub fn sweep_interval(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.sweep_interval_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(Self::data_dir())
    }
}
