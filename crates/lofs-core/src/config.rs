use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::retry::RetryPolicy;

/// Static path of the encrypted bundle below the configured origin.
pub const BUNDLE_PATH: &str = "data/encrypted_notes.dat";

/// Name of the metadata document inside the archive.
pub const METADATA_ENTRY: &str = "notes.json";

/// Archive prefix under which image assets are stored.
pub const IMAGE_PREFIX: &str = "images/";

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of transfer attempts (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 5,
        }
    }
}

impl RetryConfig {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts.max(1),
            base_delay: Duration::from_secs_f64(self.base_delay_secs.max(0.0)),
            max_delay: Duration::from_secs(self.max_delay_secs),
        }
    }
}

/// Global configuration loaded from `~/.config/lofs/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LofsConfig {
    /// Origin serving the static bundle, e.g. `https://notes.example.org/`.
    pub base_url: String,
    /// Seconds allowed for the TCP/TLS connect phase.
    pub connect_timeout_secs: u64,
    /// Abort when throughput stays below this many bytes/s for `low_speed_time_secs`.
    pub low_speed_limit_bytes: u32,
    pub low_speed_time_secs: u64,
    /// Optional hard cap on the whole transfer (None = no cap).
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
}

impl Default for LofsConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:3000/".to_string(),
            connect_timeout_secs: 15,
            low_speed_limit_bytes: 1024,
            low_speed_time_secs: 60,
            timeout_secs: None,
            retry: None,
        }
    }
}

impl LofsConfig {
    /// Full URL of the encrypted bundle (`base_url` joined with [`BUNDLE_PATH`]).
    pub fn bundle_url(&self) -> Result<String> {
        let mut base = url::Url::parse(&self.base_url)
            .with_context(|| format!("invalid base_url {:?}", self.base_url))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let joined = base.join(BUNDLE_PATH).context("join bundle path")?;
        Ok(joined.to_string())
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry.clone().unwrap_or_default().to_policy()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("lofs")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<LofsConfig> {
    load_or_init_at(&config_path()?)
}

/// Like [`load_or_init`] but for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<LofsConfig> {
    if !path.exists() {
        let default_cfg = LofsConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: LofsConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = LofsConfig::default();
        assert_eq!(cfg.connect_timeout_secs, 15);
        assert_eq!(cfg.low_speed_limit_bytes, 1024);
        assert!(cfg.timeout_secs.is_none());
        assert_eq!(cfg.retry_policy().max_attempts, 3);
    }

    #[test]
    fn bundle_url_joins_static_path() {
        let mut cfg = LofsConfig::default();
        cfg.base_url = "https://notes.example.org".to_string();
        assert_eq!(
            cfg.bundle_url().unwrap(),
            "https://notes.example.org/data/encrypted_notes.dat"
        );
        cfg.base_url = "https://example.org/lofs".to_string();
        assert_eq!(
            cfg.bundle_url().unwrap(),
            "https://example.org/lofs/data/encrypted_notes.dat"
        );
    }

    #[test]
    fn bundle_url_rejects_garbage() {
        let mut cfg = LofsConfig::default();
        cfg.base_url = "not a url".to_string();
        assert!(cfg.bundle_url().is_err());
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            base_url = "https://example.org/"
            connect_timeout_secs = 5
            low_speed_limit_bytes = 10
            low_speed_time_secs = 20
            timeout_secs = 120

            [retry]
            max_attempts = 1
            base_delay_secs = 0.5
            max_delay_secs = 2
        "#;
        let cfg: LofsConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.base_url, "https://example.org/");
        assert_eq!(cfg.timeout_secs, Some(120));
        let policy = cfg.retry_policy();
        assert_eq!(policy.max_attempts, 1);
        assert_eq!(policy.base_delay, Duration::from_millis(500));
        assert_eq!(policy.max_delay, Duration::from_secs(2));
    }

    #[test]
    fn load_or_init_writes_default_then_reads_it_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let created = load_or_init_at(&path).unwrap();
        assert!(path.exists());
        let loaded = load_or_init_at(&path).unwrap();
        assert_eq!(loaded.base_url, created.base_url);
        assert_eq!(loaded.connect_timeout_secs, created.connect_timeout_secs);
    }
}
