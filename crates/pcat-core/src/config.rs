use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Upstream manifest listing every plugin with its release statistics.
pub const DEFAULT_MANIFEST_URL: &str =
    "https://raw.githubusercontent.com/ExpTechTW/trem-plugins/refs/heads/main/data/repository_stats.json";

/// Cache store backend: JSON file (default), SQLite database, or process memory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    File,
    Sqlite,
    Memory,
}

impl StoreBackend {
    pub fn as_str(self) -> &'static str {
        match self {
            StoreBackend::File => "file",
            StoreBackend::Sqlite => "sqlite",
            StoreBackend::Memory => "memory",
        }
    }
}

/// Global configuration loaded from `~/.config/pcat/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PcatConfig {
    /// URL of the JSON manifest (array of plugin records).
    pub manifest_url: String,
    /// Cached catalog is served without network access for this long after a successful fetch.
    pub freshness_window_secs: u64,
    /// Upper bound on a whole manifest request, including body transfer.
    pub fetch_timeout_secs: u64,
    /// Upper bound on establishing the connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    /// Where the cache entry is persisted.
    #[serde(default)]
    pub store: StoreBackend,
    /// Preferred description locale (e.g. "zh_tw", "en").
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_locale() -> String {
    "zh_tw".to_string()
}

impl Default for PcatConfig {
    fn default() -> Self {
        Self {
            manifest_url: DEFAULT_MANIFEST_URL.to_string(),
            freshness_window_secs: 600,
            fetch_timeout_secs: 10,
            connect_timeout_secs: default_connect_timeout_secs(),
            store: StoreBackend::default(),
            locale: default_locale(),
        }
    }
}

impl PcatConfig {
    pub fn freshness_window(&self) -> Duration {
        Duration::from_secs(self.freshness_window_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Rejects values the cache cannot work with (non-http manifest URL, zero timeout).
    pub fn validate(&self) -> Result<()> {
        let parsed = url::Url::parse(&self.manifest_url)
            .with_context(|| format!("invalid manifest_url: {}", self.manifest_url))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            anyhow::bail!(
                "manifest_url must be http or https, got scheme {}",
                parsed.scheme()
            );
        }
        if self.fetch_timeout_secs == 0 {
            anyhow::bail!("fetch_timeout_secs must be greater than 0");
        }
        Ok(())
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("pcat")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<PcatConfig> {
    load_or_init_at(&config_path()?)
}

/// Like `load_or_init` but for an explicit path (tests, `--config`).
pub fn load_or_init_at(path: &Path) -> Result<PcatConfig> {
    if !path.exists() {
        let default_cfg = PcatConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)
        .with_context(|| format!("read config: {}", path.display()))?;
    let cfg: PcatConfig =
        toml::from_str(&data).with_context(|| format!("parse config: {}", path.display()))?;
    cfg.validate()?;
    Ok(cfg)
}
