//! JSON-file store under the XDG state dir (`~/.local/state/pcat/cache.json`).
//!
//! The whole store is one JSON object of string values. Every `set` rewrites
//! the file through a uniquely named temp file in the same directory and a
//! rename, so readers never see a partial file and concurrent writers never
//! share a temp file.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use super::CacheStore;

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Store at an explicit path. The file is created on first `set`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `~/.local/state/pcat/cache.json` (parent dir is created).
    pub fn open_default() -> Result<Self> {
        let xdg_dirs = xdg::BaseDirectories::with_prefix("pcat")?;
        let path = xdg_dirs
            .place_state_file("cache.json")
            .context("create pcat state dir")?;
        Ok(Self::new(path))
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(b) => b,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("read cache file: {}", self.path.display()))
            }
        };
        serde_json::from_slice(&bytes)
            .with_context(|| format!("parse cache file: {}", self.path.display()))
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json = serde_json::to_vec_pretty(entries).context("serialize cache file")?;
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomic(&path, &json))
            .await
            .context("cache file write task")?
    }
}

/// Write `bytes` to a fresh temp file next to `path`, then rename it over `path`.
fn write_atomic(path: &Path, bytes: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).with_context(|| format!("create dir: {}", dir.display()))?;
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("create temp file in {}", dir.display()))?;
    tmp.write_all(bytes)
        .with_context(|| format!("write cache file: {}", tmp.path().display()))?;
    tmp.persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("replace cache file: {}", path.display()))?;
    Ok(())
}

#[async_trait]
impl CacheStore for FileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all().await?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = match self.read_all().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("discarding unreadable cache file: {:#}", e);
                BTreeMap::new()
            }
        };
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries).await
    }
}
