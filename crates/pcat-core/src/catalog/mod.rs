//! Plugin catalog cache: one network attempt per refresh, a time-boxed local
//! copy, and stale-on-error fallback.
//!
//! The cache entry lives in an injected [`CacheStore`] under three keys
//! (payload, fetch time, origin). It is written only after a successful
//! fetch; a failed fetch never touches it. An entry fetched from a different
//! origin than the current source counts as no entry.
//! None of the public operations can fail: the worst outcome is an empty
//! catalog.

mod state;

pub use state::CacheState;

use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::config::PcatConfig;
use crate::fetch::{CurlSource, ManifestSource};
use crate::plugin::Plugin;
use crate::store::CacheStore;

/// Store key holding the serialized plugin list.
pub const PAYLOAD_KEY: &str = "plugins";
/// Store key holding the last successful fetch time (epoch ms, decimal string).
pub const FETCHED_AT_KEY: &str = "plugins_fetched_at";
/// Store key holding the origin (manifest URL) the payload was fetched from.
pub const SOURCE_KEY: &str = "plugins_source";

/// Last successfully retrieved catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheEntry {
    pub payload: Vec<Plugin>,
    /// Epoch milliseconds.
    pub fetched_at: i64,
}

impl CacheEntry {
    /// Time since the fetch; zero if `fetched_at` is ahead of `now_millis`.
    pub fn age_at(&self, now_millis: i64) -> Duration {
        let delta = now_millis.saturating_sub(self.fetched_at).max(0);
        Duration::from_millis(delta as u64)
    }
}

/// What a refresh attempt ended up serving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Network fetch succeeded; the store holds the new payload.
    Fetched,
    /// Fetch failed; the previous payload was served.
    FellBackToStale,
    /// Fetch failed and nothing was cached.
    Empty,
}

/// Read-only snapshot of the cache, taken without network access.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheStatus {
    pub state: CacheState,
    pub fetched_at: Option<i64>,
    pub age: Option<Duration>,
    pub plugin_count: usize,
}

pub struct PluginCatalogCache {
    source: Arc<dyn ManifestSource>,
    store: Arc<dyn CacheStore>,
    clock: Arc<dyn Clock>,
    freshness_window: Duration,
}

impl PluginCatalogCache {
    pub fn new(
        source: Arc<dyn ManifestSource>,
        store: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
        freshness_window: Duration,
    ) -> Self {
        Self {
            source,
            store,
            clock,
            freshness_window,
        }
    }

    /// Curl source and system clock, parameters from the config.
    pub fn from_config(cfg: &PcatConfig, store: Arc<dyn CacheStore>) -> Self {
        Self::new(
            Arc::new(CurlSource::from_config(cfg)),
            store,
            Arc::new(SystemClock),
            cfg.freshness_window(),
        )
    }

    pub fn freshness_window(&self) -> Duration {
        self.freshness_window
    }

    /// Current catalog: cached payload while fresh, otherwise one fetch with
    /// fallback to the previous payload (any age) or to an empty list.
    pub async fn get_catalog(&self) -> Vec<Plugin> {
        let now = self.clock.now_millis();
        let entry = self.load_entry().await;
        match (CacheState::of(entry.as_ref(), now, self.freshness_window), entry) {
            (CacheState::Fresh, Some(entry)) => {
                tracing::debug!(
                    age_ms = entry.age_at(now).as_millis() as u64,
                    plugins = entry.payload.len(),
                    "serving cached catalog"
                );
                entry.payload
            }
            (_, entry) => self.fetch_or_fallback(entry).await.0,
        }
    }

    /// Fetch regardless of freshness. Same fallback rules as `get_catalog`.
    pub async fn refresh(&self) -> (Vec<Plugin>, RefreshOutcome) {
        let entry = self.load_entry().await;
        self.fetch_or_fallback(entry).await
    }

    /// First plugin whose name equals `name` exactly (case-sensitive).
    pub async fn get_plugin_by_name(&self, name: &str) -> Option<Plugin> {
        self.get_catalog().await.into_iter().find(|p| p.name == name)
    }

    /// Plugin names in feed order.
    pub async fn list_all_names(&self) -> Vec<String> {
        self.get_catalog()
            .await
            .into_iter()
            .map(|p| p.name)
            .collect()
    }

    pub async fn status(&self) -> CacheStatus {
        let now = self.clock.now_millis();
        let entry = self.load_entry().await;
        CacheStatus {
            state: CacheState::of(entry.as_ref(), now, self.freshness_window),
            fetched_at: entry.as_ref().map(|e| e.fetched_at),
            age: entry.as_ref().map(|e| e.age_at(now)),
            plugin_count: entry.as_ref().map_or(0, |e| e.payload.len()),
        }
    }

    async fn fetch_or_fallback(&self, previous: Option<CacheEntry>) -> (Vec<Plugin>, RefreshOutcome) {
        match self.source.fetch().await {
            Ok(payload) => {
                let fetched_at = self.clock.now_millis();
                tracing::info!(plugins = payload.len(), "manifest fetched");
                self.save_entry(&payload, fetched_at).await;
                (payload, RefreshOutcome::Fetched)
            }
            Err(e) => match previous {
                Some(entry) => {
                    tracing::warn!(
                        kind = e.kind().as_str(),
                        fetched_at = entry.fetched_at,
                        "manifest fetch failed, serving stale catalog: {}",
                        e
                    );
                    (entry.payload, RefreshOutcome::FellBackToStale)
                }
                None => {
                    tracing::warn!(
                        kind = e.kind().as_str(),
                        "manifest fetch failed and nothing is cached: {}",
                        e
                    );
                    (Vec::new(), RefreshOutcome::Empty)
                }
            },
        }
    }

    /// Entry from the store, or None if a key is missing or unreadable, or the
    /// entry belongs to another origin.
    async fn load_entry(&self) -> Option<CacheEntry> {
        let origin = self.read_key(SOURCE_KEY).await?;
        if origin != self.source.origin() {
            tracing::debug!(
                cached = %origin,
                current = self.source.origin(),
                "ignoring cache entry from another manifest origin"
            );
            return None;
        }
        let payload = self.read_key(PAYLOAD_KEY).await?;
        let fetched_at = self.read_key(FETCHED_AT_KEY).await?;

        let fetched_at = match fetched_at.trim().parse::<i64>() {
            Ok(t) => t,
            Err(e) => {
                tracing::warn!("ignoring cache entry with bad timestamp {:?}: {}", fetched_at, e);
                return None;
            }
        };
        let payload = match serde_json::from_str::<Vec<Plugin>>(&payload) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("ignoring cache entry with unreadable payload: {}", e);
                return None;
            }
        };
        Some(CacheEntry {
            payload,
            fetched_at,
        })
    }

    async fn read_key(&self, key: &str) -> Option<String> {
        match self.store.get(key).await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, "cache store read failed: {:#}", e);
                None
            }
        }
    }

    async fn save_entry(&self, payload: &[Plugin], fetched_at: i64) {
        let json = match serde_json::to_string(payload) {
            Ok(j) => j,
            Err(e) => {
                tracing::warn!("cannot serialize catalog for the cache: {}", e);
                return;
            }
        };
        // Timestamp goes last.
        for (key, value) in [(PAYLOAD_KEY, json.as_str()), (SOURCE_KEY, self.source.origin())] {
            if let Err(e) = self.store.set(key, value).await {
                tracing::warn!(key, "cache store write failed: {:#}", e);
                return;
            }
        }
        if let Err(e) = self
            .store
            .set(FETCHED_AT_KEY, &fetched_at.to_string())
            .await
        {
            tracing::warn!("cache store write failed: {:#}", e);
        }
    }
}
