//! Read-through cache states.
//!
//! ```text
//! Empty --fetch ok--> Fresh          Empty --fetch err--> Empty  (serve [])
//! Fresh --window elapses--> Stale    Fresh: served, no network
//! Stale --fetch ok--> Fresh          Stale --fetch err--> Stale  (serve old payload)
//! ```

use std::time::Duration;

use super::CacheEntry;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// No usable entry in the store.
    Empty,
    /// Entry younger than the freshness window.
    Fresh,
    /// Entry at or past the freshness window; still usable as a fallback.
    Stale,
}

impl CacheState {
    pub fn of(entry: Option<&CacheEntry>, now_millis: i64, window: Duration) -> Self {
        match entry {
            None => CacheState::Empty,
            Some(e) if e.age_at(now_millis) < window => CacheState::Fresh,
            Some(_) => CacheState::Stale,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CacheState::Empty => "empty",
            CacheState::Fresh => "fresh",
            CacheState::Stale => "stale",
        }
    }
}
