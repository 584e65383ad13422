//! Integration test: curl manifest source and the catalog cache against a local HTTP server.

mod common;

use common::manifest_server::{self, Response};
use pcat_core::catalog::{CacheState, PluginCatalogCache, RefreshOutcome};
use pcat_core::clock::SystemClock;
use pcat_core::fetch::{CurlSource, ErrorKind, ManifestSource};
use pcat_core::store::{CacheStore, FileStore};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;

const MANIFEST: &str = r#"[
  {
    "name": "exptech-radar",
    "description": { "zh_tw": "雷達回波" },
    "author": ["ExpTechTW"],
    "link": "https://github.com/ExpTechTW/exptech-radar",
    "updated_at": 1718000000000,
    "dependencies": { "trem": ">=3.0.0" },
    "repository": {
      "full_name": "ExpTechTW/exptech-radar",
      "releases": {
        "releases": [{ "tag_name": "v1.0.0", "published_at": "2024-06-01T00:00:00Z", "downloads": 5 }],
        "total_downloads": 5
      }
    }
  },
  {
    "name": "地震通知",
    "description": { "zh_tw": "通知" },
    "author": ["someone"],
    "link": "https://github.com/someone/notify",
    "updated_at": "2024-06-02",
    "dependencies": {},
    "repository": { "releases": { "releases": [], "total_downloads": 0 } }
  }
]"#;

fn source(url: &str, timeout: Duration) -> CurlSource {
    CurlSource::new(url, timeout, Duration::from_secs(2))
}

#[tokio::test]
async fn curl_source_parses_manifest() {
    let server = manifest_server::start(Response::ok(MANIFEST));
    let plugins = source(&server.url, Duration::from_secs(10))
        .fetch()
        .await
        .expect("fetch");
    assert_eq!(plugins.len(), 2);
    assert_eq!(plugins[0].name, "exptech-radar");
    assert_eq!(plugins[1].name, "地震通知");
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn curl_source_reports_http_status() {
    let server = manifest_server::start(Response::status("404 Not Found"));
    let err = source(&server.url, Duration::from_secs(10))
        .fetch()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpStatus(404));
}

#[tokio::test]
async fn curl_source_rejects_partial_json() {
    let truncated = &MANIFEST.as_bytes()[..MANIFEST.len() / 2];
    let server = manifest_server::start(Response::ok(truncated));
    let err = source(&server.url, Duration::from_secs(10))
        .fetch()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Malformed);
}

#[tokio::test]
async fn curl_source_times_out() {
    let server =
        manifest_server::start(Response::ok(MANIFEST).delayed(Duration::from_secs(5)));
    let err = source(&server.url, Duration::from_secs(1))
        .fetch()
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
}

#[tokio::test]
async fn curl_source_connection_refused() {
    let url = manifest_server::closed_port_url();
    let err = source(&url, Duration::from_secs(5)).fetch().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Connection);
}

#[tokio::test]
async fn file_backed_cache_serves_fresh_then_stale_on_error() {
    let server = manifest_server::start(Response::ok(MANIFEST));
    let dir = tempdir().unwrap();
    let store_path = dir.path().join("cache.json");

    let cache = PluginCatalogCache::new(
        Arc::new(source(&server.url, Duration::from_secs(10))),
        Arc::new(FileStore::new(&store_path)),
        Arc::new(SystemClock),
        Duration::from_secs(600),
    );
    let first = cache.get_catalog().await;
    assert_eq!(first.len(), 2);
    assert_eq!(cache.list_all_names().await, ["exptech-radar", "地震通知"]);
    assert!(cache.get_plugin_by_name("地震通知").await.is_some());
    assert!(cache.get_plugin_by_name("missing").await.is_none());
    assert_eq!(server.hits(), 1, "later calls are served from the file store");

    // A new process with an expired window and a broken upstream still sees the old data.
    server.set_response(Response::status("500 Internal Server Error"));
    let store: Arc<dyn CacheStore> = Arc::new(FileStore::new(&store_path));
    let expired = PluginCatalogCache::new(
        Arc::new(source(&server.url, Duration::from_secs(10))),
        store,
        Arc::new(SystemClock),
        Duration::ZERO,
    );
    assert_eq!(expired.status().await.state, CacheState::Stale);
    let (catalog, outcome) = expired.refresh().await;
    assert_eq!(outcome, RefreshOutcome::FellBackToStale);
    assert_eq!(catalog, first);
    assert_eq!(server.hits(), 2);
}

#[tokio::test]
async fn unreachable_upstream_without_cache_is_empty() {
    let dir = tempdir().unwrap();
    let cache = PluginCatalogCache::new(
        Arc::new(source(&manifest_server::closed_port_url(), Duration::from_secs(5))),
        Arc::new(FileStore::new(dir.path().join("cache.json"))),
        Arc::new(SystemClock),
        Duration::from_secs(600),
    );
    assert!(cache.get_catalog().await.is_empty());
    assert!(cache.get_plugin_by_name("exptech-radar").await.is_none());
    assert!(!dir.path().join("cache.json").exists());
}

#[tokio::test]
async fn switching_manifest_url_does_not_reuse_the_other_feed() {
    let feed = |name: &str| {
        MANIFEST.replacen("\"exptech-radar\"", &format!("\"{}\"", name), 1)
    };
    let server_a = manifest_server::start(Response::ok(feed("from-a")));
    let server_b = manifest_server::start(Response::ok(feed("from-b")));
    let dir = tempdir().unwrap();
    let store_path = dir.path().join("cache.json");

    let cache_for = |url: &str| {
        PluginCatalogCache::new(
            Arc::new(source(url, Duration::from_secs(10))),
            Arc::new(FileStore::new(&store_path)),
            Arc::new(SystemClock),
            Duration::from_secs(600),
        )
    };

    let names_a = cache_for(&server_a.url).list_all_names().await;
    assert_eq!(names_a[0], "from-a");

    let names_b = cache_for(&server_b.url).list_all_names().await;
    assert_eq!(names_b[0], "from-b");
    assert_eq!(server_b.hits(), 1);
    assert_eq!(server_a.hits(), 1);
}
