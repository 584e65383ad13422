//! Manifest retrieval.
//!
//! `ManifestSource` is the network capability handed to the catalog cache.
//! The default implementation performs one HTTP GET with libcurl, bounded by
//! connect/total timeouts, and parses the body as a JSON array of plugins.

mod curl_source;
mod error;

pub use curl_source::{get_manifest, parse_manifest, CurlSource};
pub use error::{classify, ErrorKind, FetchError};

use async_trait::async_trait;

use crate::plugin::Plugin;

#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// Identifies the feed (the manifest URL). Cached entries from another origin are ignored.
    fn origin(&self) -> &str;

    /// One attempt at retrieving the full manifest. No retries.
    async fn fetch(&self) -> Result<Vec<Plugin>, FetchError>;
}
