//! Manifest GET over libcurl.

use async_trait::async_trait;
use std::time::Duration;

use super::{FetchError, ManifestSource};
use crate::config::PcatConfig;
use crate::plugin::Plugin;

/// Fetches the manifest from a fixed URL.
#[derive(Debug, Clone)]
pub struct CurlSource {
    url: String,
    timeout: Duration,
    connect_timeout: Duration,
}

impl CurlSource {
    pub fn new(url: impl Into<String>, timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
            connect_timeout,
        }
    }

    pub fn from_config(cfg: &PcatConfig) -> Self {
        Self::new(
            cfg.manifest_url.clone(),
            cfg.fetch_timeout(),
            cfg.connect_timeout(),
        )
    }
}

#[async_trait]
impl ManifestSource for CurlSource {
    fn origin(&self) -> &str {
        &self.url
    }

    async fn fetch(&self) -> Result<Vec<Plugin>, FetchError> {
        let url = self.url.clone();
        let timeout = self.timeout;
        let connect_timeout = self.connect_timeout;
        tokio::task::spawn_blocking(move || get_manifest(&url, timeout, connect_timeout)).await?
    }
}

/// Performs the GET and parses the body.
///
/// Follows redirects. Runs in the current thread; `CurlSource` calls it from `spawn_blocking`.
pub fn get_manifest(
    url: &str,
    timeout: Duration,
    connect_timeout: Duration,
) -> Result<Vec<Plugin>, FetchError> {
    let body = get_body(url, timeout, connect_timeout)?;
    parse_manifest(&body)
}

fn get_body(url: &str, timeout: Duration, connect_timeout: Duration) -> Result<Vec<u8>, FetchError> {
    let mut body = Vec::new();

    let mut easy = curl::easy::Easy::new();
    easy.url(url)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(connect_timeout)?;
    easy.timeout(timeout)?;
    easy.useragent(concat!("pcat/", env!("CARGO_PKG_VERSION")))?;

    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        transfer.perform()?;
    }

    let code = easy.response_code()?;
    if !(200..300).contains(&code) {
        return Err(FetchError::Http(code));
    }
    tracing::debug!(url, bytes = body.len(), "manifest downloaded");
    Ok(body)
}

/// Parse a manifest body. Anything but a JSON array of complete records is an error.
pub fn parse_manifest(body: &[u8]) -> Result<Vec<Plugin>, FetchError> {
    Ok(serde_json::from_slice(body)?)
}
