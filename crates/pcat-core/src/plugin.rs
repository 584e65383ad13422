//! Plugin records as published in the upstream manifest.
//!
//! The manifest is a JSON array; every field below except
//! `repository.full_name` is required, so a record missing one of them makes
//! the whole manifest fail to parse.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Author identifier that marks a plugin as made by the official organisation.
pub const OFFICIAL_AUTHOR: &str = "ExpTechTW";

/// Locale used when the requested one has no description.
pub const FALLBACK_LOCALE: &str = "zh_tw";

/// File extension of release assets.
const ASSET_EXTENSION: &str = "trem";

/// One plugin entry of the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plugin {
    /// Unique identifier; also the release asset base name.
    pub name: String,
    /// Localized description keyed by locale tag (e.g. `zh_tw`).
    pub description: BTreeMap<String, String>,
    /// Contributors, in display order.
    pub author: Vec<String>,
    /// Repository URL.
    pub link: String,
    /// Last metadata sync as published upstream.
    pub updated_at: Timestamp,
    /// Dependency name to version or range.
    pub dependencies: BTreeMap<String, String>,
    pub repository: Repository,
}

/// Timestamp kept verbatim: the feed may publish epoch numbers or date strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Number(serde_json::Number),
    Text(String),
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Timestamp::Number(n) => write!(f, "{}", n),
            Timestamp::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// `owner/repo` slug; needed to build release download links.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    pub releases: Releases,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Releases {
    /// Newest first.
    pub releases: Vec<Release>,
    pub total_downloads: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    pub tag_name: String,
    pub published_at: String,
    pub downloads: u64,
}

impl Plugin {
    /// True when the official organisation is listed among the authors.
    pub fn is_official(&self) -> bool {
        self.author.iter().any(|a| a == OFFICIAL_AUTHOR)
    }

    pub fn latest_release(&self) -> Option<&Release> {
        self.repository.releases.releases.first()
    }

    pub fn total_downloads(&self) -> u64 {
        self.repository.releases.total_downloads
    }

    /// Direct asset link for a given release tag.
    pub fn release_download_url(&self, tag: &str) -> Option<String> {
        let full_name = self.repository.full_name.as_deref()?;
        Some(format!(
            "https://github.com/{}/releases/download/{}/{}.{}",
            full_name, tag, self.name, ASSET_EXTENSION
        ))
    }

    /// Link that always resolves to the newest release asset. None when nothing was released.
    pub fn latest_download_url(&self) -> Option<String> {
        self.latest_release()?;
        let full_name = self.repository.full_name.as_deref()?;
        Some(format!(
            "https://github.com/{}/releases/latest/download/{}.{}",
            full_name, self.name, ASSET_EXTENSION
        ))
    }

    /// Description in `locale`, else the fallback locale, else any available text.
    pub fn description_for(&self, locale: &str) -> Option<&str> {
        self.description
            .get(locale)
            .or_else(|| self.description.get(FALLBACK_LOCALE))
            .or_else(|| self.description.values().next())
            .map(String::as_str)
    }
}
