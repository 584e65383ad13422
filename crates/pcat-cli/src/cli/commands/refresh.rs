//! `pcat refresh` – forced manifest fetch.

use anyhow::Result;
use pcat_core::catalog::{PluginCatalogCache, RefreshOutcome};

pub async fn run_refresh(cache: &PluginCatalogCache) -> Result<()> {
    let (plugins, outcome) = cache.refresh().await;
    match outcome {
        RefreshOutcome::Fetched => println!("Fetched {} plugins.", plugins.len()),
        RefreshOutcome::FellBackToStale => println!(
            "Fetch failed; keeping {} cached plugins (see log for details).",
            plugins.len()
        ),
        RefreshOutcome::Empty => anyhow::bail!("fetch failed and no cached catalog is available"),
    }
    Ok(())
}
