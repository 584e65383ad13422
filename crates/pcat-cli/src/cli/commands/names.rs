//! `pcat names` – plugin names in feed order.

use anyhow::Result;
use pcat_core::catalog::PluginCatalogCache;

pub async fn run_names(cache: &PluginCatalogCache) -> Result<()> {
    for name in cache.list_all_names().await {
        println!("{}", name);
    }
    Ok(())
}
