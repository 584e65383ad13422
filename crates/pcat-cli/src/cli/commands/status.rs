//! `pcat status` – cache state, no network.

use anyhow::Result;
use pcat_core::catalog::{CacheStatus, PluginCatalogCache};
use pcat_core::config::PcatConfig;
use std::time::Duration;

pub async fn run_status(cache: &PluginCatalogCache, cfg: &PcatConfig) -> Result<()> {
    let status = cache.status().await;
    println!("manifest:  {}", cfg.manifest_url);
    println!("store:     {}", cfg.store.as_str());
    print!("{}", render_status(&status, cache.freshness_window()));
    Ok(())
}

pub(crate) fn render_status(status: &CacheStatus, window: Duration) -> String {
    let mut out = format!("state:     {}\n", status.state.as_str());
    if let (Some(fetched_at), Some(age)) = (status.fetched_at, status.age) {
        out.push_str(&format!("fetched:   {} (epoch ms)\n", fetched_at));
        out.push_str(&format!(
            "age:       {} (window {})\n",
            human_duration(age),
            human_duration(window)
        ));
    }
    out.push_str(&format!("plugins:   {}\n", status.plugin_count));
    out
}

fn human_duration(d: Duration) -> String {
    let secs = d.as_secs();
    if secs < 60 {
        format!("{}s", secs)
    } else if secs < 3600 {
        format!("{}m{:02}s", secs / 60, secs % 60)
    } else {
        format!("{}h{:02}m", secs / 3600, (secs % 3600) / 60)
    }
}
