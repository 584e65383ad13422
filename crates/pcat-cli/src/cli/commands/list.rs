//! `pcat list` – table of all plugins.

use anyhow::Result;
use pcat_core::catalog::PluginCatalogCache;
use pcat_core::plugin::Plugin;

pub async fn run_list(cache: &PluginCatalogCache) -> Result<()> {
    let plugins = cache.get_catalog().await;
    print!("{}", render_table(&plugins));
    Ok(())
}

pub(crate) fn render_table(plugins: &[Plugin]) -> String {
    if plugins.is_empty() {
        return "No plugins available.\n".to_string();
    }
    let width = plugins
        .iter()
        .map(|p| p.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("NAME".len());
    let mut out = format!(
        "{:<width$}  {:<12} {:>10}  {}\n",
        "NAME", "LATEST", "DOWNLOADS", "OFFICIAL"
    );
    for p in plugins {
        let latest = p
            .latest_release()
            .map(|r| r.tag_name.as_str())
            .unwrap_or("-");
        out.push_str(&format!(
            "{:<width$}  {:<12} {:>10}  {}\n",
            p.name,
            latest,
            p.total_downloads(),
            if p.is_official() { "yes" } else { "" }
        ));
    }
    out
}
