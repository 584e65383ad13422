//! `pcat show <name>` – details of one plugin.

use anyhow::Result;
use pcat_core::catalog::PluginCatalogCache;
use pcat_core::plugin::Plugin;

pub async fn run_show(cache: &PluginCatalogCache, name: &str, locale: &str) -> Result<()> {
    match cache.get_plugin_by_name(name).await {
        Some(plugin) => {
            print!("{}", render_details(&plugin, locale));
            Ok(())
        }
        None => anyhow::bail!("no plugin named {:?}", name),
    }
}

pub(crate) fn render_details(plugin: &Plugin, locale: &str) -> String {
    let mut out = String::new();
    out.push_str(&plugin.name);
    if plugin.is_official() {
        out.push_str("  [official]");
    }
    out.push('\n');
    if let Some(text) = plugin.description_for(locale) {
        out.push_str(&format!("  {}\n", text));
    }
    out.push('\n');
    out.push_str(&format!("Authors:     {}\n", plugin.author.join(", ")));
    out.push_str(&format!("Repository:  {}\n", plugin.link));
    out.push_str(&format!("Updated:     {}\n", plugin.updated_at));
    match plugin.latest_release() {
        Some(r) => out.push_str(&format!("Latest:      {} ({})\n", r.tag_name, r.published_at)),
        None => out.push_str("Latest:      none\n"),
    }
    out.push_str(&format!("Downloads:   {}\n", plugin.total_downloads()));
    if let Some(url) = plugin.latest_download_url() {
        out.push_str(&format!("Install:     {}\n", url));
    }

    if !plugin.dependencies.is_empty() {
        out.push_str("\nDependencies:\n");
        for (dep, version) in &plugin.dependencies {
            out.push_str(&format!("  {} {}\n", dep, version));
        }
    }

    let releases = &plugin.repository.releases.releases;
    if !releases.is_empty() {
        out.push_str("\nReleases:\n");
        for r in releases {
            out.push_str(&format!(
                "  {:<12} {:<25} {:>8}",
                r.tag_name, r.published_at, r.downloads
            ));
            if let Some(url) = plugin.release_download_url(&r.tag_name) {
                out.push_str(&format!("  {}", url));
            }
            out.push('\n');
        }
    }
    out
}
