//! CLI for the pcat plugin catalog.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pcat_core::catalog::PluginCatalogCache;
use pcat_core::config;
use pcat_core::store;

use commands::{run_list, run_names, run_refresh, run_show, run_status};

/// Top-level CLI for the plugin catalog.
#[derive(Debug, Parser)]
#[command(name = "pcat")]
#[command(about = "pcat: browse the plugin marketplace catalog", long_about = None)]
pub struct Cli {
    /// Manifest URL to use instead of the configured one.
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// List every plugin with its latest release and download count.
    List,

    /// Show one plugin in detail.
    Show {
        /// Exact plugin name (case-sensitive).
        name: String,
    },

    /// Print plugin names, one per line, in feed order.
    Names,

    /// Show cache state without touching the network.
    Status,

    /// Fetch the manifest now, ignoring the freshness window.
    Refresh,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        if let Some(url) = cli.url {
            cfg.manifest_url = url;
            cfg.validate()?;
        }
        tracing::debug!("loaded config: {:?}", cfg);

        let store = store::open_configured(&cfg).await?;
        let cache = PluginCatalogCache::from_config(&cfg, store);

        match cli.command {
            CliCommand::List => run_list(&cache).await?,
            CliCommand::Show { name } => run_show(&cache, &name, &cfg.locale).await?,
            CliCommand::Names => run_names(&cache).await?,
            CliCommand::Status => run_status(&cache, &cfg).await?,
            CliCommand::Refresh => run_refresh(&cache).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
