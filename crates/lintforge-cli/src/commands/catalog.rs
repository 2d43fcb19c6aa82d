//! Biome rule catalog subcommands
//!
//! - fetch: retrieve the published metadata and store a snapshot
//! - list: show which ESLint rule each catalog entry suppresses

use colored::Colorize;
use lintforge_core::BiomeAdapter;
use lintforge_core::catalog::{fetch_catalog, save_catalog};
use std::path::PathBuf;
use tracing::debug;

use super::load_settings;

/// Catalog fetch command implementation
pub async fn fetch_command(
    url: Option<String>,
    output: PathBuf,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let settings = load_settings(config_path.as_deref())?;
    let url = url.unwrap_or_else(|| settings.catalog_url().to_string());

    let tree = fetch_catalog(&url).await?;
    let catalog = BiomeAdapter::default()
        .include_inspired(settings.include_inspired())
        .flatten(&tree)?;
    save_catalog(&tree, &output)?;

    println!(
        "{} Saved catalog snapshot to {} ({} rules with an ESLint counterpart)",
        "✓".green(),
        output.display(),
        catalog.len()
    );
    Ok(())
}

/// Catalog list command implementation
pub async fn list_command(
    path: Option<PathBuf>,
    include_inspired: bool,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let settings = load_settings(config_path.as_deref())?;
    let adapter =
        BiomeAdapter::default().include_inspired(include_inspired || settings.include_inspired());

    let catalog = match path.as_deref().or(settings.catalog_path()) {
        Some(path) => {
            debug!("Reading catalog snapshot {}", path.display());
            adapter.load(path)?
        }
        None => adapter.fetch(settings.catalog_url()).await?,
    };

    for (rule, entry) in &catalog.entries {
        println!(
            "  {:<32} {} {}",
            rule,
            entry.original_rule.bold(),
            format!("({})", entry.category).dimmed()
        );
    }
    println!("\nTotal: {} rules", catalog.len());
    Ok(())
}
