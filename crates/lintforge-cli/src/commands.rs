//! CLI command implementations
//!
//! Addressing and inspection commands live in this file; commands with
//! more moving parts have their own module:
//! - commands/generate.rs - full artifact generation
//! - commands/catalog.rs - Biome rule catalog snapshots
//! - commands/config.rs - settings management (init, show, schema)

pub mod catalog;
pub mod config;
pub mod generate;

use anyhow::{Context, bail};
use lintforge_core::{
    ArtifactLoader, FLAGS, Flag, FsArtifactStore, GeneratorSettings, Options, SettingsLoader,
    decode,
};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::OutputFormat;
use crate::output;

/// Load settings from `--config` or by discovery from the working directory
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<GeneratorSettings> {
    let settings = SettingsLoader::load(config_path, None)?;
    debug!("Loaded settings: {:?}", settings);
    Ok(settings)
}

/// Turn flag names into options; names may also be comma separated
pub fn parse_flags(names: &[String]) -> anyhow::Result<Options> {
    let mut options = Options::default();
    for name in names.iter().flat_map(|n| n.split(',')) {
        let name = name.trim();
        if name.is_empty() {
            continue;
        }
        let Some(flag) = Flag::from_name(&name.to_lowercase()) else {
            let known: Vec<&str> = FLAGS.iter().map(Flag::as_str).collect();
            bail!("Unknown flag '{}' (expected one of: {})", name, known.join(", "));
        };
        options.set(flag, true);
    }
    Ok(options)
}

/// Id command implementation
pub fn id_command(
    flags: Vec<String>,
    vector: Option<u32>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let options = match vector {
        Some(vector) => {
            if vector >> FLAGS.len() != 0 {
                bail!(
                    "Flag vector {} is out of range (0..{})",
                    vector,
                    1u32 << FLAGS.len()
                );
            }
            decode(vector, &FLAGS)
        }
        None => parse_flags(&flags)?,
    };

    output::print_address(&options, format)
}

/// Show command implementation
pub fn show_command(
    flags: Vec<String>,
    dir: Option<PathBuf>,
    variant: Option<String>,
    config_path: Option<PathBuf>,
) -> anyhow::Result<()> {
    let options = parse_flags(&flags)?;
    let settings = load_settings(config_path.as_deref())?;
    let dir = dir.unwrap_or_else(|| settings.output_dir());
    debug!("Loading artifact {} from {}", options.identifier(), dir.display());

    let loader = ArtifactLoader::new(FsArtifactStore::new(&dir, settings.format()));
    let configs = loader
        .load(&options)
        .with_context(|| format!("Run 'lintforge generate' to populate {}", dir.display()))?;

    match variant.as_deref() {
        None => println!("{}", serde_json::to_string_pretty(&configs)?),
        Some("base") => {
            let Some(base) = configs.first() else {
                bail!("Artifact {} contains no configuration", options.identifier());
            };
            println!("{}", serde_json::to_string_pretty(base)?);
        }
        Some(name) => {
            let Some(config) = configs.iter().find(|c| c.name.as_deref() == Some(name)) else {
                let available: Vec<&str> =
                    configs.iter().filter_map(|c| c.name.as_deref()).collect();
                bail!(
                    "Artifact {} has no configuration '{}' (available: base{}{})",
                    options.identifier(),
                    name,
                    if available.is_empty() { "" } else { ", " },
                    available.join(", ")
                );
            };
            println!("{}", serde_json::to_string_pretty(config)?);
        }
    }
    Ok(())
}
