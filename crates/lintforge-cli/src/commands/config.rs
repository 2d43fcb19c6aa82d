//! Settings management subcommands
//!
//! - init: write a settings file with every default spelled out
//! - show: print the settings after discovery and merging
//! - schema: print the JSON Schema for editor support

use anyhow::bail;
use lintforge_core::{GeneratorSettings, SettingsLoader};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::load_settings;
use crate::ConfigFormat;

/// Config init command implementation
pub fn init_command(format: ConfigFormat, force: bool) -> anyhow::Result<()> {
    debug!("Initializing settings file with format: {:?}", format);

    let filename = match format {
        ConfigFormat::Json => ".lintforgerc.json",
        ConfigFormat::Toml => ".lintforgerc.toml",
    };
    let path = Path::new(filename);

    if path.exists() && !force {
        bail!("Settings file '{filename}' already exists. Use --force to overwrite.");
    }

    SettingsLoader::write(&GeneratorSettings::with_defaults(), path)?;

    println!("✅ Created settings file: {filename}");
    println!("   Run 'lintforge generate' to write the artifacts.");
    Ok(())
}

/// Config show command implementation
pub fn show_command(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let mut settings = load_settings(config_path.as_deref())?;
    settings.merge_with(GeneratorSettings::with_defaults());
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}

/// Config schema command implementation
pub fn schema_command() -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&GeneratorSettings::json_schema())?
    );
    Ok(())
}
