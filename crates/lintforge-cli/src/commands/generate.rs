//! Generate command

use anyhow::Context;
use lintforge_core::{
    ArtifactFormat, BiomeAdapter, CatalogSettings, FsArtifactStore, Generator, GeneratorSettings,
    PresetBundle, RuleCatalog,
};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info};

use super::load_settings;
use crate::OutputFormat;
use crate::output;

/// Command-line values that take precedence over the settings file
#[derive(Debug, Default)]
pub struct GenerateOverrides {
    pub output_dir: Option<PathBuf>,
    pub format: Option<String>,
    pub base_target: Option<String>,
    pub presets: Option<PathBuf>,
    pub catalog_url: Option<String>,
    pub catalog_path: Option<PathBuf>,
    pub no_catalog: bool,
    pub include_inspired: bool,
}

impl GenerateOverrides {
    fn into_settings(self) -> anyhow::Result<GeneratorSettings> {
        let format = self
            .format
            .as_deref()
            .map(str::parse::<ArtifactFormat>)
            .transpose()?;

        let catalog = (self.catalog_url.is_some()
            || self.catalog_path.is_some()
            || self.include_inspired)
            .then(|| CatalogSettings {
                url: self.catalog_url,
                path: self.catalog_path,
                include_inspired: self.include_inspired.then_some(true),
            });

        Ok(GeneratorSettings {
            schema: None,
            output_dir: self.output_dir,
            format,
            base_target: self.base_target,
            presets: self.presets,
            catalog,
        })
    }
}

/// Generate command implementation; returns the exit code
pub async fn generate_command(
    overrides: GenerateOverrides,
    report_format: OutputFormat,
    config_path: Option<PathBuf>,
) -> anyhow::Result<i32> {
    let no_catalog = overrides.no_catalog;
    let mut settings = overrides.into_settings()?;
    settings.merge_with(load_settings(config_path.as_deref())?);
    debug!("Effective settings: {:?}", settings);

    let bundle = match &settings.presets {
        Some(path) => PresetBundle::from_path(path)
            .with_context(|| format!("Failed to load preset bundle {}", path.display()))?,
        None => PresetBundle::builtin()?,
    };

    let mut generator = Generator::new(bundle).with_base_target(settings.base_target());
    if no_catalog {
        info!("Running without a rule catalog");
    } else {
        generator = generator.with_catalog(load_catalog(&settings).await?);
    }

    let output_dir = settings.output_dir();
    let store = FsArtifactStore::new(&output_dir, settings.format());

    let started = Instant::now();
    let report = generator
        .run(&store)
        .with_context(|| format!("Generation into {} failed", output_dir.display()))?;

    output::print_report(&report, &output_dir, started.elapsed(), report_format)?;
    Ok(if report.is_complete() { 0 } else { 1 })
}

async fn load_catalog(settings: &GeneratorSettings) -> anyhow::Result<RuleCatalog> {
    let adapter = BiomeAdapter::default().include_inspired(settings.include_inspired());
    let catalog = match settings.catalog_path() {
        Some(path) => adapter
            .load(path)
            .with_context(|| format!("Failed to load catalog snapshot {}", path.display()))?,
        None => adapter.fetch(settings.catalog_url()).await?,
    };
    info!("Catalog has {} entries", catalog.len());
    Ok(catalog)
}
