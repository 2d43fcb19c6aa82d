//! Settings types

use crate::catalog::DEFAULT_CATALOG_URL;
use crate::emit::ArtifactFormat;
use crate::generate::DEFAULT_BASE_TARGET;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Artifact directory used when none is configured
pub const DEFAULT_OUTPUT_DIR: &str = "dist/configs";

/// Project-level generator settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GeneratorSettings {
    /// JSON Schema reference for editor support
    #[serde(rename = "$schema", default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Directory the artifacts are written to
    #[schemars(description = "Directory artifacts are written to (default: dist/configs)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    #[schemars(description = "Artifact format: esm or json (default: esm)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ArtifactFormat>,

    /// File the base configuration is resolved for
    #[schemars(description = "File the base configuration is resolved for (default: index.tsx)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_target: Option<String>,

    /// External preset bundle replacing the built-in snapshot
    #[schemars(description = "Path to an external preset bundle")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub presets: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<CatalogSettings>,
}

/// Where the Biome rule catalog comes from
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSettings {
    #[schemars(description = "Catalog endpoint")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Frozen snapshot used instead of fetching
    #[schemars(description = "Catalog snapshot on disk; takes precedence over url")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[schemars(description = "Also suppress rules Biome is only inspired by")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_inspired: Option<bool>,
}

impl GeneratorSettings {
    /// Settings written by `config init`: every default spelled out
    pub fn with_defaults() -> Self {
        Self {
            schema: None,
            output_dir: Some(PathBuf::from(DEFAULT_OUTPUT_DIR)),
            format: Some(ArtifactFormat::default()),
            base_target: Some(DEFAULT_BASE_TARGET.to_string()),
            presets: None,
            catalog: Some(CatalogSettings {
                url: Some(DEFAULT_CATALOG_URL.to_string()),
                path: None,
                include_inspired: Some(false),
            }),
        }
    }

    /// JSON Schema of the settings file
    pub fn json_schema() -> serde_json::Value {
        serde_json::to_value(schemars::schema_for!(GeneratorSettings)).unwrap_or_default()
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    pub fn format(&self) -> ArtifactFormat {
        self.format.unwrap_or_default()
    }

    pub fn base_target(&self) -> &str {
        self.base_target.as_deref().unwrap_or(DEFAULT_BASE_TARGET)
    }

    pub fn catalog_url(&self) -> &str {
        self.catalog
            .as_ref()
            .and_then(|c| c.url.as_deref())
            .unwrap_or(DEFAULT_CATALOG_URL)
    }

    pub fn catalog_path(&self) -> Option<&Path> {
        self.catalog.as_ref().and_then(|c| c.path.as_deref())
    }

    pub fn include_inspired(&self) -> bool {
        self.catalog
            .as_ref()
            .and_then(|c| c.include_inspired)
            .unwrap_or(false)
    }

    /// Merge another settings layer into this one (current takes precedence)
    pub fn merge_with(&mut self, other: GeneratorSettings) {
        if self.output_dir.is_none() {
            self.output_dir = other.output_dir;
        }
        if self.format.is_none() {
            self.format = other.format;
        }
        if self.base_target.is_none() {
            self.base_target = other.base_target;
        }
        if self.presets.is_none() {
            self.presets = other.presets;
        }

        if let Some(other_catalog) = other.catalog {
            if let Some(ref mut catalog) = self.catalog {
                catalog.merge_with(other_catalog);
            } else {
                self.catalog = Some(other_catalog);
            }
        }
    }

    /// Make relative paths relative to `base` (the settings file's directory)
    pub fn resolve_paths(&mut self, base: &Path) {
        let rebase = |path: &mut Option<PathBuf>| {
            if let Some(p) = path {
                if p.is_relative() {
                    *p = base.join(&*p);
                }
            }
        };
        rebase(&mut self.output_dir);
        rebase(&mut self.presets);
        if let Some(catalog) = self.catalog.as_mut() {
            rebase(&mut catalog.path);
        }
    }
}

impl CatalogSettings {
    pub fn merge_with(&mut self, other: CatalogSettings) {
        if self.url.is_none() {
            self.url = other.url;
        }
        if self.path.is_none() {
            self.path = other.path;
        }
        if self.include_inspired.is_none() {
            self.include_inspired = other.include_inspired;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = GeneratorSettings::default();
        assert_eq!(settings.output_dir(), PathBuf::from("dist/configs"));
        assert_eq!(settings.format(), ArtifactFormat::Esm);
        assert_eq!(settings.base_target(), "index.tsx");
        assert_eq!(settings.catalog_url(), DEFAULT_CATALOG_URL);
        assert!(!settings.include_inspired());
        assert!(settings.catalog_path().is_none());
    }

    #[test]
    fn test_merge_current_takes_precedence() {
        let mut cli = GeneratorSettings {
            format: Some(ArtifactFormat::Json),
            catalog: Some(CatalogSettings {
                include_inspired: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        };
        let file = GeneratorSettings {
            format: Some(ArtifactFormat::Esm),
            output_dir: Some(PathBuf::from("out")),
            catalog: Some(CatalogSettings {
                url: Some("http://localhost/rules.json".to_string()),
                include_inspired: Some(false),
                ..Default::default()
            }),
            ..Default::default()
        };

        cli.merge_with(file);
        assert_eq!(cli.format(), ArtifactFormat::Json);
        assert_eq!(cli.output_dir(), PathBuf::from("out"));
        assert_eq!(cli.catalog_url(), "http://localhost/rules.json");
        assert!(cli.include_inspired());
    }

    #[test]
    fn test_resolve_paths_keeps_absolute() {
        let mut settings = GeneratorSettings {
            output_dir: Some(PathBuf::from("configs")),
            presets: Some(PathBuf::from("/opt/presets.json")),
            ..Default::default()
        };
        settings.resolve_paths(Path::new("/project"));
        assert_eq!(settings.output_dir(), PathBuf::from("/project/configs"));
        assert_eq!(settings.presets, Some(PathBuf::from("/opt/presets.json")));
    }

    #[test]
    fn test_camel_case_round_trip() {
        let json = serde_json::to_value(GeneratorSettings::with_defaults()).unwrap();
        assert_eq!(json["outputDir"], "dist/configs");
        assert_eq!(json["baseTarget"], "index.tsx");
        assert_eq!(json["catalog"]["includeInspired"], false);
        let back: GeneratorSettings = serde_json::from_value(json).unwrap();
        assert_eq!(back, GeneratorSettings::with_defaults());
    }

    #[test]
    fn test_schema_generation() {
        let json = GeneratorSettings::json_schema();
        assert!(json["properties"]["outputDir"].is_object());
        assert!(json["properties"]["catalog"].is_object());
    }
}
