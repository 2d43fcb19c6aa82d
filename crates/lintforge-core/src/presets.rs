//! Upstream preset bundle
//!
//! Presets are opaque bags of layers. The built-in bundle is a frozen
//! snapshot embedded at compile time; an external bundle with the same shape
//! can be loaded from disk to track newer upstream releases.

use crate::error::ForgeError;
use crate::layer::{ConfigLayer, ModuleHandle};
use crate::result::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

const BUILTIN_BUNDLE: &str = include_str!("../data/presets.json");

/// Every upstream preset the composer pulls in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresetId {
    EslintRecommended,
    TsRecommendedTypeChecked,
    TsStrictTypeChecked,
    TsStylisticTypeChecked,
    TsDisableTypeChecked,
    ReactRecommended,
    ReactJsxRuntime,
    JsxA11yRecommended,
    JsdocRecommendedTypescriptError,
    RegexpRecommended,
    NodeRecommendedModule,
    JestRecommended,
    StorybookRecommended,
    PlaywrightRecommended,
    Prettier,
}

impl PresetId {
    pub const ALL: [PresetId; 15] = [
        PresetId::EslintRecommended,
        PresetId::TsRecommendedTypeChecked,
        PresetId::TsStrictTypeChecked,
        PresetId::TsStylisticTypeChecked,
        PresetId::TsDisableTypeChecked,
        PresetId::ReactRecommended,
        PresetId::ReactJsxRuntime,
        PresetId::JsxA11yRecommended,
        PresetId::JsdocRecommendedTypescriptError,
        PresetId::RegexpRecommended,
        PresetId::NodeRecommendedModule,
        PresetId::JestRecommended,
        PresetId::StorybookRecommended,
        PresetId::PlaywrightRecommended,
        PresetId::Prettier,
    ];

    /// Key of the preset inside a bundle file
    pub fn key(&self) -> &'static str {
        match self {
            PresetId::EslintRecommended => "eslint/recommended",
            PresetId::TsRecommendedTypeChecked => "typescript-eslint/recommended-type-checked",
            PresetId::TsStrictTypeChecked => "typescript-eslint/strict-type-checked",
            PresetId::TsStylisticTypeChecked => "typescript-eslint/stylistic-type-checked",
            PresetId::TsDisableTypeChecked => "typescript-eslint/disable-type-checked",
            PresetId::ReactRecommended => "react/recommended",
            PresetId::ReactJsxRuntime => "react/jsx-runtime",
            PresetId::JsxA11yRecommended => "jsx-a11y/recommended",
            PresetId::JsdocRecommendedTypescriptError => "jsdoc/recommended-typescript-error",
            PresetId::RegexpRecommended => "regexp/recommended",
            PresetId::NodeRecommendedModule => "n/recommended-module",
            PresetId::JestRecommended => "jest/recommended",
            PresetId::StorybookRecommended => "storybook/recommended",
            PresetId::PlaywrightRecommended => "playwright/recommended",
            PresetId::Prettier => "prettier",
        }
    }
}

impl fmt::Display for PresetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A set of named presets plus the plugin registry custom layers draw from
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PresetBundle {
    #[serde(default)]
    pub plugins: IndexMap<String, ModuleHandle>,
    #[serde(default)]
    pub presets: IndexMap<String, Vec<ConfigLayer>>,
}

impl PresetBundle {
    /// The snapshot shipped with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_BUNDLE)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let bundle: PresetBundle = serde_json::from_str(content)?;
        tracing::debug!(
            "Loaded preset bundle with {} presets and {} plugins",
            bundle.presets.len(),
            bundle.plugins.len()
        );
        Ok(bundle)
    }

    /// Load an external bundle file
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ForgeError::io_error(path, e))?;
        Self::from_json(&content)
    }

    /// Layers of a preset, in upstream order
    pub fn preset(&self, id: PresetId) -> Result<&[ConfigLayer]> {
        self.presets
            .get(id.key())
            .map(Vec::as_slice)
            .ok_or_else(|| ForgeError::config_error(format!("Unknown preset '{id}'")))
    }

    pub fn plugin(&self, name: &str) -> Result<ModuleHandle> {
        self.plugins
            .get(name)
            .cloned()
            .ok_or_else(|| ForgeError::config_error(format!("Unknown plugin '{name}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_bundle_has_every_preset() {
        let bundle = PresetBundle::builtin().unwrap();
        for id in PresetId::ALL {
            let layers = bundle.preset(id).unwrap();
            assert!(!layers.is_empty(), "preset {id} has no layers");
        }
    }

    #[test]
    fn test_builtin_bundle_registers_custom_plugins() {
        let bundle = PresetBundle::builtin().unwrap();
        for name in ["simple-import-sort", "react-hooks", "react-compiler"] {
            assert!(bundle.plugin(name).is_ok(), "missing plugin {name}");
        }
    }

    #[test]
    fn test_type_checked_presets_install_parser() {
        let bundle = PresetBundle::builtin().unwrap();
        let layers = bundle.preset(PresetId::TsStrictTypeChecked).unwrap();
        let parser = layers[0]
            .language_options
            .as_ref()
            .and_then(|options| options.parser.as_ref())
            .unwrap();
        assert_eq!(parser.module, "@typescript-eslint/parser");
    }

    #[test]
    fn test_missing_entries_are_config_errors() {
        let bundle = PresetBundle::default();
        let err = bundle.preset(PresetId::Prettier).unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Config);
        assert!(bundle.plugin("react").is_err());
    }

    #[test]
    fn test_from_path_reads_external_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("presets.json");
        std::fs::write(
            &path,
            r#"{"presets": {"prettier": [{"name": "custom", "rules": {"curly": 0}}]}}"#,
        )
        .unwrap();

        let bundle = PresetBundle::from_path(&path).unwrap();
        assert_eq!(bundle.preset(PresetId::Prettier).unwrap()[0].label(), "custom");
        assert!(PresetBundle::from_path(&dir.path().join("missing.json")).is_err());
    }
}
