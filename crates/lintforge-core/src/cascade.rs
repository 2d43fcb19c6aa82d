//! Host-engine cascade
//!
//! The linter resolves an ordered list of layers into the configuration that
//! applies to one file. [`CascadeEngine`] is the seam the composer talks to;
//! [`FlatCascade`] reproduces the flat-config merge rules so generation
//! runs without the engine itself.

use crate::error::ForgeError;
use crate::layer::{ConfigLayer, EffectiveConfig, LanguageOptions, ModuleHandle};
use crate::result::Result;
use crate::rule::RuleEntry;
use glob::{MatchOptions, Pattern};
use indexmap::IndexMap;
use serde_json::{Map, Value, json};

/// Key of the engine's built-in plugin
pub const CORE_PLUGIN: &str = "@";

/// Language descriptor the engine resolves for JavaScript-family files
pub const DEFAULT_LANGUAGE: &str = "@/js";

/// Resolves ordered layers into the configuration for a single file
pub trait CascadeEngine: Send + Sync {
    fn calculate_for_file(&self, layers: &[ConfigLayer], file: &str) -> Result<EffectiveConfig>;
}

/// Flat-config cascade over engine defaults
#[derive(Debug, Clone)]
pub struct FlatCascade {
    default_parser: ModuleHandle,
}

impl Default for FlatCascade {
    fn default() -> Self {
        Self {
            default_parser: ModuleHandle::versioned("espree", "10.3.0"),
        }
    }
}

impl FlatCascade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_parser(mut self, parser: ModuleHandle) -> Self {
        self.default_parser = parser;
        self
    }

    /// Whether a layer takes part in the cascade for `file`
    pub fn applies_to(layer: &ConfigLayer, file: &str) -> Result<bool> {
        let included = layer.files.is_empty() || any_match(&layer.files, file)?;
        Ok(included && !any_match(&layer.ignores, file)?)
    }

    fn defaults(&self) -> Resolution {
        let mut language_options = LanguageOptions {
            parser: Some(self.default_parser.clone()),
            options: Map::new(),
        };
        language_options
            .options
            .insert("ecmaVersion".to_string(), json!("latest"));
        language_options
            .options
            .insert("sourceType".to_string(), json!("module"));
        language_options
            .options
            .insert("parserOptions".to_string(), json!({}));

        let mut linter_options = Map::new();
        linter_options.insert("reportUnusedDisableDirectives".to_string(), json!(1));

        Resolution {
            plugins: IndexMap::new(),
            language_options,
            linter_options,
            settings: Map::new(),
            rules: IndexMap::new(),
        }
    }
}

impl CascadeEngine for FlatCascade {
    fn calculate_for_file(&self, layers: &[ConfigLayer], file: &str) -> Result<EffectiveConfig> {
        let mut resolution = self.defaults();
        let mut applied = 0usize;

        for layer in layers {
            if !Self::applies_to(layer, file)? {
                continue;
            }
            tracing::debug!("Applying layer '{}' to {}", layer.label(), file);
            resolution.apply(layer)?;
            applied += 1;
        }

        tracing::debug!(
            "Resolved {} of {} layers for {} ({} rules)",
            applied,
            layers.len(),
            file,
            resolution.rules.len()
        );
        Ok(resolution.finish())
    }
}

struct Resolution {
    plugins: IndexMap<String, ModuleHandle>,
    language_options: LanguageOptions,
    linter_options: Map<String, Value>,
    settings: Map<String, Value>,
    rules: IndexMap<String, RuleEntry>,
}

impl Resolution {
    fn apply(&mut self, layer: &ConfigLayer) -> Result<()> {
        for (name, handle) in &layer.plugins {
            match self.plugins.get(name) {
                Some(existing) if existing.module != handle.module => {
                    return Err(ForgeError::config_error(format!(
                        "Cannot redefine plugin '{}' in layer '{}': {} is already registered as {}",
                        name,
                        layer.label(),
                        handle,
                        existing
                    )));
                }
                Some(_) => {}
                None => {
                    self.plugins.insert(name.clone(), handle.clone());
                }
            }
        }

        if let Some(options) = &layer.language_options {
            if let Some(parser) = &options.parser {
                self.language_options.parser = Some(parser.clone());
            }
            deep_merge(&mut self.language_options.options, &options.options);
        }

        if let Some(options) = &layer.linter_options {
            for (key, value) in options {
                self.linter_options.insert(key.clone(), value.clone());
            }
        }

        deep_merge(&mut self.settings, &layer.settings);

        for (name, value) in &layer.rules {
            let mut entry = RuleEntry::parse(name, value)?;
            if entry.options.is_empty() {
                if let Some(previous) = self.rules.get(name) {
                    entry.options = previous.options.clone();
                }
            }
            self.rules.insert(name.clone(), entry);
        }

        Ok(())
    }

    fn finish(self) -> EffectiveConfig {
        let mut plugins = vec![CORE_PLUGIN.to_string()];
        plugins.extend(
            self.plugins
                .iter()
                .map(|(name, handle)| format!("{name}:{handle}")),
        );

        let rules = self
            .rules
            .into_iter()
            .map(|(name, entry)| (name, entry.to_raw()))
            .collect();

        EffectiveConfig {
            plugins,
            language: Some(DEFAULT_LANGUAGE.to_string()),
            language_options: self.language_options,
            linter_options: self.linter_options,
            settings: self.settings,
            rules,
        }
    }
}

fn any_match(patterns: &[String], file: &str) -> Result<bool> {
    let options = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    for pattern in patterns {
        let compiled = Pattern::new(pattern).map_err(|e| {
            ForgeError::config_error(format!("Invalid glob pattern '{pattern}': {e}"))
        })?;
        if compiled.matches_with(file, options) {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Merge `overlay` into `target`; nested objects merge, everything else is replaced
fn deep_merge(target: &mut Map<String, Value>, overlay: &Map<String, Value>) {
    for (key, value) in overlay {
        match (target.get_mut(key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                deep_merge(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}
