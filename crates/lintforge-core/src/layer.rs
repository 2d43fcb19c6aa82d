//! Configuration shapes
//!
//! Three shapes flow through the pipeline:
//! - [`ConfigLayer`]: one ordered block contributed by a preset or an override,
//!   still holding live [`ModuleHandle`]s for plugins and parsers.
//! - [`EffectiveConfig`]: what the cascade engine resolves for a single file.
//! - [`Configuration`]: the canonical, portable form written into artifacts.
//!   Deltas use the same shape.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Live reference to a loaded plugin or parser module
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModuleHandle {
    /// Package the module is loaded from (e.g. `eslint-plugin-react`)
    pub module: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ModuleHandle {
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            version: None,
        }
    }

    pub fn versioned(module: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            version: Some(version.into()),
        }
    }
}

impl fmt::Display for ModuleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.module, version),
            None => f.write_str(&self.module),
        }
    }
}

/// Language options: a live parser handle plus free-form options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LanguageOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parser: Option<ModuleHandle>,
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl LanguageOptions {
    pub fn is_empty(&self) -> bool {
        self.parser.is_none() && self.options.is_empty()
    }
}

/// One ordered configuration block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Glob patterns the layer is restricted to; empty means every file
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub files: Vec<String>,
    /// Glob patterns excluded from this layer
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ignores: Vec<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub plugins: IndexMap<String, ModuleHandle>,
    /// Rule settings in any accepted form (`"error"`, `2`, `["warn", {..}]`)
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub rules: Map<String, Value>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub settings: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language_options: Option<LanguageOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linter_options: Option<Map<String, Value>>,
}

impl ConfigLayer {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn files<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.files = patterns.into_iter().map(Into::into).collect();
        self
    }

    pub fn plugin(mut self, name: impl Into<String>, handle: ModuleHandle) -> Self {
        self.plugins.insert(name.into(), handle);
        self
    }

    pub fn rule(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.rules.insert(name.into(), value.into());
        self
    }

    pub fn setting(mut self, key: impl Into<String>, value: Value) -> Self {
        self.settings.insert(key.into(), value);
        self
    }

    pub fn language_options(mut self, options: LanguageOptions) -> Self {
        self.language_options = Some(options);
        self
    }

    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

/// Configuration resolved by the cascade engine for one file path
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectiveConfig {
    /// Plugin keys as `name:module@version`; includes the core `"@"` entry
    pub plugins: Vec<String>,
    /// Resolved language descriptor (e.g. `@/js`)
    pub language: Option<String>,
    pub language_options: LanguageOptions,
    pub linter_options: Map<String, Value>,
    pub settings: Map<String, Value>,
    /// Rules in engine form: `[level, ...options]`
    pub rules: Map<String, Value>,
}

/// Canonical, serializable configuration; also the shape of a delta
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Configuration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plugins: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_options: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linter_options: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Map<String, Value>>,
}

/// The map-valued fields of a [`Configuration`] that take part in diffing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Rules,
    Settings,
    LanguageOptions,
    LinterOptions,
    Plugins,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::Rules,
        Field::Settings,
        Field::LanguageOptions,
        Field::LinterOptions,
        Field::Plugins,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Rules => "rules",
            Field::Settings => "settings",
            Field::LanguageOptions => "languageOptions",
            Field::LinterOptions => "linterOptions",
            Field::Plugins => "plugins",
        }
    }
}

impl Configuration {
    pub fn get(&self, field: Field) -> Option<&Map<String, Value>> {
        match field {
            Field::Rules => self.rules.as_ref(),
            Field::Settings => self.settings.as_ref(),
            Field::LanguageOptions => self.language_options.as_ref(),
            Field::LinterOptions => self.linter_options.as_ref(),
            Field::Plugins => self.plugins.as_ref(),
        }
    }

    pub fn slot(&mut self, field: Field) -> &mut Option<Map<String, Value>> {
        match field {
            Field::Rules => &mut self.rules,
            Field::Settings => &mut self.settings,
            Field::LanguageOptions => &mut self.language_options,
            Field::LinterOptions => &mut self.linter_options,
            Field::Plugins => &mut self.plugins,
        }
    }

    /// True when no compared field is populated
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|field| self.get(*field).is_none())
    }

    /// Tag a delta with the files it applies to
    pub fn scoped(mut self, name: impl Into<String>, files: &[&str]) -> Self {
        self.name = Some(name.into());
        self.files = Some(files.iter().map(|f| f.to_string()).collect());
        self
    }
}

/// `Some(map)` when the map has entries, `None` otherwise
pub(crate) fn non_empty(map: Map<String, Value>) -> Option<Map<String, Value>> {
    if map.is_empty() { None } else { Some(map) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_layer_deserializes_camel_case() {
        let layer: ConfigLayer = serde_json::from_value(json!({
            "name": "react/recommended",
            "files": ["**/*.tsx"],
            "plugins": { "react": { "module": "eslint-plugin-react", "version": "7.37.2" } },
            "languageOptions": {
                "parser": { "module": "@typescript-eslint/parser" },
                "parserOptions": { "ecmaFeatures": { "jsx": true } }
            },
            "rules": { "react/jsx-key": 2 }
        }))
        .unwrap();

        assert_eq!(layer.label(), "react/recommended");
        assert_eq!(layer.files, vec!["**/*.tsx"]);
        assert_eq!(
            layer.plugins["react"],
            ModuleHandle::versioned("eslint-plugin-react", "7.37.2")
        );
        let language = layer.language_options.unwrap();
        assert_eq!(language.parser, Some(ModuleHandle::new("@typescript-eslint/parser")));
        assert!(language.options.contains_key("parserOptions"));
    }

    #[test]
    fn test_configuration_skips_empty_fields() {
        let config = Configuration::default();
        assert!(config.is_empty());
        assert_eq!(serde_json::to_value(&config).unwrap(), json!({}));
    }

    #[test]
    fn test_scoped_delta() {
        let mut delta = Configuration::default();
        *delta.slot(Field::Rules) = Some(Map::new());
        let delta = delta.scoped("effective/test", &["**/*.test.ts"]);
        assert!(!delta.is_empty());
        assert_eq!(delta.name.as_deref(), Some("effective/test"));
        assert_eq!(delta.files, Some(vec!["**/*.test.ts".to_string()]));
    }

    #[test]
    fn test_module_handle_display() {
        assert_eq!(
            ModuleHandle::versioned("eslint-plugin-n", "17.15.0").to_string(),
            "eslint-plugin-n@17.15.0"
        );
        assert_eq!(ModuleHandle::new("espree").to_string(), "espree");
    }
}
