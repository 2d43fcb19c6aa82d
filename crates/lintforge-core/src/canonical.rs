//! Canonicalizer
//!
//! Normalizes an [`EffectiveConfig`] into a portable [`Configuration`]:
//! severities become names, rules are sorted with [`rule_order`], live
//! plugin and parser handles become `[[[package]]]` placeholders and
//! rule namespaces that only arrive transitively are dropped.

use crate::cascade::CORE_PLUGIN;
use crate::layer::{Configuration, EffectiveConfig, LanguageOptions, non_empty};
use crate::rule::{RuleEntry, rule_order};
use serde_json::{Map, Value};

/// Rule namespaces never written to an artifact
pub const DENYLISTED_NAMESPACES: &[&str] = &[
    "@babel",
    "babel",
    "flowtype",
    "standard",
    "vue",
    "unicorn",
    "@stylistic",
    "react-native",
];

/// Serializable cross-reference to an installable package
pub fn placeholder(package: &str) -> String {
    format!("[[[{package}]]]")
}

/// Package a plugin is installed from
pub fn plugin_package(name: &str) -> String {
    if name.starts_with('@') {
        format!("{name}/eslint-plugin")
    } else {
        format!("eslint-plugin-{name}")
    }
}

pub fn is_denylisted(rule: &str) -> bool {
    DENYLISTED_NAMESPACES.iter().any(|namespace| {
        rule.strip_prefix(namespace)
            .is_some_and(|rest| rest.starts_with('/'))
    })
}

/// Normalize rule entries
///
/// Disabled rules are dropped, or kept as `"off"` when `invert` is set.
/// Active rules are kept in canonical form, or dropped when `invert` is set.
/// Running it on its own output changes nothing.
pub fn clean_rules(rules: &Map<String, Value>, invert: bool) -> Map<String, Value> {
    let mut names: Vec<&String> = rules.keys().filter(|name| !is_denylisted(name)).collect();
    names.sort_by(|a, b| rule_order(a, b));

    let mut cleaned = Map::new();
    for name in names {
        let entry = match RuleEntry::parse(name, &rules[name.as_str()]) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!("Skipping rule: {}", err);
                continue;
            }
        };

        match (entry.is_off(), invert) {
            (true, true) => {
                cleaned.insert(name.clone(), Value::from("off"));
            }
            (false, false) => {
                cleaned.insert(name.clone(), entry.to_canonical());
            }
            _ => {}
        }
    }
    cleaned
}

/// Map resolved plugin keys (`name` or `name:module@version`) onto placeholders
pub fn clean_plugins(keys: &[String]) -> Map<String, Value> {
    let mut plugins = Map::new();
    for key in keys {
        let name = key.split(':').next().unwrap_or(key);
        if name == CORE_PLUGIN {
            continue;
        }
        plugins.insert(
            name.to_string(),
            Value::from(placeholder(&plugin_package(name))),
        );
    }
    plugins
}

/// Portable language options: the parser handle becomes a placeholder
pub fn portable_language_options(options: &LanguageOptions) -> Map<String, Value> {
    let mut portable = Map::new();
    if let Some(parser) = &options.parser {
        portable.insert("parser".to_string(), Value::from(placeholder(&parser.module)));
    }
    for (key, value) in &options.options {
        portable.insert(key.clone(), value.clone());
    }
    portable
}

/// Everything but rules and plugins, without live handles or the language descriptor
pub fn strip_non_portable(config: &EffectiveConfig) -> Configuration {
    Configuration {
        language_options: non_empty(portable_language_options(&config.language_options)),
        linter_options: non_empty(config.linter_options.clone()),
        settings: non_empty(config.settings.clone()),
        ..Default::default()
    }
}

pub fn canonicalize(config: &EffectiveConfig, invert: bool) -> Configuration {
    let mut canonical = strip_non_portable(config);
    canonical.plugins = non_empty(clean_plugins(&config.plugins));
    canonical.rules = non_empty(clean_rules(&config.rules, invert));
    canonical
}
