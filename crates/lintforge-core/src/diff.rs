//! Structural differ
//!
//! Each compared field of a [`Configuration`] has its own strategy; there is
//! no generic deep diff. A delta describes what a specialized file type
//! needs on top of the base configuration:
//!
//! | field             | strategy        |
//! |-------------------|-----------------|
//! | `rules`           | keyed, removal recorded as `"off"`, or `null` for a rule the base had off |
//! | `settings`        | keyed, removal recorded as `null`  |
//! | `languageOptions` | wholesale       |
//! | `linterOptions`   | wholesale       |
//! | `plugins`         | additions only  |
//!
//! Plugins the specialized configuration drops cannot be expressed; applying
//! the delta keeps them.

use crate::layer::{Configuration, Field, non_empty};
use crate::rule::rule_order;
use serde_json::{Map, Value};

/// How a removed key is written into a keyed delta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// Rules: the key maps to `"off"`; a rule already off in the base maps to `null`
    Disable,
    /// Settings: the key maps to `null`
    Null,
}

/// Comparison strategy for one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldStrategy {
    /// Per-key comparison; differing keys take the other side's value
    Keyed { removal: Removal, sorted: bool },
    /// Whole-object comparison; a missing object equals `{}`
    Wholesale,
    /// Only keys absent from the base are reported
    AdditionsOnly,
}

impl FieldStrategy {
    pub fn for_field(field: Field) -> Self {
        match field {
            Field::Rules => FieldStrategy::Keyed {
                removal: Removal::Disable,
                sorted: true,
            },
            Field::Settings => FieldStrategy::Keyed {
                removal: Removal::Null,
                sorted: false,
            },
            Field::LanguageOptions | Field::LinterOptions => FieldStrategy::Wholesale,
            Field::Plugins => FieldStrategy::AdditionsOnly,
        }
    }

    /// Delta of one field; `None` when nothing differs
    pub fn diff(
        &self,
        base: Option<&Map<String, Value>>,
        other: Option<&Map<String, Value>>,
    ) -> Option<Map<String, Value>> {
        let empty = Map::new();
        let base = base.unwrap_or(&empty);
        let other = other.unwrap_or(&empty);

        match *self {
            FieldStrategy::Keyed { removal, sorted } => {
                let mut delta = Map::new();
                for (key, value) in other {
                    if base.get(key) != Some(value) {
                        delta.insert(key.clone(), value.clone());
                    }
                }
                for (key, value) in base {
                    if other.contains_key(key) {
                        continue;
                    }
                    let marker = match removal {
                        // Inverted lists hold only disabled rules; a dropped one is active again
                        Removal::Disable if is_off(value) => Value::Null,
                        Removal::Disable => Value::from("off"),
                        Removal::Null => Value::Null,
                    };
                    delta.insert(key.clone(), marker);
                }
                if sorted {
                    delta = sort_rules(delta);
                }
                non_empty(delta)
            }
            FieldStrategy::Wholesale => (base != other).then(|| other.clone()),
            FieldStrategy::AdditionsOnly => non_empty(
                other
                    .iter()
                    .filter(|(key, _)| !base.contains_key(*key))
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect(),
            ),
        }
    }

    /// Overlay one field of a delta onto the base value
    pub fn apply(
        &self,
        base: Option<&Map<String, Value>>,
        delta: Option<&Map<String, Value>>,
    ) -> Option<Map<String, Value>> {
        let Some(delta) = delta else {
            return base.cloned();
        };
        let mut merged = base.cloned().unwrap_or_default();

        match *self {
            FieldStrategy::Keyed { removal, sorted } => {
                for (key, value) in delta {
                    let removes = match removal {
                        Removal::Disable => {
                            value.is_null()
                                || (is_off(value) && merged.get(key).is_some_and(|v| !is_off(v)))
                        }
                        Removal::Null => value.is_null(),
                    };
                    if removes {
                        merged.remove(key);
                    } else {
                        merged.insert(key.clone(), value.clone());
                    }
                }
                if sorted {
                    merged = sort_rules(merged);
                }
                non_empty(merged)
            }
            FieldStrategy::Wholesale => non_empty(delta.clone()),
            FieldStrategy::AdditionsOnly => {
                for (key, value) in delta {
                    merged.entry(key.clone()).or_insert_with(|| value.clone());
                }
                non_empty(merged)
            }
        }
    }
}

/// Minimal delta turning `base` into `other`; empty when nothing differs
pub fn diff(base: &Configuration, other: &Configuration) -> Configuration {
    let mut delta = Configuration::default();
    for field in Field::ALL {
        let strategy = FieldStrategy::for_field(field);
        *delta.slot(field) = strategy.diff(base.get(field), other.get(field));
    }
    delta
}

/// Overlay `delta` onto `base`
pub fn apply_delta(base: &Configuration, delta: &Configuration) -> Configuration {
    let mut merged = Configuration {
        name: base.name.clone(),
        files: base.files.clone(),
        ..Default::default()
    };
    for field in Field::ALL {
        let strategy = FieldStrategy::for_field(field);
        *merged.slot(field) = strategy.apply(base.get(field), delta.get(field));
    }
    merged
}

fn is_off(value: &Value) -> bool {
    value.as_str() == Some("off")
}

fn sort_rules(rules: Map<String, Value>) -> Map<String, Value> {
    let mut entries: Vec<(String, Value)> = rules.into_iter().collect();
    entries.sort_by(|(a, _), (b, _)| rule_order(a, b));
    entries.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn config(value: Value) -> Configuration {
        serde_json::from_value(value).unwrap()
    }

    fn base() -> Configuration {
        config(json!({
            "plugins": {
                "@typescript-eslint": "[[[@typescript-eslint/eslint-plugin]]]",
                "jsdoc": "[[[eslint-plugin-jsdoc]]]"
            },
            "languageOptions": { "sourceType": "module", "parserOptions": { "projectService": true } },
            "linterOptions": { "reportUnusedDisableDirectives": 1 },
            "settings": { "react": { "version": "detect" } },
            "rules": {
                "curly": "warn",
                "no-debugger": "error",
                "@typescript-eslint/await-thenable": "error"
            }
        }))
    }

    fn specialized() -> Configuration {
        config(json!({
            "plugins": {
                "@typescript-eslint": "[[[@typescript-eslint/eslint-plugin]]]",
                "jsdoc": "[[[eslint-plugin-jsdoc]]]",
                "jest": "[[[eslint-plugin-jest]]]"
            },
            "languageOptions": { "sourceType": "module", "parserOptions": { "projectService": false } },
            "linterOptions": { "reportUnusedDisableDirectives": 1 },
            "settings": {
                "react": { "version": "detect" },
                "jest": { "globalPackage": "vitest" }
            },
            "rules": {
                "curly": "error",
                "no-debugger": "error",
                "jest/valid-title": "error"
            }
        }))
    }

    #[test]
    fn test_diff_of_identical_configs_is_empty() {
        assert!(diff(&base(), &base()).is_empty());
        assert!(diff(&Configuration::default(), &Configuration::default()).is_empty());
    }

    #[test]
    fn test_diff_per_field() {
        let delta = diff(&base(), &specialized());
        let value = serde_json::to_value(&delta).unwrap();

        assert_eq!(
            value["rules"],
            json!({
                "curly": "error",
                "@typescript-eslint/await-thenable": "off",
                "jest/valid-title": "error"
            })
        );
        assert_eq!(value["settings"], json!({ "jest": { "globalPackage": "vitest" } }));
        assert_eq!(value["plugins"], json!({ "jest": "[[[eslint-plugin-jest]]]" }));
        assert_eq!(
            value["languageOptions"],
            json!({ "sourceType": "module", "parserOptions": { "projectService": false } })
        );
        assert!(delta.linter_options.is_none());
    }

    #[test]
    fn test_delta_rules_are_sorted() {
        let delta = diff(&base(), &specialized());
        let names: Vec<&str> = delta.rules.as_ref().unwrap().keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["curly", "@typescript-eslint/await-thenable", "jest/valid-title"]
        );
    }

    #[test]
    fn test_apply_reproduces_specialized() {
        let (b, s) = (base(), specialized());
        assert_eq!(apply_delta(&b, &diff(&b, &s)), s);
    }

    #[test]
    fn test_removed_setting_round_trips_through_null() {
        let b = base();
        let mut s = base();
        s.settings = None;

        let delta = diff(&b, &s);
        assert_eq!(delta.settings.as_ref().unwrap()["react"], Value::Null);
        assert_eq!(apply_delta(&b, &delta), s);
    }

    #[test]
    fn test_wholesale_missing_equals_empty() {
        let mut b = base();
        b.linter_options = Some(Map::new());
        let mut s = base();
        s.linter_options = None;
        assert!(diff(&b, &s).is_empty());

        let delta = diff(&base(), &s);
        assert_eq!(delta.linter_options, Some(Map::new()));
        assert_eq!(apply_delta(&base(), &delta).linter_options, None);
    }

    #[test]
    fn test_inverted_rules_round_trip() {
        let b = config(json!({ "rules": { "a": "off", "b/x": "off" } }));
        let s = config(json!({ "rules": { "a": "off", "c/y": "off" } }));

        let delta = diff(&b, &s);
        assert_eq!(
            serde_json::to_value(&delta).unwrap(),
            json!({ "rules": { "b/x": null, "c/y": "off" } })
        );
        assert_eq!(apply_delta(&b, &delta), s);
    }

    #[test]
    fn test_re_enabled_rule_is_removed_on_apply() {
        // Core rules the TypeScript layer turns off come back for plain JS
        let b = config(json!({ "rules": { "constructor-super": "off", "no-debugger": "off" } }));
        let s = config(json!({ "rules": { "no-debugger": "off" } }));

        let delta = diff(&b, &s);
        assert_eq!(delta.rules.as_ref().unwrap()["constructor-super"], Value::Null);

        let text = serde_json::to_string(&delta).unwrap();
        let parsed: Configuration = serde_json::from_str(&text).unwrap();
        assert_eq!(apply_delta(&b, &parsed), s);

        let nothing_left = config(json!({ "rules": { "constructor-super": "off" } }));
        assert_eq!(apply_delta(&nothing_left, &delta).rules, None);
    }

    #[test]
    fn test_removed_plugins_are_not_restorable() {
        let b = base();
        let mut s = specialized();
        s.plugins.as_mut().unwrap().remove("jsdoc");

        let delta = diff(&b, &s);
        assert_eq!(
            delta.plugins,
            config(json!({ "plugins": { "jest": "[[[eslint-plugin-jest]]]" } })).plugins
        );

        let restored = apply_delta(&b, &delta);
        assert!(restored.plugins.as_ref().unwrap().contains_key("jsdoc"));
        assert_ne!(restored.plugins, s.plugins);
        assert_eq!(restored.rules, s.rules);
        assert_eq!(restored.settings, s.settings);
        assert_eq!(restored.language_options, s.language_options);
    }

    #[test]
    fn test_apply_keeps_base_identity() {
        let b = base().scoped("base", &["**/*.ts"]);
        let delta = diff(&b, &specialized()).scoped("effective/test", &["**/*.test.ts"]);
        let applied = apply_delta(&b, &delta);
        assert_eq!(applied.name.as_deref(), Some("base"));
        assert_eq!(applied.files, Some(vec!["**/*.ts".to_string()]));
    }
}
