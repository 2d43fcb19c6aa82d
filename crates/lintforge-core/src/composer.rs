//! Layered config composer
//!
//! Turns [`Options`] into the ordered list of layers handed to the cascade.
//! Position is the only dependency between layers: every later block may
//! relax or tighten what an earlier one set.

use crate::cascade::CascadeEngine;
use crate::catalog::RuleCatalog;
use crate::error::ForgeError;
use crate::flags::Options;
use crate::layer::{ConfigLayer, EffectiveConfig, LanguageOptions};
use crate::presets::{PresetBundle, PresetId};
use crate::result::Result;
use serde_json::{Map, json};

/// Plain JavaScript sources; type-aware rules are disabled for them
pub const JS_FILES: &[&str] = &["**/*.js", "**/*.mjs", "**/*.cjs"];

/// Unit test sources
pub const TEST_FILES: &[&str] = &["**/*.test.ts", "**/*.test.tsx"];

/// Storybook stories
pub const STORY_FILES: &[&str] = &["**/*.stories.ts", "**/*.stories.tsx"];

/// Playwright end-to-end sources
pub const E2E_FILES: &[&str] = &["**/*.spec.ts", "**/*.spec.tsx", "**/e2e/**/*.ts"];

/// Inputs shared by every composition in a run
#[derive(Debug, Clone, Copy)]
pub struct ComposeContext<'a> {
    pub bundle: &'a PresetBundle,
    pub catalog: Option<&'a RuleCatalog>,
}

impl<'a> ComposeContext<'a> {
    pub fn new(bundle: &'a PresetBundle) -> Self {
        Self {
            bundle,
            catalog: None,
        }
    }

    pub fn with_catalog(mut self, catalog: &'a RuleCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }
}

/// Build the ordered layer list for `options`
pub fn compose(options: &Options, ctx: &ComposeContext<'_>) -> Result<Vec<ConfigLayer>> {
    let bundle = ctx.bundle;
    let mut layers: Vec<ConfigLayer> = Vec::new();

    extend(&mut layers, bundle, PresetId::EslintRecommended)?;
    extend(
        &mut layers,
        bundle,
        if options.strict {
            PresetId::TsStrictTypeChecked
        } else {
            PresetId::TsRecommendedTypeChecked
        },
    )?;

    if options.style {
        extend(&mut layers, bundle, PresetId::TsStylisticTypeChecked)?;
        layers.push(
            ConfigLayer::named("lintforge/import-sort")
                .plugin("simple-import-sort", bundle.plugin("simple-import-sort")?)
                .rule("simple-import-sort/imports", "error")
                .rule("simple-import-sort/exports", "error"),
        );
    }

    if options.react {
        extend(&mut layers, bundle, PresetId::ReactRecommended)?;

        let mut hooks = ConfigLayer::named("lintforge/react")
            .plugin("react-hooks", bundle.plugin("react-hooks")?)
            .plugin("react-compiler", bundle.plugin("react-compiler")?)
            .setting("react", json!({ "version": "detect" }));
        for layer in bundle.preset(PresetId::ReactJsxRuntime)? {
            for (rule, value) in &layer.rules {
                hooks.rules.insert(rule.clone(), value.clone());
            }
        }
        layers.push(
            hooks
                .rule("react-hooks/rules-of-hooks", "error")
                .rule("react-hooks/exhaustive-deps", "error")
                .rule("react-compiler/react-compiler", "error"),
        );

        extend(&mut layers, bundle, PresetId::JsxA11yRecommended)?;
    }

    extend(&mut layers, bundle, PresetId::JsdocRecommendedTypescriptError)?;
    layers.push(
        ConfigLayer::named("lintforge/jsdoc")
            .rule("jsdoc/require-jsdoc", "off")
            .rule("jsdoc/require-param", "off")
            .rule("jsdoc/require-property", "off")
            .rule("jsdoc/require-returns", "off")
            .rule("jsdoc/require-yields", "off"),
    );

    extend(&mut layers, bundle, PresetId::RegexpRecommended)?;

    if options.node {
        extend(&mut layers, bundle, PresetId::NodeRecommendedModule)?;
    }

    if options.fast {
        extend(&mut layers, bundle, PresetId::TsDisableTypeChecked)?;
    }

    layers.push(parser_options(options));

    if options.testing {
        extend_scoped(&mut layers, bundle, PresetId::JestRecommended, TEST_FILES)?;
        layers.push(
            ConfigLayer::named("lintforge/vitest")
                .files(TEST_FILES.iter().copied())
                .setting("jest", json!({ "globalPackage": "vitest" })),
        );
        if options.react {
            extend_scoped(&mut layers, bundle, PresetId::StorybookRecommended, STORY_FILES)?;
        }
        extend_scoped(&mut layers, bundle, PresetId::PlaywrightRecommended, E2E_FILES)?;
    }

    extend_scoped(&mut layers, bundle, PresetId::TsDisableTypeChecked, JS_FILES)?;

    extend(&mut layers, bundle, PresetId::Prettier)?;

    if options.biome {
        let catalog = ctx
            .catalog
            .ok_or_else(|| ForgeError::config_error("missing catalog"))?;
        layers.push(biome_suppression(catalog));
    }

    tracing::debug!(
        "Composed {} layers for [{}]",
        layers.len(),
        options.enabled().join(", ")
    );
    Ok(layers)
}

/// Resolve composed layers for one target file
pub fn resolve(
    engine: &dyn CascadeEngine,
    layers: &[ConfigLayer],
    target: &str,
) -> Result<EffectiveConfig> {
    engine.calculate_for_file(layers, target)
}

fn extend(layers: &mut Vec<ConfigLayer>, bundle: &PresetBundle, id: PresetId) -> Result<()> {
    layers.extend(bundle.preset(id)?.iter().cloned());
    Ok(())
}

/// Extend with a preset restricted to `files`; layers with their own `files` keep them
fn extend_scoped(
    layers: &mut Vec<ConfigLayer>,
    bundle: &PresetBundle,
    id: PresetId,
    files: &[&str],
) -> Result<()> {
    for layer in bundle.preset(id)? {
        let mut layer = layer.clone();
        if layer.files.is_empty() {
            layer.files = files.iter().map(|f| f.to_string()).collect();
        }
        layers.push(layer);
    }
    Ok(())
}

fn parser_options(options: &Options) -> ConfigLayer {
    let mut language = LanguageOptions::default();
    language.options.insert(
        "parserOptions".to_string(),
        json!({
            "ecmaVersion": "latest",
            "ecmaFeatures": { "jsx": options.react },
            "projectService": !options.fast,
        }),
    );
    ConfigLayer::named("lintforge/parser-options").language_options(language)
}

/// Turn off every ESLint rule Biome already covers
fn biome_suppression(catalog: &RuleCatalog) -> ConfigLayer {
    let mut layer = ConfigLayer::named("lintforge/biome");
    let mut rules = Map::new();
    for rule in catalog.original_rules() {
        rules.insert(rule.to_string(), json!("off"));
    }
    tracing::debug!("Suppressing {} rules covered by Biome", rules.len());
    layer.rules = rules;
    layer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cascade::FlatCascade;
    use crate::catalog::CatalogEntry;
    use serde_json::Value;

    fn catalog(pairs: &[(&str, &str)]) -> RuleCatalog {
        let mut catalog = RuleCatalog::default();
        for (name, original) in pairs {
            catalog.insert(
                *name,
                CatalogEntry {
                    category: "suspicious".to_string(),
                    original_rule: original.to_string(),
                    source_kind: None,
                    metadata: Map::new(),
                },
            );
        }
        catalog
    }

    fn names(layers: &[ConfigLayer]) -> Vec<&str> {
        layers.iter().map(ConfigLayer::label).collect()
    }

    fn rule(config: &EffectiveConfig, name: &str) -> Option<Value> {
        config.rules.get(name).cloned()
    }

    #[test]
    fn test_default_precedence() {
        let bundle = PresetBundle::builtin().unwrap();
        let layers = compose(&Options::default(), &ComposeContext::new(&bundle)).unwrap();
        let names = names(&layers);

        let position = |name: &str| names.iter().position(|n| *n == name).unwrap();
        assert_eq!(names[0], "eslint/recommended");
        assert!(position("typescript-eslint/recommended-type-checked") > 0);
        assert!(position("lintforge/jsdoc") > position("jsdoc/flat/recommended-typescript-error"));
        assert!(position("lintforge/parser-options") > position("regexp/flat/recommended"));
        assert_eq!(*names.last().unwrap(), "config-prettier");

        assert!(!names.contains(&"react/recommended"));
        assert!(!names.contains(&"typescript-eslint/strict-type-checked"));
        assert!(!names.contains(&"lintforge/import-sort"));
    }

    #[test]
    fn test_optional_blocks_follow_flags() {
        let bundle = PresetBundle::builtin().unwrap();
        let options = Options {
            react: true,
            style: true,
            node: true,
            testing: true,
            ..Default::default()
        };
        let layers = compose(&options, &ComposeContext::new(&bundle)).unwrap();
        let names = names(&layers);
        for expected in [
            "typescript-eslint/stylistic-type-checked",
            "lintforge/import-sort",
            "react/recommended",
            "lintforge/react",
            "jsx-a11y/recommended",
            "node/flat/recommended-module",
            "jest/flat/recommended",
            "storybook/recommended",
            "playwright/flat/recommended",
        ] {
            assert!(names.contains(&expected), "missing {expected}");
        }

        let jest = layers.iter().find(|l| l.label() == "jest/flat/recommended").unwrap();
        assert_eq!(jest.files, TEST_FILES);
    }

    #[test]
    fn test_react_block_folds_in_jsx_runtime() {
        let bundle = PresetBundle::builtin().unwrap();
        let options = Options::default().with(crate::flags::Flag::React);
        let config = resolve(
            &FlatCascade::new(),
            &compose(&options, &ComposeContext::new(&bundle)).unwrap(),
            "index.tsx",
        )
        .unwrap();

        assert_eq!(rule(&config, "react/react-in-jsx-scope"), Some(json!([0])));
        assert_eq!(rule(&config, "react-hooks/exhaustive-deps"), Some(json!([2])));
        assert_eq!(
            config.language_options.options["parserOptions"]["ecmaFeatures"]["jsx"],
            json!(true)
        );
    }

    #[test]
    fn test_strict_overrides_baseline() {
        let bundle = PresetBundle::builtin().unwrap();
        let ctx = ComposeContext::new(&bundle);
        let engine = FlatCascade::new();

        let base = resolve(&engine, &compose(&Options::default(), &ctx).unwrap(), "index.tsx")
            .unwrap();
        let strict = resolve(
            &engine,
            &compose(&Options::default().with(crate::flags::Flag::Strict), &ctx).unwrap(),
            "index.tsx",
        )
        .unwrap();

        assert_eq!(rule(&base, "@typescript-eslint/no-non-null-assertion"), None);
        assert_eq!(
            rule(&strict, "@typescript-eslint/no-non-null-assertion"),
            Some(json!([2]))
        );
        assert_eq!(
            rule(&strict, "@typescript-eslint/restrict-template-expressions")
                .and_then(|v| v.as_array().map(|a| a.len())),
            Some(2)
        );
        assert_eq!(rule(&strict, "no-unused-vars"), Some(json!([0])));
    }

    #[test]
    fn test_fast_disables_project_service() {
        let bundle = PresetBundle::builtin().unwrap();
        let options = Options::default().with(crate::flags::Flag::Fast);
        let config = resolve(
            &FlatCascade::new(),
            &compose(&options, &ComposeContext::new(&bundle)).unwrap(),
            "index.tsx",
        )
        .unwrap();

        assert_eq!(
            config.language_options.options["parserOptions"]["projectService"],
            json!(false)
        );
        assert_eq!(rule(&config, "@typescript-eslint/await-thenable"), Some(json!([0])));
    }

    #[test]
    fn test_js_files_drop_type_checked_rules() {
        let bundle = PresetBundle::builtin().unwrap();
        let layers = compose(&Options::default(), &ComposeContext::new(&bundle)).unwrap();
        let engine = FlatCascade::new();
        let ts = resolve(&engine, &layers, "index.tsx").unwrap();
        let js = resolve(&engine, &layers, "index.js").unwrap();

        assert_eq!(rule(&ts, "@typescript-eslint/await-thenable"), Some(json!([2])));
        assert_eq!(rule(&js, "@typescript-eslint/await-thenable"), Some(json!([0])));
        assert_eq!(
            js.language_options.options["parserOptions"]["projectService"],
            json!(false)
        );
    }

    #[test]
    fn test_spec_files_are_playwright_tests() {
        let bundle = PresetBundle::builtin().unwrap();
        let options = Options {
            strict: true,
            style: true,
            testing: true,
            ..Default::default()
        };
        let layers = compose(&options, &ComposeContext::new(&bundle)).unwrap();
        let engine = FlatCascade::new();
        let has_plugin = |config: &EffectiveConfig, name: &str| {
            config.plugins.iter().any(|p| p.starts_with(&format!("{name}:")))
        };

        let e2e = resolve(&engine, &layers, "AdminPanel.spec.ts").unwrap();
        assert!(has_plugin(&e2e, "playwright"));
        assert!(!has_plugin(&e2e, "jest"));
        assert!(rule(&e2e, "playwright/missing-playwright-await").is_some());

        let unit = resolve(&engine, &layers, "dateUtils.test.ts").unwrap();
        assert!(has_plugin(&unit, "jest"));
        assert!(!has_plugin(&unit, "playwright"));
    }

    #[test]
    fn test_biome_requires_catalog() {
        let bundle = PresetBundle::builtin().unwrap();
        let options = Options::default().with(crate::flags::Flag::Biome);
        let err = compose(&options, &ComposeContext::new(&bundle)).unwrap_err();
        assert_eq!(err.to_string(), "Configuration error: missing catalog");
    }

    #[test]
    fn test_biome_forces_catalog_rules_off() {
        let bundle = PresetBundle::builtin().unwrap();
        let catalog = catalog(&[("noDebugger", "no-debugger")]);
        let ctx = ComposeContext::new(&bundle).with_catalog(&catalog);
        let options = Options::default().with(crate::flags::Flag::Biome);

        let layers = compose(&options, &ctx).unwrap();
        let last = layers.last().unwrap();
        assert_eq!(last.label(), "lintforge/biome");
        assert_eq!(last.rules["no-debugger"], json!("off"));

        let config = resolve(&FlatCascade::new(), &layers, "index.tsx").unwrap();
        assert_eq!(rule(&config, "no-debugger"), Some(json!([0])));
    }

    #[test]
    fn test_compose_is_deterministic() {
        let bundle = PresetBundle::builtin().unwrap();
        let ctx = ComposeContext::new(&bundle);
        let options = Options {
            react: true,
            strict: true,
            ..Default::default()
        };
        assert_eq!(compose(&options, &ctx).unwrap(), compose(&options, &ctx).unwrap());
    }
}
