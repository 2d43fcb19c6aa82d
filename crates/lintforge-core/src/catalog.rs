//! Biome rule catalog adapter
//!
//! Fetches Biome's rule metadata and flattens it into a map from Biome rule
//! name to the ESLint rule it replaces. The composer uses the result to turn
//! off rules that Biome already enforces.

use crate::error::ForgeError;
use crate::result::Result;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Published rule metadata endpoint
pub const DEFAULT_CATALOG_URL: &str = "https://biomejs.dev/metadata/rules.json";

/// Metadata fields that are not carried into a catalog entry
const DROPPED_FIELDS: [&str; 5] = ["name", "docs", "version", "link", "sources"];

/// Source kind marking rules only inspired by (not equivalent to) an ESLint rule
const INSPIRED: &str = "inspired";

/// Mapping from a Biome rule-source key to the ESLint plugin prefix of its rules
#[derive(Debug, Clone)]
pub struct RuleSourceMap {
    prefixes: IndexMap<&'static str, &'static str>,
}

impl RuleSourceMap {
    /// The rule sources whose plugins this tool knows how to address
    pub fn known() -> Self {
        Self::from_pairs([
            ("eslint", ""),
            ("eslintReact", "react/"),
            ("eslintReactHooks", "react-hooks/"),
            ("eslintJsxA11y", "jsx-a11y/"),
            ("eslintTypeScript", "@typescript-eslint/"),
            ("eslintUnicorn", "unicorn/"),
            ("eslintImport", "import/"),
            ("eslintN", "n/"),
            ("eslintUnusedImports", "unused-imports/"),
            ("eslintStylistic", "@stylistic/"),
            ("eslintSonarJs", "sonarjs/"),
            ("eslintBarrelFiles", "no-barrel-files/"),
            ("eslintJest", "jest/"),
        ])
    }

    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (&'static str, &'static str)>,
    {
        Self {
            prefixes: pairs.into_iter().collect(),
        }
    }

    pub fn prefix(&self, source: &str) -> Option<&'static str> {
        self.prefixes.get(source).copied()
    }

    pub fn len(&self) -> usize {
        self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prefixes.is_empty()
    }
}

/// Reduced metadata for one Biome rule that maps back onto an ESLint rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub category: String,
    /// Fully qualified ESLint rule name (e.g. `react/jsx-key`)
    pub original_rule: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_kind: Option<String>,
    /// Remaining metadata (`recommended`, `fixKind`, `deprecated`, ...)
    #[serde(flatten)]
    pub metadata: Map<String, Value>,
}

/// Flattened catalog keyed by Biome rule name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleCatalog {
    pub entries: IndexMap<String, CatalogEntry>,
}

impl RuleCatalog {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn insert(&mut self, rule: impl Into<String>, entry: CatalogEntry) {
        self.entries.insert(rule.into(), entry);
    }

    /// ESLint rules covered by the catalog, in catalog order, without duplicates
    pub fn original_rules(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.entries
            .values()
            .map(|entry| entry.original_rule.as_str())
            .filter(|rule| seen.insert(*rule))
            .collect()
    }
}

/// Adapter turning Biome's published metadata into a [`RuleCatalog`]
#[derive(Debug, Clone)]
pub struct BiomeAdapter {
    sources: RuleSourceMap,
    include_inspired: bool,
}

impl Default for BiomeAdapter {
    fn default() -> Self {
        Self::new(RuleSourceMap::known(), false)
    }
}

impl BiomeAdapter {
    pub fn new(sources: RuleSourceMap, include_inspired: bool) -> Self {
        Self {
            sources,
            include_inspired,
        }
    }

    pub fn include_inspired(mut self, include: bool) -> Self {
        self.include_inspired = include;
        self
    }

    /// Retrieve and flatten the catalog from `url`
    pub async fn fetch(&self, url: &str) -> Result<RuleCatalog> {
        let tree = fetch_catalog(url).await?;
        self.flatten(&tree)
    }

    /// Read and flatten a catalog snapshot stored on disk
    pub fn load(&self, path: &Path) -> Result<RuleCatalog> {
        let tree = load_catalog(path)?;
        self.flatten(&tree)
    }

    /// Flatten `lints.languages.<fileType>.<category>.<rule>` into catalog entries
    pub fn flatten(&self, tree: &Value) -> Result<RuleCatalog> {
        let languages = languages(tree)?;
        let mut catalog = RuleCatalog::default();
        let mut skipped = 0usize;

        for (file_type, categories) in languages {
            let Some(categories) = categories.as_object() else {
                tracing::warn!("Skipping malformed file type '{}'", file_type);
                continue;
            };

            for (category, rules) in categories {
                let Some(rules) = rules.as_object() else {
                    continue;
                };

                for (rule_name, meta) in rules {
                    match self.reduce(category, meta) {
                        Some(entry) => catalog.insert(rule_name.clone(), entry),
                        None => skipped += 1,
                    }
                }
            }
        }

        tracing::debug!(
            "Flattened catalog: {} entries kept, {} skipped",
            catalog.len(),
            skipped
        );
        Ok(catalog)
    }

    fn reduce(&self, category: &str, meta: &Value) -> Option<CatalogEntry> {
        let meta = meta.as_object()?;

        let source_kind = meta
            .get("sourceKind")
            .and_then(Value::as_str)
            .map(str::to_string);
        if !self.include_inspired && source_kind.as_deref() == Some(INSPIRED) {
            return None;
        }

        let mut original_rule = None;
        if let Some(sources) = meta.get("sources").and_then(Value::as_array) {
            for source in sources.iter().filter_map(Value::as_object) {
                for (source_name, native) in source {
                    let (Some(prefix), Some(native)) =
                        (self.sources.prefix(source_name), native.as_str())
                    else {
                        continue;
                    };
                    original_rule = Some(format!("{prefix}{native}"));
                }
            }
        }

        let metadata = meta
            .iter()
            .filter(|(key, _)| {
                !DROPPED_FIELDS.contains(&key.as_str()) && key.as_str() != "sourceKind"
            })
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Some(CatalogEntry {
            category: category.to_string(),
            original_rule: original_rule?,
            source_kind,
            metadata,
        })
    }
}

fn languages(tree: &Value) -> Result<&Map<String, Value>> {
    tree.get("lints")
        .and_then(|lints| lints.get("languages"))
        .and_then(Value::as_object)
        .ok_or_else(|| ForgeError::format_error("Invalid metadata: missing 'lints.languages'"))
}

/// Retrieve the raw catalog tree from `url`
pub async fn fetch_catalog(url: &str) -> Result<Value> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| ForgeError::fetch_error(url, format!("Failed to build HTTP client: {e}")))?;

    tracing::info!("Fetching rule catalog from {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| ForgeError::fetch_error(url, format!("HTTP error: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(ForgeError::fetch_error(url, format!("HTTP status {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ForgeError::fetch_error(url, format!("Failed to read response: {e}")))?;

    parse_catalog(&body)
}

/// Read a raw catalog tree from a snapshot file
pub fn load_catalog(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| ForgeError::io_error(path, e))?;
    parse_catalog(&content)
}

/// Parse a raw catalog body and check its top-level shape
pub fn parse_catalog(body: &str) -> Result<Value> {
    let tree: Value = serde_json::from_str(body)
        .map_err(|e| ForgeError::format_error(format!("Catalog is not valid JSON: {e}")))?;
    languages(&tree)?;
    Ok(tree)
}

/// Write a raw catalog tree so later runs can work offline
pub fn save_catalog(tree: &Value, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| ForgeError::io_error(parent, e))?;
    }
    let content = serde_json::to_string_pretty(tree)?;
    fs::write(path, content).map_err(|e| ForgeError::io_error(path, e))
}
