//! Generation pipeline
//!
//! For one flag vector: compose, resolve against the base target,
//! canonicalize, then add one delta per active file variant. [`Generator::run`]
//! does this for every vector and writes one artifact each.

use crate::canonical::canonicalize;
use crate::cascade::{CascadeEngine, FlatCascade};
use crate::catalog::RuleCatalog;
use crate::composer::{self, ComposeContext, E2E_FILES, JS_FILES, STORY_FILES, TEST_FILES};
use crate::diff::diff;
use crate::emit::{ArtifactStore, serialize};
use crate::flags::{FLAGS, Options, enumerate, to_identifier, verify_addressing};
use crate::layer::Configuration;
use crate::presets::PresetBundle;
use crate::result::Result;
use rayon::prelude::*;
use std::sync::Arc;
use std::time::Instant;

/// File resolved for the base configuration
pub const DEFAULT_BASE_TARGET: &str = "index.tsx";

/// A file type that gets its own delta on top of the base configuration
#[derive(Debug, Clone, Copy)]
pub struct FileVariant {
    /// Delta name (e.g. `effective/test`)
    pub name: &'static str,
    /// Representative file resolved for this variant
    pub target: &'static str,
    pub files: &'static [&'static str],
    active: fn(&Options) -> bool,
}

impl FileVariant {
    pub fn is_active(&self, options: &Options) -> bool {
        (self.active)(options)
    }
}

fn always(_: &Options) -> bool {
    true
}

fn testing(options: &Options) -> bool {
    options.testing
}

fn stories(options: &Options) -> bool {
    options.testing && options.react
}

pub const FILE_VARIANTS: &[FileVariant] = &[
    FileVariant {
        name: "effective/js",
        target: "index.js",
        files: JS_FILES,
        active: always,
    },
    FileVariant {
        name: "effective/test",
        target: "index.test.tsx",
        files: TEST_FILES,
        active: testing,
    },
    FileVariant {
        name: "effective/story",
        target: "index.stories.tsx",
        files: STORY_FILES,
        active: stories,
    },
    FileVariant {
        name: "effective/e2e",
        target: "index.spec.ts",
        files: E2E_FILES,
        active: testing,
    },
];

/// One artifact written by [`Generator::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSummary {
    pub vector: u32,
    pub identifier: String,
    /// Base configuration plus deltas
    pub configurations: usize,
}

/// A flag vector whose artifact could not be built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutationFailure {
    pub vector: u32,
    pub identifier: String,
    pub message: String,
}

#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    pub artifacts: Vec<ArtifactSummary>,
    pub failures: Vec<PermutationFailure>,
}

impl GenerationReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Builds artifacts for flag vectors
pub struct Generator {
    bundle: PresetBundle,
    catalog: Option<RuleCatalog>,
    engine: Arc<dyn CascadeEngine>,
    base_target: String,
}

impl Generator {
    pub fn new(bundle: PresetBundle) -> Self {
        Self {
            bundle,
            catalog: None,
            engine: Arc::new(FlatCascade::new()),
            base_target: DEFAULT_BASE_TARGET.to_string(),
        }
    }

    pub fn with_catalog(mut self, catalog: RuleCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn with_engine(mut self, engine: Arc<dyn CascadeEngine>) -> Self {
        self.engine = engine;
        self
    }

    pub fn with_base_target(mut self, target: impl Into<String>) -> Self {
        self.base_target = target.into();
        self
    }

    pub fn base_target(&self) -> &str {
        &self.base_target
    }

    fn context(&self) -> ComposeContext<'_> {
        ComposeContext {
            bundle: &self.bundle,
            catalog: self.catalog.as_ref(),
        }
    }

    /// Base configuration followed by the non-empty file variant deltas
    pub fn build(&self, options: &Options) -> Result<Vec<Configuration>> {
        let layers = composer::compose(options, &self.context())?;
        let engine = self.engine.as_ref();

        let effective = composer::resolve(engine, &layers, &self.base_target)?;
        let base = canonicalize(&effective, options.disabled);

        let mut configs = vec![base];
        for variant in FILE_VARIANTS.iter().filter(|v| v.is_active(options)) {
            let effective = composer::resolve(engine, &layers, variant.target)?;
            let specialized = canonicalize(&effective, options.disabled);
            let delta = diff(&configs[0], &specialized);
            if delta.is_empty() {
                tracing::debug!("No differences for {}", variant.name);
                continue;
            }
            configs.push(delta.scoped(variant.name, variant.files));
        }
        Ok(configs)
    }

    /// Generate and store the artifact of every flag vector
    ///
    /// A permutation that cannot be composed is reported and skipped; errors
    /// that make the whole run meaningless (addressing, storage) abort it.
    pub fn run(&self, store: &dyn ArtifactStore) -> Result<GenerationReport> {
        verify_addressing(&FLAGS)?;
        let started = Instant::now();
        let format = store.format();
        let permutations: Vec<(u32, Options)> = enumerate(&FLAGS).collect();
        tracing::info!("Generating {} {} artifacts", permutations.len(), format);

        let outcomes: Vec<(u32, String, Result<usize>)> = permutations
            .into_par_iter()
            .map(|(vector, options)| {
                let identifier = to_identifier(vector);
                let outcome = self.build(&options).and_then(|configs| {
                    let content = serialize(&configs, format)?;
                    store.put(&identifier, &content)?;
                    Ok(configs.len())
                });
                (vector, identifier, outcome)
            })
            .collect();

        let mut report = GenerationReport::default();
        for (vector, identifier, outcome) in outcomes {
            match outcome {
                Ok(configurations) => {
                    tracing::debug!(
                        "{} <- vector {} ({} configs)",
                        identifier,
                        vector,
                        configurations
                    );
                    report.artifacts.push(ArtifactSummary {
                        vector,
                        identifier,
                        configurations,
                    });
                }
                Err(err) if err.is_fatal_to_run() => return Err(err),
                Err(err) => {
                    tracing::warn!("Skipping vector {} ({}): {}", vector, identifier, err);
                    report.failures.push(PermutationFailure {
                        vector,
                        identifier,
                        message: err.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Wrote {} artifacts ({} skipped) in {:.2?}",
            report.artifacts.len(),
            report.failures.len(),
            started.elapsed()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::{ArtifactFormat, MemoryArtifactStore};
    use crate::flags::Flag;

    fn generator() -> Generator {
        Generator::new(PresetBundle::builtin().unwrap())
    }

    #[test]
    fn test_variants_follow_flags() {
        let active = |options: Options| -> Vec<&str> {
            FILE_VARIANTS
                .iter()
                .filter(|v| v.is_active(&options))
                .map(|v| v.name)
                .collect()
        };
        assert_eq!(active(Options::default()), vec!["effective/js"]);
        assert_eq!(
            active(Options::default().with(Flag::Testing)),
            vec!["effective/js", "effective/test", "effective/e2e"]
        );
        assert_eq!(
            active(Options::default().with(Flag::Testing).with(Flag::React)).len(),
            4
        );
    }

    #[test]
    fn test_build_default_has_js_delta() {
        let configs = generator().build(&Options::default()).unwrap();
        assert_eq!(configs.len(), 2);

        let js = &configs[1];
        assert_eq!(js.name.as_deref(), Some("effective/js"));
        assert_eq!(js.files.clone().unwrap(), JS_FILES);
        assert_eq!(js.rules.as_ref().unwrap()["@typescript-eslint/await-thenable"], "off");
    }

    #[test]
    fn test_build_testing_adds_test_deltas() {
        let options = Options::default().with(Flag::Testing);
        let configs = generator().build(&options).unwrap();
        let names: Vec<_> = configs.iter().skip(1).filter_map(|c| c.name.as_deref()).collect();
        assert_eq!(names, vec!["effective/js", "effective/test", "effective/e2e"]);

        let test = &configs[2];
        assert!(test.plugins.as_ref().unwrap().contains_key("jest"));
        assert_eq!(
            test.settings.as_ref().unwrap()["jest"]["globalPackage"],
            "vitest"
        );
    }

    #[test]
    fn test_run_writes_every_vector() {
        let store = MemoryArtifactStore::new(ArtifactFormat::Json);
        let report = generator().run(&store).unwrap();

        assert_eq!(report.artifacts.len() + report.failures.len(), 256);
        // biome permutations need a catalog
        assert_eq!(report.failures.len(), 128);
        assert!(report.failures.iter().all(|f| f.message.contains("missing catalog")));
        assert_eq!(store.len(), 128);
        assert!(!report.is_complete());
    }
}
