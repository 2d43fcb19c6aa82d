//! lintforge core
//!
//! Generates ESLint flat configurations for every combination of a fixed
//! set of feature flags. Upstream presets are composed into ordered layers,
//! resolved for a target file, canonicalized into a portable form and
//! diffed per file type. Each flag combination ends up as one artifact
//! addressed by a short stable identifier, which a consumer loads back from
//! the same options.

pub mod canonical;
pub mod cascade;
pub mod catalog;
pub mod composer;
pub mod config;
pub mod diff;
pub mod emit;
pub mod error;
pub mod flags;
pub mod generate;
pub mod layer;
pub mod mutate;
pub mod presets;
pub mod result;
pub mod rule;

// Re-export commonly used types
pub use canonical::{canonicalize, clean_plugins, clean_rules, strip_non_portable};
pub use cascade::{CascadeEngine, FlatCascade};
pub use catalog::{BiomeAdapter, CatalogEntry, DEFAULT_CATALOG_URL, RuleCatalog, RuleSourceMap};
pub use composer::{ComposeContext, compose, resolve};
pub use config::{CatalogSettings, GeneratorSettings, SettingsLoader};
pub use diff::{FieldStrategy, apply_delta, diff};
pub use emit::{
    ArtifactFormat, ArtifactLoader, ArtifactStore, FsArtifactStore, MemoryArtifactStore, parse,
    serialize,
};
pub use error::{ErrorKind, ForgeError};
pub use flags::{FLAGS, Flag, MAX_FLAGS, Options, decode, encode, enumerate, to_identifier, verify_addressing};
pub use generate::{FILE_VARIANTS, FileVariant, GenerationReport, Generator};
pub use layer::{ConfigLayer, Configuration, EffectiveConfig, Field, LanguageOptions, ModuleHandle};
pub use mutate::{add_rule, disable_rule, set_rule_severity};
pub use presets::{PresetBundle, PresetId};
pub use result::Result;
pub use rule::{RuleEntry, RuleSeverity, rule_order};

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lintforge=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
