//! Artifact emitter
//!
//! An artifact is the ordered list of configurations for one flag vector:
//! the base configuration followed by named per-file-type deltas. It is
//! written either as an ES module whose placeholders load the referenced
//! packages, or as plain JSON.

pub mod loader;
pub mod store;

pub use loader::ArtifactLoader;
pub use store::{ArtifactStore, FsArtifactStore, MemoryArtifactStore};

use crate::error::ForgeError;
use crate::layer::Configuration;
use crate::result::Result;
use regex::Regex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const PREAMBLE: &str = "import { createRequire } from \"module\";\n\
                        const require = createRequire(import.meta.url);\n";
const EXPORT_DEFAULT: &str = "export default ";

/// On-disk representation of an artifact
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    /// ES module with `require(...)` cross-references
    #[default]
    #[serde(alias = "mjs")]
    Esm,
    /// JSON with `[[[package]]]` placeholders left in place
    Json,
}

impl ArtifactFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ArtifactFormat::Esm => "mjs",
            ArtifactFormat::Json => "json",
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArtifactFormat::Esm => f.write_str("esm"),
            ArtifactFormat::Json => f.write_str("json"),
        }
    }
}

impl FromStr for ArtifactFormat {
    type Err = ForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "esm" | "mjs" => Ok(ArtifactFormat::Esm),
            "json" => Ok(ArtifactFormat::Json),
            other => Err(ForgeError::config_error(format!(
                "Unknown artifact format '{other}' (expected esm or json)"
            ))),
        }
    }
}

/// Render configurations into artifact text
pub fn serialize(configs: &[Configuration], format: ArtifactFormat) -> Result<String> {
    let json = serde_json::to_string_pretty(configs)?;
    match format {
        ArtifactFormat::Json => Ok(format!("{json}\n")),
        ArtifactFormat::Esm => {
            let placeholder = pattern(r#""\[\[\[([^\]"]+)\]\]\]""#)?;
            let body = placeholder.replace_all(&json, r#"require("$1")"#);
            Ok(format!("{PREAMBLE}\n{EXPORT_DEFAULT}{body};\n"))
        }
    }
}

/// Read configurations back from artifact text
pub fn parse(text: &str, format: ArtifactFormat) -> Result<Vec<Configuration>> {
    let json = match format {
        ArtifactFormat::Json => text.to_string(),
        ArtifactFormat::Esm => {
            let body = text
                .trim_start()
                .strip_prefix(PREAMBLE)
                .map(str::trim_start)
                .and_then(|rest| rest.strip_prefix(EXPORT_DEFAULT))
                .and_then(|rest| rest.trim_end().strip_suffix(';'))
                .ok_or_else(|| ForgeError::format_error("Artifact is not a generated ES module"))?;
            let require = pattern(r#"require\("([^"]+)"\)"#)?;
            require.replace_all(body, r#""[[[$1]]]""#).into_owned()
        }
    };
    Ok(serde_json::from_str(&json)?)
}

fn pattern(source: &str) -> Result<Regex> {
    Regex::new(source).map_err(|e| ForgeError::format_error(format!("Invalid pattern: {e}")))
}
