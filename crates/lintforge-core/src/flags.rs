//! Flag vector codec
//!
//! Maps a set of named boolean options onto a dense integer (one bit per
//! flag, in declaration order) and that integer onto a short stable
//! identifier used to address generated artifacts.
//!
//! The order of [`FLAGS`] is part of the artifact addressing contract:
//! inserting or reordering a flag renames every existing artifact.

use crate::error::ForgeError;
use crate::result::Result;
use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use std::collections::HashMap;
use std::fmt;

/// Number of hex characters kept from the digest
pub const IDENTIFIER_LEN: usize = 8;

/// Longest flag list a `u32` vector can enumerate
pub const MAX_FLAGS: usize = 31;

/// A single named feature flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Node.js environment rules
    Node,
    /// React, hooks and accessibility rules
    React,
    /// Strict type-checked preset instead of the recommended one
    Strict,
    /// Stylistic preset and import sorting
    Style,
    /// Emit only disabled rules
    Disabled,
    /// Drop type-aware rules for fast execution
    Fast,
    /// Turn off rules already covered by Biome
    Biome,
    /// Test, story and end-to-end file variants
    Testing,
}

/// Declared flag order; bit `i` of a flag vector is `FLAGS[i]`
pub const FLAGS: [Flag; 8] = [
    Flag::Node,
    Flag::React,
    Flag::Strict,
    Flag::Style,
    Flag::Disabled,
    Flag::Fast,
    Flag::Biome,
    Flag::Testing,
];

impl Flag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Flag::Node => "node",
            Flag::React => "react",
            Flag::Strict => "strict",
            Flag::Style => "style",
            Flag::Disabled => "disabled",
            Flag::Fast => "fast",
            Flag::Biome => "biome",
            Flag::Testing => "testing",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        FLAGS.iter().copied().find(|flag| flag.as_str() == name)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generation options, one boolean per [`Flag`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Options {
    pub node: bool,
    pub react: bool,
    pub strict: bool,
    pub style: bool,
    pub disabled: bool,
    pub fast: bool,
    pub biome: bool,
    pub testing: bool,
}

impl Options {
    pub fn get(&self, flag: Flag) -> bool {
        match flag {
            Flag::Node => self.node,
            Flag::React => self.react,
            Flag::Strict => self.strict,
            Flag::Style => self.style,
            Flag::Disabled => self.disabled,
            Flag::Fast => self.fast,
            Flag::Biome => self.biome,
            Flag::Testing => self.testing,
        }
    }

    pub fn set(&mut self, flag: Flag, value: bool) {
        let slot = match flag {
            Flag::Node => &mut self.node,
            Flag::React => &mut self.react,
            Flag::Strict => &mut self.strict,
            Flag::Style => &mut self.style,
            Flag::Disabled => &mut self.disabled,
            Flag::Fast => &mut self.fast,
            Flag::Biome => &mut self.biome,
            Flag::Testing => &mut self.testing,
        };
        *slot = value;
    }

    /// Builder-style variant of [`Options::set`]
    pub fn with(mut self, flag: Flag) -> Self {
        self.set(flag, true);
        self
    }

    /// Flag vector under the declared [`FLAGS`] order
    pub fn vector(&self) -> u32 {
        encode(self, &FLAGS)
    }

    /// Stable identifier under the declared [`FLAGS`] order
    pub fn identifier(&self) -> String {
        to_identifier(self.vector())
    }

    /// Names of the flags that are set, in declaration order
    pub fn enabled(&self) -> Vec<&'static str> {
        FLAGS
            .iter()
            .filter(|flag| self.get(**flag))
            .map(Flag::as_str)
            .collect()
    }
}

/// Encode options into a flag vector
pub fn encode(options: &Options, flags: &[Flag]) -> u32 {
    flags
        .iter()
        .enumerate()
        .filter(|(_, flag)| options.get(**flag))
        .fold(0u32, |acc, (index, _)| acc | bit(index))
}

/// Decode a flag vector back into options
pub fn decode(vector: u32, flags: &[Flag]) -> Options {
    let mut options = Options::default();
    for (index, flag) in flags.iter().enumerate() {
        options.set(*flag, vector & bit(index) != 0);
    }
    options
}

/// All `2^n` flag vectors in increasing order, each with its decoded options
///
/// Yields nothing for lists longer than [`MAX_FLAGS`]; [`verify_addressing`]
/// rejects those up front.
pub fn enumerate(flags: &[Flag]) -> impl Iterator<Item = (u32, Options)> + '_ {
    (0..bit(flags.len())).map(move |vector| (vector, decode(vector, flags)))
}

fn bit(index: usize) -> u32 {
    debug_assert!(index <= MAX_FLAGS, "flag index {index} exceeds {MAX_FLAGS}");
    u32::try_from(index)
        .ok()
        .and_then(|shift| 1u32.checked_shl(shift))
        .unwrap_or(0)
}

/// Stable identifier for a flag vector: hex SHA-1 of its decimal form, truncated
pub fn to_identifier(vector: u32) -> String {
    let mut hasher = Sha1::new();
    hasher.update(vector.to_string().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..IDENTIFIER_LEN].to_string()
}

/// Check that every flag vector has its own identifier
pub fn verify_addressing(flags: &[Flag]) -> Result<()> {
    if flags.len() > MAX_FLAGS {
        return Err(ForgeError::config_error(format!(
            "{} flags exceed the {}-flag vector limit",
            flags.len(),
            MAX_FLAGS
        )));
    }
    let mut seen: HashMap<String, u32> = HashMap::new();
    for (vector, _) in enumerate(flags) {
        let identifier = to_identifier(vector);
        if let Some(first) = seen.insert(identifier.clone(), vector) {
            return Err(ForgeError::AddressCollision {
                identifier,
                first,
                second: vector,
            });
        }
    }
    tracing::debug!("Verified {} identifiers are collision-free", seen.len());
    Ok(())
}
