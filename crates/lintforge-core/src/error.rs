//! Error types for configuration generation and loading

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for lintforge operations
#[derive(Debug, Error)]
pub enum ForgeError {
    /// The remote rule catalog could not be retrieved
    #[error("Fetch error for '{url}': {message}")]
    FetchError { url: String, message: String },

    /// The rule catalog was retrieved but does not have the expected shape
    #[error("Format error: {message}")]
    FormatError { message: String },

    /// Composition or configuration wiring errors
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// No artifact exists for the requested flag combination
    #[error("No configuration artifact found for identifier '{identifier}' (flag vector {vector})")]
    NotFoundError { identifier: String, vector: u32 },

    /// Two flag vectors map onto the same stable identifier
    #[error("Identifier collision: vectors {first} and {second} both map to '{identifier}'")]
    AddressCollision {
        identifier: String,
        first: u32,
        second: u32,
    },

    /// Consumer-side rule mutation contract violations
    #[error("{message}")]
    RuleMutation { message: String },

    /// JSON (de)serialization failures for artifacts and bundles
    #[error("Serialization error: {source}")]
    SerializationError {
        #[from]
        source: serde_json::Error,
    },

    /// File system I/O errors
    #[error("IO error for path '{path}': {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Format,
    Config,
    NotFound,
    Addressing,
    Mutation,
    Serialization,
    Io,
}

impl ForgeError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            ForgeError::FetchError { .. } => ErrorKind::Fetch,
            ForgeError::FormatError { .. } => ErrorKind::Format,
            ForgeError::ConfigError { .. } => ErrorKind::Config,
            ForgeError::NotFoundError { .. } => ErrorKind::NotFound,
            ForgeError::AddressCollision { .. } => ErrorKind::Addressing,
            ForgeError::RuleMutation { .. } => ErrorKind::Mutation,
            ForgeError::SerializationError { .. } => ErrorKind::Serialization,
            ForgeError::IoError { .. } => ErrorKind::Io,
        }
    }

    /// Whether the error aborts a whole generation run rather than a single permutation
    pub fn is_fatal_to_run(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Fetch | ErrorKind::Format | ErrorKind::Addressing | ErrorKind::Io
        )
    }

    /// Create a fetch error
    pub fn fetch_error(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::FetchError {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a format error
    pub fn format_error(message: impl Into<String>) -> Self {
        Self::FormatError {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    /// Create a rule mutation error
    pub fn rule_mutation(message: impl Into<String>) -> Self {
        Self::RuleMutation {
            message: message.into(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::IoError {
            path: path.into(),
            source,
        }
    }
}

/// Convert from std::io::Error
impl From<std::io::Error> for ForgeError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError {
            path: PathBuf::new(),
            source: err,
        }
    }
}
