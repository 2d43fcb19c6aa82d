//! Settings file discovery and loading

use super::settings::GeneratorSettings;
use crate::error::ForgeError;
use crate::result::Result;
use std::fs;
use std::path::{Path, PathBuf};

/// Settings file names in priority order
pub const SETTINGS_FILENAMES: &[&str] = &[".lintforgerc.json", ".lintforgerc.toml", "lintforge.toml"];

/// Discovers and loads settings files
pub struct SettingsLoader;

impl SettingsLoader {
    /// Auto-discover a settings file by traversing upward from `start_path`
    pub fn auto_discover(start_path: &Path) -> Result<Option<PathBuf>> {
        let mut current = start_path
            .canonicalize()
            .map_err(|e| ForgeError::config_error(format!("Invalid path: {e}")))?;

        loop {
            for filename in SETTINGS_FILENAMES {
                let path = current.join(filename);
                if path.is_file() {
                    tracing::debug!("Found settings: {}", path.display());
                    return Ok(Some(path));
                }
            }

            match current.parent() {
                Some(parent) => current = parent.to_path_buf(),
                None => break,
            }
        }

        Ok(None)
    }

    /// Load settings from a specific file
    ///
    /// `.toml` files are parsed as TOML, anything else as JSON with comments.
    /// Relative paths inside the file are resolved against its directory.
    pub fn load_from_file(path: &Path) -> Result<GeneratorSettings> {
        let content = fs::read_to_string(path).map_err(|e| ForgeError::io_error(path, e))?;
        let is_toml = path.extension().and_then(|ext| ext.to_str()) == Some("toml");

        let mut settings: GeneratorSettings = if is_toml {
            toml::from_str(&content).map_err(|e| {
                ForgeError::config_error(format!(
                    "Failed to parse TOML settings '{}': {}",
                    path.display(),
                    e
                ))
            })?
        } else {
            json5::from_str(&content).map_err(|e| {
                ForgeError::config_error(format!(
                    "Failed to parse JSON settings '{}': {}",
                    path.display(),
                    e
                ))
            })?
        };

        if let Some(dir) = path.parent() {
            settings.resolve_paths(dir);
        }
        Ok(settings)
    }

    /// Load settings from `custom_path`, or discover them from `start_dir`
    ///
    /// A missing custom path is an error; finding nothing during discovery
    /// yields the defaults.
    pub fn load(custom_path: Option<&Path>, start_dir: Option<&Path>) -> Result<GeneratorSettings> {
        if let Some(path) = custom_path {
            if !path.exists() {
                return Err(ForgeError::config_error(format!(
                    "Settings file not found: {}. Run 'lintforge config init' to create one.",
                    path.display()
                )));
            }
            return Self::load_from_file(path);
        }

        let search_dir = start_dir.unwrap_or_else(|| Path::new("."));
        match Self::auto_discover(search_dir)? {
            Some(path) => Self::load_from_file(&path),
            None => {
                tracing::debug!("No settings file found, using defaults");
                Ok(GeneratorSettings::default())
            }
        }
    }

    /// Write `settings` to `path` in the format its extension implies
    pub fn write(settings: &GeneratorSettings, path: &Path) -> Result<()> {
        let is_toml = path.extension().and_then(|ext| ext.to_str()) == Some("toml");
        let content = if is_toml {
            toml::to_string_pretty(settings)
                .map_err(|e| ForgeError::config_error(format!("Failed to render TOML: {e}")))?
        } else {
            format!("{}\n", serde_json::to_string_pretty(settings)?)
        };
        fs::write(path, content).map_err(|e| ForgeError::io_error(path, e))
    }
}
