//! Generator settings
//!
//! Settings come from an optional project file and are overridden by
//! command-line flags. Supported files, in discovery order:
//! - `.lintforgerc.json` - JSON, comments and trailing commas allowed
//! - `.lintforgerc.toml` - TOML
//! - `lintforge.toml` - TOML
//!
//! Discovery starts in the working directory and walks up to the filesystem
//! root. Without any file every setting takes its default.
//!
//! ## Example
//!
//! ```jsonc
//! {
//!   "outputDir": "dist/configs",
//!   "format": "esm",
//!   "catalog": {
//!     "url": "https://biomejs.dev/metadata/rules.json",
//!     "includeInspired": false
//!   }
//! }
//! ```

pub mod loader;
pub mod settings;

pub use loader::{SETTINGS_FILENAMES, SettingsLoader};
pub use settings::{CatalogSettings, DEFAULT_OUTPUT_DIR, GeneratorSettings};
