//! Scan configuration.
//!
//! Every component takes its conventions from a [`ScanConfig`] passed in
//! explicitly; there is no process-wide state. The defaults match the usual
//! Ren'Py project layout, and a project can pin its own conventions in a
//! JSON file loaded with [`ScanConfig::from_file`].

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Image extensions recognized by default (lowercase, no leading dot).
pub const DEFAULT_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "avif", "webp", "svg"];

/// Directory names conventionally holding scripts inside a project root,
/// tried in order when deriving paths from `--project`.
pub const SCRIPT_DIR_NAMES: &[&str] = &["script", "scripts", "game"];

/// Options recognized by a scan run.
///
/// # Example
///
/// ```
/// use assetscope::config::ScanConfig;
///
/// let config = ScanConfig::default();
/// assert!(config.is_image_extension("PNG"));
/// assert_eq!(config.script_extension, "rpy");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// File extensions treated as images (lowercase, no leading dot).
    pub image_extensions: BTreeSet<String>,

    /// Extension of script files to scan (no leading dot).
    pub script_extension: String,

    /// Compare identifiers case-sensitively. Off by default: scripting
    /// engine references are case-insensitive on most platforms.
    pub case_sensitive: bool,

    /// Also treat an image as used when only its bare file name (no
    /// directory component) matches a reference.
    pub allow_basename_fallback: bool,

    /// Leading path segments stripped from references and indexed paths so
    /// that `images/bg/room.png` and `bg/room` compare equal.
    pub strip_prefixes: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            image_extensions: DEFAULT_IMAGE_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            script_extension: "rpy".to_string(),
            case_sensitive: false,
            allow_basename_fallback: true,
            strip_prefixes: vec!["images".to_string()],
        }
    }
}

impl ScanConfig {
    /// Load a configuration from a JSON file. Missing fields fall back to
    /// the defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse a configuration from a JSON string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: ScanConfig = serde_json::from_str(content)?;
        Ok(config)
    }

    /// Returns true if `ext` (without leading dot) is a recognized image
    /// extension. Extensions always compare case-insensitively, even when
    /// `case_sensitive` is set; that flag governs identifier comparison only.
    pub fn is_image_extension(&self, ext: &str) -> bool {
        self.image_extensions.contains(&ext.to_lowercase())
    }

    /// Returns true if `ext` is the configured script extension.
    pub fn is_script_extension(&self, ext: &str) -> bool {
        ext.eq_ignore_ascii_case(&self.script_extension)
    }
}

/// Errors that can occur while loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the file from disk.
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the JSON content.
    #[error("Failed to parse config: {0}")]
    Json(#[from] serde_json::Error),
}
