//! Configuration file handling.
//!
//! This module provides loading and saving of sbom-ingest configuration
//! from a TOML file.
//!
//! # Configuration Location
//!
//! The configuration file is stored at:
//! - Linux: `~/.config/sbom-ingest/config.toml`
//! - macOS: `~/Library/Application Support/sbom-ingest/config.toml`
//! - Windows: `%APPDATA%\sbom-ingest\config.toml`
//!
//! # Example Configuration
//!
//! ```toml
//! explicit_prefix = "sbom:"
//! fallback_to_path = true
//!
//! [ignore]
//! metadata_types = ["JavaMetadata", "rpm*"]
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Input resolution and decoding options.
///
/// # Example
///
/// ```no_run
/// use sbom_ingest::Config;
///
/// // Load from file (or use defaults if file doesn't exist)
/// let config = Config::load().unwrap();
///
/// println!("Explicit SBOM prefix: {}", config.explicit_prefix);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Marker that flags user input as an explicit SBOM path.
    ///
    /// Default: `"sbom:"`
    pub explicit_prefix: String,

    /// Whether bare user input is tried as an SBOM path before giving up.
    ///
    /// Default: true
    pub fallback_to_path: bool,

    /// Metadata to discard during decoding.
    #[serde(default)]
    pub ignore: IgnoreConfig,
}

/// Metadata discriminators whose payload should not be decoded.
///
/// An ignored discriminator behaves exactly like an unrecognized one: the
/// package is kept and its metadata is left absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnoreConfig {
    /// Discriminator names, e.g. "JavaMetadata" or "rpm*".
    pub metadata_types: Vec<String>,
}

impl IgnoreConfig {
    /// Check if metadata with this discriminator should be dropped.
    pub fn should_ignore_metadata_type(&self, metadata_type: &str) -> bool {
        self.metadata_types.iter().any(|pattern| {
            if pattern.contains('*') {
                glob_match(pattern, metadata_type)
            } else {
                pattern == metadata_type
            }
        })
    }
}

/// Simple glob matching (supports * as wildcard).
fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();

    if parts.len() == 1 {
        return pattern == text;
    }

    let mut remaining = text;

    if !parts[0].is_empty() {
        if !remaining.starts_with(parts[0]) {
            return false;
        }
        remaining = &remaining[parts[0].len()..];
    }

    let last_part = parts[parts.len() - 1];
    if !last_part.is_empty() {
        if !remaining.ends_with(last_part) {
            return false;
        }
        remaining = &remaining[..remaining.len() - last_part.len()];
    }

    for part in &parts[1..parts.len() - 1] {
        if part.is_empty() {
            continue;
        }
        if let Some(pos) = remaining.find(part) {
            remaining = &remaining[pos + part.len()..];
        } else {
            return false;
        }
    }

    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            explicit_prefix: "sbom:".to_string(),
            fallback_to_path: true,
            ignore: IgnoreConfig::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the config file.
    ///
    /// If the config file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Loads configuration from an explicit path, with the same fallback
    /// as [`Config::load`].
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Saves the configuration to the config file.
    ///
    /// Creates the parent directory if it doesn't exist.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Returns the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sbom-ingest")
            .join("config.toml")
    }

    /// Generates a string containing the default configuration.
    pub fn generate_default_config() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
