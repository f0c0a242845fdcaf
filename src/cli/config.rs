//! TOML configuration file support.
//!
//! Output settings shared by the commands that write documents:
//!
//! ```toml
//! # sotool.toml
//! [write]
//! pretty = true
//! indent_size = 4
//! write_external_files = true
//! atomic = true
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use soxml::writer::WriterConfig;

/// Root configuration structure for sotool.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Settings for writing documents.
    #[serde(default)]
    pub write: WriteConfig,
}

/// Configuration for commands that write documents.
#[derive(Debug, Default, Deserialize)]
pub struct WriteConfig {
    /// Indent nested elements.
    pub pretty: Option<bool>,

    /// Spaces per indentation level.
    pub indent_size: Option<usize>,

    /// Write the delimited data files of tables flagged for it.
    pub write_external_files: Option<bool>,

    /// Write through a temporary file and rename it into place.
    pub atomic: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Writer settings, with library defaults for anything not configured
    pub fn writer_config(&self) -> WriterConfig {
        let defaults = WriterConfig::default();
        WriterConfig {
            pretty: self.write.pretty.unwrap_or(defaults.pretty),
            indent_size: self.write.indent_size.unwrap_or(defaults.indent_size),
            write_external_files: self
                .write
                .write_external_files
                .unwrap_or(defaults.write_external_files),
            atomic: self.write.atomic.unwrap_or(defaults.atomic),
        }
    }
}
