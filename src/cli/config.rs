//! TOML configuration file support.
//!
//! Settings that rarely change between runs can live in a config file instead
//! of being repeated on the command line:
//!
//! ```toml
//! # diann-bridge.toml
//! [report]
//! column_separator = "\t"
//! protein_separator = ";"
//! modification_marker = "(UniMod:"
//!
//! [ingest]
//! on_row_error = "skip"
//! parallel = true
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

use diann_bridge::ingest::{IngestConfig, RowErrorPolicy};
use diann_bridge::report::ReportOptions;

/// Root configuration structure for diann-bridge.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Report parsing settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Ingestion settings.
    #[serde(default)]
    pub ingest: IngestSettings,
}

/// Lexical settings for report files.
#[derive(Debug, Default, Deserialize)]
pub struct ReportConfig {
    /// Cell separator (single ASCII character).
    pub column_separator: Option<char>,

    /// Separator inside protein identifier lists.
    pub protein_separator: Option<char>,

    /// Prefix of a modification annotation.
    pub modification_marker: Option<String>,
}

/// Settings for the correlate command.
#[derive(Debug, Default, Deserialize)]
pub struct IngestSettings {
    /// `abort` or `skip` on rows with malformed cells.
    pub on_row_error: Option<RowErrorPolicy>,

    /// Ingest several reports concurrently (requires the parallel feature).
    pub parallel: Option<bool>,
}

impl Config {
    /// Load configuration from a TOML file, or defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

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

    /// Report options with config values applied over the defaults.
    pub fn report_options(&self) -> Result<ReportOptions> {
        let mut options = ReportOptions::default();

        if let Some(separator) = self.report.column_separator {
            if !separator.is_ascii() {
                bail!("column_separator must be a single ASCII character, got {separator:?}");
            }
            options.column_separator = separator as u8;
        }
        if let Some(separator) = self.report.protein_separator {
            options.protein_separator = separator;
        }
        if let Some(marker) = &self.report.modification_marker {
            if marker.is_empty() {
                bail!("modification_marker must not be empty");
            }
            options.modification_marker = marker.clone();
        }

        Ok(options)
    }

    /// Ingestion settings; `skip_malformed` from the command line wins over the file.
    pub fn ingest_config(&self, skip_malformed: bool) -> Result<IngestConfig> {
        let on_row_error = if skip_malformed {
            RowErrorPolicy::Skip
        } else {
            self.ingest.on_row_error.unwrap_or_default()
        };

        Ok(IngestConfig {
            report: self.report_options()?,
            on_row_error,
        })
    }
}
