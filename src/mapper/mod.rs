//! # Spectrum Identity Mapping
//!
//! DIA-NN refers to spectra by raw file path and scan number, while the
//! spectrum catalog of the processing host addresses them by numeric ids.
//! This module bridges the two with a two-level lookup:
//!
//! 1. raw file path → internal file id
//! 2. (file id, scan number) → [`SpectrumRecord`]
//!
//! Population and lookup are separate phases. Registrations go through a
//! [`SpectrumMapperBuilder`]; [`SpectrumMapperBuilder::build`] seals it into a
//! [`SpectrumMapper`] that only answers queries and can be shared across
//! threads by reference.

mod catalog;
mod error;

#[cfg(test)]
mod tests;

use std::borrow::Borrow;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

pub use catalog::SpectrumCatalog;
pub use error::{CatalogError, MapperError};

/// Spectrum id reserved to mean "no spectrum"; never grouped even if registered
pub const UNRESOLVED_SPECTRUM_ID: i32 = -1;

/// A raw file known to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    /// Absolute path, exactly as DIA-NN will report it
    pub path: String,
    /// Internal file id
    pub file_id: i32,
}

impl SourceFile {
    /// Create a new source file descriptor
    pub fn new(path: &str, file_id: i32) -> Self {
        Self {
            path: path.to_string(),
            file_id,
        }
    }
}

/// An acquired spectrum together with every scan number it covers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpectrumAcquisition {
    /// Internal spectrum id
    pub spectrum_id: i32,
    /// Internal id of the file the spectrum was acquired in
    pub file_id: i32,
    /// Scan numbers that refer to this spectrum
    pub scan_numbers: Vec<i32>,
    /// Precursor intensity
    pub intensity: f64,
    /// Instrument-determined monoisotopic precursor m/z
    pub mass_over_charge: f64,
    /// Precursor charge
    pub charge: i16,
}

impl SpectrumAcquisition {
    /// The record stored under each of this acquisition's scan numbers
    pub fn record(&self) -> SpectrumRecord {
        SpectrumRecord {
            spectrum_id: self.spectrum_id,
            file_id: self.file_id,
            intensity: self.intensity,
            mass_over_charge: self.mass_over_charge,
            charge: self.charge,
        }
    }
}

/// Spectrum-level values a resolved identification is joined with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpectrumRecord {
    /// Internal spectrum id
    pub spectrum_id: i32,
    /// Internal file id
    pub file_id: i32,
    /// Precursor intensity
    pub intensity: f64,
    /// Monoisotopic precursor m/z
    pub mass_over_charge: f64,
    /// Precursor charge
    pub charge: i16,
}

/// Collects file and spectrum registrations for a [`SpectrumMapper`].
///
/// Any registration error leaves the builder partially populated; treat it as
/// fatal for the run and discard the builder.
#[derive(Debug, Default)]
pub struct SpectrumMapperBuilder {
    files: HashMap<String, i32>,
    spectra: HashMap<(i32, i32), SpectrumRecord>,
}

impl SpectrumMapperBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Map raw file paths to their internal ids.
    ///
    /// Fails on a path that is already registered, even with the same id.
    pub fn register_files<I>(&mut self, files: I) -> Result<&mut Self, MapperError>
    where
        I: IntoIterator,
        I::Item: Borrow<SourceFile>,
    {
        for file in files {
            let file = file.borrow();
            match self.files.entry(file.path.clone()) {
                Entry::Occupied(entry) => {
                    return Err(MapperError::DuplicateFile {
                        path: file.path.clone(),
                        existing: *entry.get(),
                        file_id: file.file_id,
                    });
                }
                Entry::Vacant(entry) => {
                    entry.insert(file.file_id);
                }
            }
        }
        Ok(self)
    }

    /// Register every scan number of every acquisition.
    ///
    /// Fails when a `(file id, scan number)` key is claimed twice.
    pub fn register_spectra<I>(&mut self, acquisitions: I) -> Result<&mut Self, MapperError>
    where
        I: IntoIterator,
        I::Item: Borrow<SpectrumAcquisition>,
    {
        for acquisition in acquisitions {
            let acquisition = acquisition.borrow();
            let record = acquisition.record();
            for &scan_number in &acquisition.scan_numbers {
                match self.spectra.entry((acquisition.file_id, scan_number)) {
                    Entry::Occupied(entry) => {
                        return Err(MapperError::DuplicateScan {
                            file_id: acquisition.file_id,
                            scan_number,
                            existing: entry.get().spectrum_id,
                            spectrum_id: acquisition.spectrum_id,
                        });
                    }
                    Entry::Vacant(entry) => {
                        entry.insert(record);
                    }
                }
            }
        }
        Ok(self)
    }

    /// Seal the registrations into a read-only mapper
    pub fn build(self) -> SpectrumMapper {
        debug!(
            "Spectrum mapper sealed with {} files and {} scan keys",
            self.files.len(),
            self.spectra.len()
        );
        SpectrumMapper {
            files: self.files,
            spectra: self.spectra,
        }
    }
}

/// Read-only two-level lookup from (raw file path, scan number) to spectrum
#[derive(Debug, Clone, Default)]
pub struct SpectrumMapper {
    files: HashMap<String, i32>,
    spectra: HashMap<(i32, i32), SpectrumRecord>,
}

impl SpectrumMapper {
    /// Start populating a new mapper
    pub fn builder() -> SpectrumMapperBuilder {
        SpectrumMapperBuilder::new()
    }

    /// Internal id of a registered raw file
    pub fn file_id(&self, path: &str) -> Option<i32> {
        self.files.get(path).copied()
    }

    /// Spectrum registered under `scan_number` of the file at `path`.
    ///
    /// Paths must match the registered path exactly.
    pub fn resolve(&self, path: &str, scan_number: i32) -> Option<&SpectrumRecord> {
        let file_id = self.file_id(path)?;
        self.spectra.get(&(file_id, scan_number))
    }

    /// Number of registered files
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of registered (file id, scan number) keys
    pub fn scan_count(&self) -> usize {
        self.spectra.len()
    }
}
