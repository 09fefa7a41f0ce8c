use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use super::{CatalogError, SourceFile, SpectrumAcquisition, SpectrumMapper};

/// Files and spectra supplied by the host, as stored in a JSON document:
///
/// ```json
/// {
///   "files": [{ "path": "/data/run1.raw", "file_id": 1 }],
///   "spectra": [{ "spectrum_id": 100, "file_id": 1, "scan_numbers": [55, 56],
///                 "intensity": 1.2e6, "mass_over_charge": 512.77, "charge": 2 }]
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpectrumCatalog {
    /// Raw files of the run
    #[serde(default)]
    pub files: Vec<SourceFile>,
    /// Acquired spectra
    #[serde(default)]
    pub spectra: Vec<SpectrumAcquisition>,
}

impl SpectrumCatalog {
    /// Load a catalog from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        debug!("Loading spectrum catalog {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    /// Load a catalog from a JSON reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, CatalogError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Register files, then spectra, and seal the result
    pub fn to_mapper(&self) -> Result<SpectrumMapper, CatalogError> {
        let mut builder = SpectrumMapper::builder();
        builder
            .register_files(&self.files)?
            .register_spectra(&self.spectra)?;
        Ok(builder.build())
    }
}
