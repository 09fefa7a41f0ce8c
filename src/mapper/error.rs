/// Errors raised while populating a [`SpectrumMapperBuilder`](super::SpectrumMapperBuilder)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapperError {
    /// The same raw file path was registered twice
    #[error("File already registered: {path} (file id {existing}, new id {file_id})")]
    DuplicateFile {
        /// Raw file path
        path: String,
        /// Id the path is already mapped to
        existing: i32,
        /// Id of the rejected registration
        file_id: i32,
    },

    /// Two acquisitions claim the same scan of the same file
    #[error("Scan {scan_number} of file {file_id} already maps to spectrum {existing}, cannot map it to spectrum {spectrum_id}")]
    DuplicateScan {
        /// Internal file id
        file_id: i32,
        /// Scan number within the file
        scan_number: i32,
        /// Spectrum already registered under the key
        existing: i32,
        /// Spectrum of the rejected registration
        spectrum_id: i32,
    },
}

/// Errors that can occur while loading a spectrum catalog
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// I/O error reading the catalog file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON deserialization error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// The catalog contents violate mapper invariants
    #[error("Invalid catalog: {0}")]
    MapperError(#[from] MapperError),
}
