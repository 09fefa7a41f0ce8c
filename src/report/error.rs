/// Errors that can occur while reading a DIA-NN report or protein-group matrix
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// I/O error reading the report file
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// A required column is absent from the header
    #[error("Missing required report column: {0}")]
    MissingColumn(String),

    /// A data row does not have as many cells as the header
    #[error("Line {line}: expected {expected} cells, found {found}")]
    RowLength {
        /// 1-based line number in the source file
        line: u64,
        /// Number of header columns
        expected: usize,
        /// Number of cells in the offending row
        found: usize,
    },

    /// A cell that must hold an integer does not
    #[error("Line {line}, column {column}: invalid integer {value:?}")]
    InvalidInteger {
        /// 1-based line number in the source file
        line: u64,
        /// Column name
        column: String,
        /// Offending text
        value: String,
    },

    /// A cell that must hold a number does not
    #[error("Line {line}, column {column}: invalid number {value:?}")]
    InvalidFloat {
        /// 1-based line number in the source file
        line: u64,
        /// Column name
        column: String,
        /// Offending text
        value: String,
    },

    /// A required numeric cell is blank
    #[error("Line {line}, column {column}: required value is empty")]
    EmptyCell {
        /// 1-based line number in the source file
        line: u64,
        /// Column name
        column: String,
    },

    /// The modified sequence annotation could not be decoded
    #[error("Line {line}, column {column}: {source}")]
    InvalidModification {
        /// 1-based line number in the source file
        line: u64,
        /// Column name
        column: String,
        /// Decoder failure
        source: ModificationError,
    },

    /// The residues of the modified sequence differ from the stripped sequence
    #[error("Line {line}: modified sequence {modified:?} does not strip to {stripped:?}")]
    SequenceMismatch {
        /// 1-based line number in the source file
        line: u64,
        /// Residues left after removing annotations
        modified: String,
        /// Stripped sequence cell
        stripped: String,
    },
}

impl ReportError {
    /// Whether this error concerns the content of a single cell.
    ///
    /// Cell errors may be skipped under [`RowErrorPolicy::Skip`](crate::ingest::RowErrorPolicy);
    /// everything else means the report is structurally incompatible.
    pub fn is_cell_error(&self) -> bool {
        matches!(
            self,
            ReportError::InvalidInteger { .. }
                | ReportError::InvalidFloat { .. }
                | ReportError::EmptyCell { .. }
                | ReportError::InvalidModification { .. }
                | ReportError::SequenceMismatch { .. }
        )
    }
}

/// Errors produced by the modification sequence decoder
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModificationError {
    /// The accession between marker and `)` is not an integer
    #[error("non-numeric modification accession {accession:?} in {sequence:?}")]
    InvalidAccession {
        /// The annotated sequence being decoded
        sequence: String,
        /// Offending accession text
        accession: String,
    },

    /// An annotation was opened but never closed
    #[error("unterminated modification annotation in {sequence:?}")]
    Unterminated {
        /// The annotated sequence being decoded
        sequence: String,
    },
}
