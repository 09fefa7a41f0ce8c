//! # DIA-NN Report Parsing
//!
//! This module reads the tab-separated files DIA-NN writes next to a search:
//!
//! 1. **Main report** (`report.tsv`): one line per precursor identification,
//!    parsed into [`PeptideRecord`]s by [`PeptideReader`].
//! 2. **Protein-group matrix** (`report.pg_matrix.tsv`): one line per protein
//!    group with a quantity column per sample, parsed into
//!    [`ProteinGroupRecord`]s by [`ProteinGroupReader`].
//!
//! Columns are located by header name, so column order does not matter.
//! Both readers stream: lines are decoded as the iterator advances.
//!
//! ## Cell Formats
//!
//! - Numbers use `.` as decimal separator regardless of locale.
//! - Protein identifier lists are `;`-separated integers.
//! - Modified sequences carry UniMod annotations, e.g. `AC(UniMod:4)DE`;
//!   see [`decode_modified_sequence`].

mod cells;
mod error;
mod modifications;
mod peptide;
mod protein_group;
mod table;


pub use cells::{parse_f64, parse_optional_f64, parse_protein_ids};
pub use error::{ModificationError, ReportError};
pub use modifications::{
    decode_modified_sequence, DecodedSequence, Modification, DEFAULT_MODIFICATION_MARKER,
};
pub use peptide::{PeptideReader, PeptideRecord};
pub use protein_group::{read_protein_groups, ProteinGroupReader, ProteinGroupRecord};
pub use table::{Column, Header, ReportRow, TableReader};

/// Column names DIA-NN uses in its reports
pub mod columns {
    /// Raw file path of the run
    pub const FILE_NAME: &str = "File.Name";
    /// MS2 scan number of the identification
    pub const MS2_SCAN: &str = "MS2.Scan";
    /// `;`-separated protein identifiers
    pub const PROTEIN_IDS: &str = "Protein.Ids";
    /// Protein group label (matrix files)
    pub const PROTEIN_GROUP: &str = "Protein.Group";
    /// Residues without annotations
    pub const STRIPPED_SEQUENCE: &str = "Stripped.Sequence";
    /// Residues with UniMod annotations
    pub const MODIFIED_SEQUENCE: &str = "Modified.Sequence";
    /// DIA-NN classifier score
    pub const CSCORE: &str = "CScore";
    /// MS1 peak area
    pub const MS1_AREA: &str = "Ms1.Area";
    /// Apex retention time
    pub const RT: &str = "RT";
    /// Elution start
    pub const RT_START: &str = "RT.Start";
    /// Elution end
    pub const RT_STOP: &str = "RT.Stop";

    /// Columns the main report must provide
    pub const REQUIRED_REPORT_COLUMNS: [&str; 10] = [
        FILE_NAME,
        MS2_SCAN,
        PROTEIN_IDS,
        STRIPPED_SEQUENCE,
        MODIFIED_SEQUENCE,
        CSCORE,
        MS1_AREA,
        RT,
        RT_START,
        RT_STOP,
    ];
}

/// Separator between cells of a report line
pub const COLUMN_SEPARATOR: u8 = b'\t';

/// Separator between identifiers of a protein list cell
pub const PROTEIN_SEPARATOR: char = ';';

/// Lexical settings for report parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportOptions {
    /// Byte separating cells
    pub column_separator: u8,
    /// Character separating protein identifiers within a cell
    pub protein_separator: char,
    /// Prefix opening a modification annotation, matched ignoring ASCII case
    pub modification_marker: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            column_separator: COLUMN_SEPARATOR,
            protein_separator: PROTEIN_SEPARATOR,
            modification_marker: DEFAULT_MODIFICATION_MARKER.to_string(),
        }
    }
}
