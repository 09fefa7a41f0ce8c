use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::columns;
use super::modifications::Modification;
use super::table::{Column, Header, ReportRow, TableReader};
use super::{ReportError, ReportOptions};

/// One precursor identification from the main report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeptideRecord {
    /// Raw file the identification was made in, as written by DIA-NN
    pub source_file_name: String,
    /// MS2 scan number within that file
    pub scan_number: i32,
    /// Protein identifiers the peptide maps to (may be empty)
    pub protein_ids: Vec<i32>,
    /// Unmodified residue sequence
    pub sequence: String,
    /// Modifications decoded from the annotated sequence
    pub modifications: Vec<Modification>,
    /// DIA-NN CScore
    pub score: f64,
    /// MS1 peak area
    pub area: f64,
    /// Apex retention time
    pub retention_time: f64,
    /// Elution start
    pub retention_time_start: f64,
    /// Elution end
    pub retention_time_stop: f64,
}

#[derive(Debug, Clone)]
struct PeptideColumns {
    file_name: Column,
    scan_number: Column,
    protein_ids: Column,
    stripped_sequence: Column,
    modified_sequence: Column,
    score: Column,
    area: Column,
    retention_time: Column,
    retention_time_start: Column,
    retention_time_stop: Column,
}

impl PeptideColumns {
    fn resolve(header: &Header) -> Result<Self, ReportError> {
        Ok(Self {
            file_name: header.require(columns::FILE_NAME)?,
            scan_number: header.require(columns::MS2_SCAN)?,
            protein_ids: header.require(columns::PROTEIN_IDS)?,
            stripped_sequence: header.require(columns::STRIPPED_SEQUENCE)?,
            modified_sequence: header.require(columns::MODIFIED_SEQUENCE)?,
            score: header.require(columns::CSCORE)?,
            area: header.require(columns::MS1_AREA)?,
            retention_time: header.require(columns::RT)?,
            retention_time_start: header.require(columns::RT_START)?,
            retention_time_stop: header.require(columns::RT_STOP)?,
        })
    }
}

/// Streaming reader producing one [`PeptideRecord`] per report line.
///
/// Required columns are resolved when the reader is created, so an
/// incompatible report fails before any row is read. A file without even a
/// header line yields no records.
pub struct PeptideReader<R: Read> {
    table: TableReader<R>,
    columns: Option<PeptideColumns>,
    options: ReportOptions,
}

impl PeptideReader<File> {
    /// Open a report file
    pub fn open<P: AsRef<Path>>(path: P, options: &ReportOptions) -> Result<Self, ReportError> {
        let table = TableReader::open(path, options.column_separator)?;
        Self::from_table(table, options)
    }
}

impl<R: Read> PeptideReader<R> {
    /// Read a report from any byte source
    pub fn from_reader(reader: R, options: &ReportOptions) -> Result<Self, ReportError> {
        let table = TableReader::from_reader(reader, options.column_separator)?;
        Self::from_table(table, options)
    }

    fn from_table(table: TableReader<R>, options: &ReportOptions) -> Result<Self, ReportError> {
        let columns = if table.header().is_empty() {
            None
        } else {
            Some(PeptideColumns::resolve(table.header())?)
        };

        Ok(Self {
            table,
            columns,
            options: options.clone(),
        })
    }

    fn parse_row(
        columns: &PeptideColumns,
        options: &ReportOptions,
        row: &ReportRow,
    ) -> Result<PeptideRecord, ReportError> {
        let decoded =
            row.modified_sequence(&columns.modified_sequence, &options.modification_marker)?;
        let stripped = row.text(&columns.stripped_sequence);
        if decoded.sequence != stripped {
            return Err(ReportError::SequenceMismatch {
                line: row.line(),
                modified: decoded.sequence,
                stripped: stripped.to_string(),
            });
        }

        Ok(PeptideRecord {
            source_file_name: row.text(&columns.file_name).to_string(),
            scan_number: row.integer(&columns.scan_number)?,
            protein_ids: row.protein_ids(&columns.protein_ids, options.protein_separator)?,
            sequence: stripped.to_string(),
            modifications: decoded.modifications,
            score: row.float(&columns.score)?,
            area: row.float(&columns.area)?,
            retention_time: row.float(&columns.retention_time)?,
            retention_time_start: row.float(&columns.retention_time_start)?,
            retention_time_stop: row.float(&columns.retention_time_stop)?,
        })
    }
}

impl<R: Read> Iterator for PeptideReader<R> {
    type Item = Result<PeptideRecord, ReportError>;

    fn next(&mut self) -> Option<Self::Item> {
        let columns = self.columns.as_ref()?;
        let row = match self.table.next()? {
            Ok(row) => row,
            Err(e) => return Some(Err(e)),
        };
        Some(Self::parse_row(columns, &self.options, &row))
    }
}
