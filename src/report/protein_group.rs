use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::columns;
use super::table::{Column, Header, ReportRow, TableReader};
use super::{ReportError, ReportOptions};

/// One row of the protein-group quantity matrix
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProteinGroupRecord {
    /// Protein group label
    pub name: String,
    /// Identifiers of the proteins in the group
    pub protein_ids: Vec<i32>,
    /// Quantity per requested sample, in request order; `None` where the matrix cell is blank
    pub areas: Vec<Option<f64>>,
}

#[derive(Debug, Clone)]
struct ProteinGroupColumns {
    name: Column,
    protein_ids: Column,
    samples: Vec<Column>,
}

impl ProteinGroupColumns {
    fn resolve<S: AsRef<str>>(header: &Header, sample_names: &[S]) -> Result<Self, ReportError> {
        Ok(Self {
            name: header.require(columns::PROTEIN_GROUP)?,
            protein_ids: header.require(columns::PROTEIN_IDS)?,
            samples: sample_names
                .iter()
                .map(|sample| header.require(sample.as_ref()))
                .collect::<Result<_, _>>()?,
        })
    }
}

/// Streaming reader over a `pg_matrix` file.
///
/// Every requested sample must have a column in the matrix; the areas of each
/// record follow the order of the requested names, not the column order.
pub struct ProteinGroupReader<R: Read> {
    table: TableReader<R>,
    columns: Option<ProteinGroupColumns>,
    protein_separator: char,
}

impl ProteinGroupReader<File> {
    /// Open a matrix file, selecting the given sample columns
    pub fn open<P: AsRef<Path>, S: AsRef<str>>(
        path: P,
        sample_names: &[S],
        options: &ReportOptions,
    ) -> Result<Self, ReportError> {
        let table = TableReader::open(path, options.column_separator)?;
        Self::from_table(table, sample_names, options)
    }
}

impl<R: Read> ProteinGroupReader<R> {
    /// Read a matrix from any byte source
    pub fn from_reader<S: AsRef<str>>(
        reader: R,
        sample_names: &[S],
        options: &ReportOptions,
    ) -> Result<Self, ReportError> {
        let table = TableReader::from_reader(reader, options.column_separator)?;
        Self::from_table(table, sample_names, options)
    }

    fn from_table<S: AsRef<str>>(
        table: TableReader<R>,
        sample_names: &[S],
        options: &ReportOptions,
    ) -> Result<Self, ReportError> {
        let columns = if table.header().is_empty() {
            None
        } else {
            Some(ProteinGroupColumns::resolve(table.header(), sample_names)?)
        };

        Ok(Self {
            table,
            columns,
            protein_separator: options.protein_separator,
        })
    }
}

impl<R: Read> Iterator for ProteinGroupReader<R> {
    type Item = Result<ProteinGroupRecord, ReportError>;

    fn next(&mut self) -> Option<Self::Item> {
        let columns = self.columns.as_ref()?;
        let row = match self.table.next()? {
            Ok(row) => row,
            Err(e) => return Some(Err(e)),
        };

        Some(parse_row(columns, self.protein_separator, &row))
    }
}

fn parse_row(
    columns: &ProteinGroupColumns,
    protein_separator: char,
    row: &ReportRow,
) -> Result<ProteinGroupRecord, ReportError> {
    Ok(ProteinGroupRecord {
        name: row.text(&columns.name).to_string(),
        protein_ids: row.protein_ids(&columns.protein_ids, protein_separator)?,
        areas: columns
            .samples
            .iter()
            .map(|sample| row.optional_float(sample))
            .collect::<Result<_, _>>()?,
    })
}

/// Read every protein group of a matrix file
pub fn read_protein_groups<P: AsRef<Path>, S: AsRef<str>>(
    path: P,
    sample_names: &[S],
    options: &ReportOptions,
) -> Result<Vec<ProteinGroupRecord>, ReportError> {
    ProteinGroupReader::open(path, sample_names, options)?.collect()
}
