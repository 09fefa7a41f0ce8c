//! Typed access to report cells.

use std::num::ParseIntError;

use super::modifications::{decode_modified_sequence, DecodedSequence};
use super::table::{Column, ReportRow};
use super::ReportError;

/// Parse a separated list of protein identifiers.
///
/// Empty segments are dropped, so `";;12;;34;"` yields `[12, 34]` and `""`
/// yields nothing. Any other non-integer segment fails the whole list.
pub fn parse_protein_ids(text: &str, separator: char) -> Result<Vec<i32>, ParseIntError> {
    text.split(separator)
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(str::parse::<i32>)
        .collect()
}

/// Parse a locale-invariant decimal number
pub fn parse_f64(text: &str) -> Result<f64, fast_float::Error> {
    fast_float::parse(text.trim())
}

/// Parse a number that may be missing; blank or whitespace-only text is `None`
pub fn parse_optional_f64(text: &str) -> Result<Option<f64>, fast_float::Error> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    parse_f64(text).map(Some)
}

impl ReportRow {
    /// Raw text of a resolved column
    pub fn text(&self, column: &Column) -> &str {
        self.get(column.index()).unwrap_or_default()
    }

    /// Required 32-bit integer cell
    pub fn integer(&self, column: &Column) -> Result<i32, ReportError> {
        let value = self.text(column);
        if value.trim().is_empty() {
            return Err(self.empty(column));
        }
        value
            .trim()
            .parse()
            .map_err(|_| ReportError::InvalidInteger {
                line: self.line(),
                column: column.name().to_string(),
                value: value.to_string(),
            })
    }

    /// Required decimal cell
    pub fn float(&self, column: &Column) -> Result<f64, ReportError> {
        self.optional_float(column)?
            .ok_or_else(|| self.empty(column))
    }

    /// Decimal cell where blank means absent
    pub fn optional_float(&self, column: &Column) -> Result<Option<f64>, ReportError> {
        let value = self.text(column);
        parse_optional_f64(value).map_err(|_| ReportError::InvalidFloat {
            line: self.line(),
            column: column.name().to_string(),
            value: value.to_string(),
        })
    }

    /// Protein identifier list cell
    pub fn protein_ids(&self, column: &Column, separator: char) -> Result<Vec<i32>, ReportError> {
        let value = self.text(column);
        parse_protein_ids(value, separator).map_err(|_| ReportError::InvalidInteger {
            line: self.line(),
            column: column.name().to_string(),
            value: value.to_string(),
        })
    }

    /// Annotated peptide sequence cell
    pub fn modified_sequence(
        &self,
        column: &Column,
        marker: &str,
    ) -> Result<DecodedSequence, ReportError> {
        decode_modified_sequence(self.text(column), marker).map_err(|source| {
            ReportError::InvalidModification {
                line: self.line(),
                column: column.name().to_string(),
                source,
            }
        })
    }

    fn empty(&self, column: &Column) -> ReportError {
        ReportError::EmptyCell {
            line: self.line(),
            column: column.name().to_string(),
        }
    }
}
