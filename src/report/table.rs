use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::Arc;

use csv::StringRecord;
use log::debug;

use super::ReportError;

/// Column names of a tabular report, resolvable by name
#[derive(Debug, Clone, Default)]
pub struct Header {
    columns: Vec<String>,
    positions: HashMap<String, usize>,
}

impl Header {
    /// Build a header from ordered column names.
    ///
    /// When a name appears more than once, lookups resolve to its first occurrence.
    pub fn new(columns: Vec<String>) -> Self {
        let mut positions = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            positions.entry(name.clone()).or_insert(i);
        }
        Self { columns, positions }
    }

    /// Position of the named column, or `None` if the report lacks it
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// Resolve a column the caller cannot do without
    pub fn require(&self, name: &str) -> Result<Column, ReportError> {
        self.index_of(name)
            .map(|index| Column {
                name: name.to_string(),
                index,
            })
            .ok_or_else(|| ReportError::MissingColumn(name.to_string()))
    }

    /// Ordered column names
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// True when the source had no header line at all
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A named column resolved to its position in a particular header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    name: String,
    index: usize,
}

impl Column {
    /// Column name as it appears in the header
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 0-based position in the row
    pub fn index(&self) -> usize {
        self.index
    }
}

/// One data line of a report, sharing the header of the table it came from
#[derive(Debug, Clone)]
pub struct ReportRow {
    cells: StringRecord,
    header: Arc<Header>,
    line: u64,
}

impl ReportRow {
    /// Cell at `index`, if the row has one
    pub fn get(&self, index: usize) -> Option<&str> {
        self.cells.get(index)
    }

    /// Cell under the named column, if the header has it
    pub fn cell(&self, name: &str) -> Option<&str> {
        self.header.index_of(name).and_then(|i| self.get(i))
    }

    /// Header shared by every row of the table
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// 1-based line number in the source
    pub fn line(&self) -> u64 {
        self.line
    }
}

/// Streaming reader over a delimited text table with a header line.
///
/// Rows are read one physical line at a time; the table is never held in
/// memory. Cells are split on the separator only, so quote characters are
/// kept verbatim. A blank line is a row without cells and fails the length
/// check like any other short row. The reader cannot rewind: to read a table
/// twice, open it again.
pub struct TableReader<R: Read> {
    source: BufReader<R>,
    buffer: String,
    line: u64,
    separator: char,
    header: Arc<Header>,
}

impl TableReader<File> {
    /// Open a table file using `separator` between cells
    pub fn open<P: AsRef<Path>>(path: P, separator: u8) -> Result<Self, ReportError> {
        let path = path.as_ref();
        debug!("Opening table {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(file, separator)
    }
}

impl<R: Read> TableReader<R> {
    /// Read the header line from `reader`; data rows follow lazily.
    ///
    /// An input without any line yields an empty header and no rows.
    pub fn from_reader(reader: R, separator: u8) -> Result<Self, ReportError> {
        let separator = char::from(separator);
        let mut table = Self {
            source: BufReader::new(reader),
            buffer: String::new(),
            line: 0,
            separator,
            header: Arc::new(Header::default()),
        };

        let columns: Option<Vec<String>> = table.read_line()?.map(|text| {
            let text = text.strip_prefix('\u{feff}').unwrap_or(text);
            split_cells(text, separator)
                .iter()
                .map(str::to_string)
                .collect()
        });
        if let Some(columns) = columns {
            table.header = Arc::new(Header::new(columns));
        }

        Ok(table)
    }

    /// Header of this table
    pub fn header(&self) -> &Header {
        &self.header
    }

    /// Next physical line without its terminator, or `None` at end of input
    fn read_line(&mut self) -> Result<Option<&str>, ReportError> {
        self.buffer.clear();
        if self.source.read_line(&mut self.buffer)? == 0 {
            return Ok(None);
        }
        self.line += 1;

        let text = self.buffer.strip_suffix('\n').unwrap_or(self.buffer.as_str());
        Ok(Some(text.strip_suffix('\r').unwrap_or(text)))
    }
}

/// Split one line into cells; an empty line has no cells
fn split_cells(text: &str, separator: char) -> StringRecord {
    let mut cells = StringRecord::new();
    if !text.is_empty() {
        for cell in text.split(separator) {
            cells.push_field(cell);
        }
    }
    cells
}

impl<R: Read> Iterator for TableReader<R> {
    type Item = Result<ReportRow, ReportError>;

    fn next(&mut self) -> Option<Self::Item> {
        let separator = self.separator;
        let cells = match self.read_line() {
            Ok(Some(text)) => split_cells(text, separator),
            Ok(None) => return None,
            Err(e) => return Some(Err(e)),
        };

        if cells.len() != self.header.len() {
            return Some(Err(ReportError::RowLength {
                line: self.line,
                expected: self.header.len(),
                found: cells.len(),
            }));
        }

        Some(Ok(ReportRow {
            cells,
            header: Arc::clone(&self.header),
            line: self.line,
        }))
    }
}
