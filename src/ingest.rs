//! Report ingestion: parse a DIA-NN report, correlate it with the spectrum
//! catalog and summarize what happened.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::correlate::{Correlation, Correlator, MatchRanker, UniformRanker};
use crate::mapper::SpectrumMapper;
use crate::report::{PeptideReader, ReportError, ReportOptions};

/// Errors returned when a report cannot be ingested
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The report is unreadable, structurally incompatible or holds a malformed cell
    #[error("{}: {source}", .path.display())]
    Report {
        /// Report that failed
        path: PathBuf,
        /// Underlying failure
        source: ReportError,
    },
}

/// What to do with a row whose cells cannot be parsed.
///
/// Schema errors (missing columns, wrong cell counts) abort under every policy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowErrorPolicy {
    /// Fail the whole report
    #[default]
    Abort,
    /// Log a warning and continue with the next row
    Skip,
}

/// Settings for one ingestion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestConfig {
    /// Lexical report settings
    pub report: ReportOptions,
    /// Handling of malformed rows
    pub on_row_error: RowErrorPolicy,
}

/// Counters from a completed ingestion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestStats {
    /// Data rows read from the report
    pub rows_read: usize,
    /// Rows skipped because a cell could not be parsed
    pub rows_skipped: usize,
    /// Records whose spectrum was found
    pub resolved: usize,
    /// Records whose spectrum was not found
    pub unresolved: usize,
    /// Spectrum groups produced
    pub groups: usize,
    /// Feature records produced
    pub features: usize,
}

impl fmt::Display for IngestStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Read {} rows ({} skipped): {} resolved into {} spectra, {} unresolved, {} features",
            self.rows_read,
            self.rows_skipped,
            self.resolved,
            self.groups,
            self.unresolved,
            self.features
        )
    }
}

/// Result of ingesting one report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestOutcome {
    /// Grouped matches and features
    pub correlation: Correlation,
    /// Counters
    pub stats: IngestStats,
}

/// Ingest a report file, ranking groups with [`UniformRanker`]
pub fn ingest_report<P: AsRef<Path>>(
    path: P,
    mapper: &SpectrumMapper,
    config: &IngestConfig,
) -> Result<IngestOutcome, IngestError> {
    ingest_report_with(path, mapper, config, &UniformRanker)
}

/// Ingest a report file, ranking groups with `ranker`
pub fn ingest_report_with<P, K>(
    path: P,
    mapper: &SpectrumMapper,
    config: &IngestConfig,
    ranker: &K,
) -> Result<IngestOutcome, IngestError>
where
    P: AsRef<Path>,
    K: MatchRanker + ?Sized,
{
    let path = path.as_ref();
    let wrap = |source| IngestError::Report {
        path: path.to_path_buf(),
        source,
    };

    debug!("Ingesting report {}", path.display());
    let reader = PeptideReader::open(path, &config.report).map_err(wrap)?;
    let outcome = ingest_records(reader, mapper, config, ranker).map_err(wrap)?;
    info!("{}: {}", path.display(), outcome.stats);
    Ok(outcome)
}

/// Ingest a report from any byte source
pub fn ingest_reader<R, K>(
    reader: R,
    mapper: &SpectrumMapper,
    config: &IngestConfig,
    ranker: &K,
) -> Result<IngestOutcome, ReportError>
where
    R: Read,
    K: MatchRanker + ?Sized,
{
    let reader = PeptideReader::from_reader(reader, &config.report)?;
    ingest_records(reader, mapper, config, ranker)
}

fn ingest_records<R, K>(
    reader: PeptideReader<R>,
    mapper: &SpectrumMapper,
    config: &IngestConfig,
    ranker: &K,
) -> Result<IngestOutcome, ReportError>
where
    R: Read,
    K: MatchRanker + ?Sized,
{
    let mut stats = IngestStats::default();
    let mut correlator = Correlator::new(mapper);

    for record in reader {
        match record {
            Ok(record) => {
                stats.rows_read += 1;
                if correlator.push(record) {
                    stats.resolved += 1;
                }
            }
            Err(e) if e.is_cell_error() && config.on_row_error == RowErrorPolicy::Skip => {
                stats.rows_read += 1;
                stats.rows_skipped += 1;
                warn!("Skipping malformed row: {e}");
            }
            Err(e) => return Err(e),
        }
    }

    let correlation = correlator.finish(ranker);
    stats.unresolved = correlation.unresolved;
    stats.groups = correlation.groups.len();
    stats.features = correlation.features.len();

    if stats.unresolved > 0 {
        warn!(
            "{} of {} records reference scans outside the spectrum catalog",
            stats.unresolved,
            stats.rows_read - stats.rows_skipped
        );
    }

    Ok(IngestOutcome { correlation, stats })
}

/// Ingest several reports against one mapper.
///
/// With the `parallel` feature the reports are read concurrently on the rayon
/// pool. Results keep the order of `paths`.
pub fn ingest_reports<P>(
    paths: &[P],
    mapper: &SpectrumMapper,
    config: &IngestConfig,
) -> Vec<Result<IngestOutcome, IngestError>>
where
    P: AsRef<Path> + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        paths
            .par_iter()
            .map(|path| ingest_report(path, mapper, config))
            .collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        paths
            .iter()
            .map(|path| ingest_report(path, mapper, config))
            .collect()
    }
}

/// Path of the protein-group matrix DIA-NN writes next to `report`:
/// `out/report.tsv` becomes `out/report.pg_matrix.tsv`.
pub fn protein_group_path<P: AsRef<Path>>(report: P) -> PathBuf {
    let report = report.as_ref();
    let stem = report.file_stem().unwrap_or_default().to_string_lossy();
    let name = match report.extension() {
        Some(ext) => format!("{}.pg_matrix.{}", stem, ext.to_string_lossy()),
        None => format!("{}.pg_matrix", stem),
    };
    report.with_file_name(name)
}
