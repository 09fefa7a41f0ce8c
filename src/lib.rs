//! # diann-bridge - DIA-NN Report Ingestion
//!
//! `diann-bridge` reads the tab-separated reports written by the DIA-NN
//! search engine and attaches every identification to the spectrum it was
//! made on.
//!
//! ## Overview
//!
//! - **Report parsing** ([`report`]): streaming readers for the main report
//!   and the protein-group matrix, with header-driven column lookup and
//!   decoding of UniMod-annotated sequences.
//!
//! - **Spectrum identity** ([`mapper`]): resolves a `(raw file path, scan
//!   number)` pair to the spectrum acquired at that scan.
//!
//! - **Correlation** ([`correlate`]): groups identifications by resolved
//!   spectrum and derives one quantitative feature per identification.
//!
//! - **Ingestion** ([`ingest`]): ties the above together for whole report
//!   files and reports what was read, resolved and skipped.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use diann_bridge::ingest::{ingest_report, IngestConfig};
//! use diann_bridge::mapper::{SourceFile, SpectrumAcquisition, SpectrumMapper};
//!
//! let files = [SourceFile::new("D:\\runs\\sample1.raw", 1)];
//! let spectra = [SpectrumAcquisition {
//!     spectrum_id: 100,
//!     file_id: 1,
//!     scan_numbers: vec![5],
//!     intensity: 1.0e6,
//!     mass_over_charge: 512.3,
//!     charge: 2,
//! }];
//!
//! let mut builder = SpectrumMapper::builder();
//! builder.register_files(&files)?.register_spectra(&spectra)?;
//! let mapper = builder.build();
//!
//! let outcome = ingest_report("report.tsv", &mapper, &IngestConfig::default())?;
//! println!("{}", outcome.stats);
//! for group in &outcome.correlation.groups {
//!     println!("spectrum {}: {} matches", group.spectrum_id, group.matches.len());
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(clippy::all)]
#![deny(missing_docs)]

pub mod correlate;
pub mod ingest;
pub mod mapper;
pub mod report;

/// Re-export of commonly used types
pub mod prelude {
    pub use crate::correlate::{
        correlate, correlate_with, Correlation, FeatureRecord, MatchRanker, PeptideMatch,
        PsmGroup, UniformRanker,
    };
    pub use crate::ingest::{
        ingest_report, ingest_reports, protein_group_path, IngestConfig, IngestError,
        IngestOutcome, IngestStats, RowErrorPolicy,
    };
    pub use crate::mapper::{
        MapperError, SourceFile, SpectrumAcquisition, SpectrumCatalog, SpectrumMapper,
        SpectrumRecord, UNRESOLVED_SPECTRUM_ID,
    };
    pub use crate::report::{
        decode_modified_sequence, read_protein_groups, Modification, PeptideReader,
        PeptideRecord, ProteinGroupReader, ProteinGroupRecord, ReportError, ReportOptions,
    };
}
