//! # diann-bridge
//!
//! Command-line front end for correlating DIA-NN reports with acquired spectra.
//!
//! ## Usage
//!
//! ```bash
//! # Attach identifications to spectra
//! diann-bridge correlate report.tsv --catalog spectra.json -o out/
//!
//! # Extract per-sample protein group quantities
//! diann-bridge protein-groups report.tsv --from-report -s sample1 -s sample2
//!
//! # Check that a report has the columns ingestion needs
//! diann-bridge info report.tsv
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
