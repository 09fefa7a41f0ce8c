use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod config;
mod correlate;
mod info;
mod protein_groups;

pub use config::Config;

/// diann-bridge - Correlate DIA-NN identifications with acquired spectra
#[derive(Parser)]
#[command(name = "diann-bridge")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Correlate DIA-NN reports with a spectrum catalog
    Correlate {
        /// DIA-NN main report(s) (report.tsv)
        #[arg(value_name = "REPORT", required = true)]
        reports: Vec<PathBuf>,

        /// JSON spectrum catalog with files and spectra
        #[arg(long, value_name = "FILE")]
        catalog: PathBuf,

        /// Directory for features and PSM output (defaults to each report's directory)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Skip rows with malformed cells instead of aborting
        #[arg(long)]
        skip_malformed: bool,

        /// Ingest reports concurrently (requires the parallel feature)
        #[arg(long, default_value_t = false)]
        parallel: bool,
    },

    /// Extract per-sample protein group quantities
    ProteinGroups {
        /// Protein-group matrix (report.pg_matrix.tsv), or the main report with --from-report
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Sample column to extract; repeat for several samples
        #[arg(short, long = "sample", value_name = "NAME")]
        samples: Vec<String>,

        /// Treat INPUT as the main report and read the matrix written next to it
        #[arg(long)]
        from_report: bool,

        /// Output TSV path (defaults to stdout)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Check a DIA-NN report's columns and count its rows
    Info {
        /// DIA-NN main report
        #[arg(value_name = "REPORT")]
        file: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Correlate {
            reports,
            catalog,
            output_dir,
            config,
            skip_malformed,
            parallel,
        } => correlate::run(reports, catalog, output_dir, config, skip_malformed, parallel),
        Commands::ProteinGroups {
            input,
            samples,
            from_report,
            output,
            config,
        } => protein_groups::run(input, samples, from_report, output, config),
        Commands::Info { file, config } => info::run(file, config),
    }
}
