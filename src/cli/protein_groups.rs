use anyhow::{Context, Result};
use log::info;
use std::io::Write;
use std::path::PathBuf;

use diann_bridge::ingest::protein_group_path;
use diann_bridge::report::ProteinGroupReader;

use super::Config;

/// Write per-sample protein group quantities as TSV
pub fn run(
    input: PathBuf,
    samples: Vec<String>,
    from_report: bool,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<()> {
    let matrix = if from_report {
        protein_group_path(&input)
    } else {
        input
    };
    if !matrix.exists() {
        anyhow::bail!("Protein-group matrix does not exist: {}", matrix.display());
    }

    let config = Config::load(config.as_deref())?;
    let options = config.report_options()?;
    let reader = ProteinGroupReader::open(&matrix, &samples, &options)
        .with_context(|| format!("Failed to open {}", matrix.display()))?;

    let sink: Box<dyn Write> = match &output {
        Some(path) => Box::new(
            std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout().lock()),
    };
    let mut writer = csv::WriterBuilder::new().delimiter(b'\t').from_writer(sink);

    let mut header = vec!["name".to_string(), "protein_ids".to_string()];
    header.extend(samples.iter().cloned());
    writer.write_record(&header)?;

    let separator = options.protein_separator.to_string();
    let mut count = 0usize;
    for group in reader {
        let group = group.context("Failed to parse protein group")?;
        let mut record = Vec::with_capacity(2 + group.areas.len());
        record.push(group.name);
        record.push(
            group
                .protein_ids
                .iter()
                .map(i32::to_string)
                .collect::<Vec<_>>()
                .join(&separator),
        );
        record.extend(
            group
                .areas
                .iter()
                .map(|area| area.map(|a| a.to_string()).unwrap_or_default()),
        );
        writer.write_record(&record)?;
        count += 1;
    }
    writer.flush()?;

    info!("Wrote {} protein groups from {}", count, matrix.display());
    Ok(())
}
