use anyhow::{bail, Context, Result};
use log::info;
#[cfg(not(feature = "parallel"))]
use log::warn;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use diann_bridge::ingest::{ingest_report, ingest_reports, IngestOutcome};
use diann_bridge::mapper::SpectrumCatalog;

use super::Config;

/// Correlate DIA-NN reports with a spectrum catalog
pub fn run(
    reports: Vec<PathBuf>,
    catalog: PathBuf,
    output_dir: Option<PathBuf>,
    config: Option<PathBuf>,
    skip_malformed: bool,
    parallel: bool,
) -> Result<()> {
    for report in &reports {
        if !report.exists() {
            bail!("Report does not exist: {}", report.display());
        }
    }
    let outputs = output_bases(&reports, output_dir.as_deref())?;

    let config = Config::load(config.as_deref())?;
    let ingest_config = config.ingest_config(skip_malformed)?;
    let parallel = parallel || config.ingest.parallel.unwrap_or(false);

    let catalog = SpectrumCatalog::from_json_file(&catalog)
        .with_context(|| format!("Failed to load spectrum catalog: {}", catalog.display()))?;
    info!(
        "Catalog: {} files, {} spectra",
        catalog.files.len(),
        catalog.spectra.len()
    );
    let mapper = catalog.to_mapper().context("Spectrum catalog is inconsistent")?;

    let outcomes = if parallel && reports.len() > 1 {
        #[cfg(not(feature = "parallel"))]
        warn!("Parallel ingestion requested but binary was built without the parallel feature; reading reports sequentially.");
        ingest_reports(&reports, &mapper, &ingest_config)
    } else {
        reports
            .iter()
            .map(|report| ingest_report(report, &mapper, &ingest_config))
            .collect()
    };

    for ((report, base), outcome) in reports.iter().zip(&outputs).zip(outcomes) {
        let outcome = outcome.context("Ingestion failed")?;
        write_outputs(base, &outcome)?;
        println!("{}: {}", report.display(), outcome.stats);
    }

    Ok(())
}

/// Output path prefix per report: `<dir>/<stem>`, where `dir` is `output_dir`
/// or the report's own directory.
///
/// Reports whose prefixes collide are told apart by their parent directory
/// name (`out/a_report`, `out/b_report`). A collision that remains is an error.
fn output_bases(reports: &[PathBuf], output_dir: Option<&Path>) -> Result<Vec<PathBuf>> {
    let dir_of = |report: &Path| match output_dir {
        Some(dir) => dir.to_path_buf(),
        None => report.parent().map(Path::to_path_buf).unwrap_or_default(),
    };
    let stem_of = |report: &Path| report.file_stem().unwrap_or_default().to_os_string();

    let mut counts: HashMap<PathBuf, usize> = HashMap::new();
    for report in reports {
        *counts.entry(dir_of(report).join(stem_of(report))).or_default() += 1;
    }

    let mut seen = HashSet::new();
    let mut bases = Vec::with_capacity(reports.len());
    for report in reports {
        let dir = dir_of(report);
        let stem = stem_of(report);
        let mut base = dir.join(&stem);

        if counts.get(&base).copied().unwrap_or_default() > 1 {
            if let Some(parent) = report.parent().and_then(Path::file_name) {
                let mut name = parent.to_os_string();
                name.push("_");
                name.push(&stem);
                base = dir.join(name);
            }
        }

        if !seen.insert(base.clone()) {
            bail!(
                "Output {} would be written by more than one report; \
                 correlate {} in a separate run or choose another --output-dir",
                base.display(),
                report.display()
            );
        }
        bases.push(base);
    }

    Ok(bases)
}

fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn write_outputs(base: &Path, outcome: &IngestOutcome) -> Result<()> {
    if let Some(dir) = base.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {}", dir.display()))?;
    }

    let features_path = with_suffix(base, ".features.tsv");
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .from_path(&features_path)
        .with_context(|| format!("Failed to create {}", features_path.display()))?;
    for feature in &outcome.correlation.features {
        writer.serialize(feature)?;
    }
    writer.flush()?;
    info!("Features: {}", features_path.display());

    let psms_path = with_suffix(base, ".psms.json");
    let file = File::create(&psms_path)
        .with_context(|| format!("Failed to create {}", psms_path.display()))?;
    serde_json::to_writer_pretty(BufWriter::new(file), &outcome.correlation.groups)?;
    info!("PSM groups: {}", psms_path.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const HEADER: &str = "File.Name\tProtein.Ids\tModified.Sequence\tStripped.Sequence\tCScore\tRT\tRT.Start\tRT.Stop\tMs1.Area\tMS2.Scan";

    #[test]
    fn test_output_bases_keep_distinct_stems() {
        let reports = vec![PathBuf::from("a/first.tsv"), PathBuf::from("b/second.tsv")];

        let bases = output_bases(&reports, None).unwrap();
        assert_eq!(bases, vec![PathBuf::from("a/first"), PathBuf::from("b/second")]);

        let bases = output_bases(&reports, Some(Path::new("out"))).unwrap();
        assert_eq!(bases, vec![PathBuf::from("out/first"), PathBuf::from("out/second")]);
    }

    #[test]
    fn test_output_bases_disambiguate_shared_stem() {
        let reports = vec![PathBuf::from("a/report.tsv"), PathBuf::from("b/report.tsv")];

        // Next to each report there is nothing to disambiguate
        let bases = output_bases(&reports, None).unwrap();
        assert_eq!(bases, vec![PathBuf::from("a/report"), PathBuf::from("b/report")]);

        let bases = output_bases(&reports, Some(Path::new("out"))).unwrap();
        assert_eq!(
            bases,
            vec![PathBuf::from("out/a_report"), PathBuf::from("out/b_report")]
        );
    }

    #[test]
    fn test_output_bases_reject_remaining_collision() {
        let reports = vec![PathBuf::from("a/report.tsv"), PathBuf::from("a/report.tsv")];
        assert!(output_bases(&reports, None).is_err());

        let reports = vec![PathBuf::from("x/a/report.tsv"), PathBuf::from("y/a/report.tsv")];
        assert!(output_bases(&reports, Some(Path::new("out"))).is_err());
    }

    #[test]
    fn test_run_writes_one_output_per_report() {
        let dir = tempdir().unwrap();
        let catalog = dir.path().join("catalog.json");
        fs::write(
            &catalog,
            r#"{
                "files": [
                    { "path": "/data/run1.raw", "file_id": 1 },
                    { "path": "/data/run2.raw", "file_id": 2 }
                ],
                "spectra": [
                    { "spectrum_id": 10, "file_id": 1, "scan_numbers": [5], "intensity": 1.0, "mass_over_charge": 400.0, "charge": 2 },
                    { "spectrum_id": 20, "file_id": 2, "scan_numbers": [5], "intensity": 1.0, "mass_over_charge": 500.0, "charge": 2 }
                ]
            }"#,
        )
        .unwrap();

        let mut reports = Vec::new();
        for (name, run) in [("a", "run1"), ("b", "run2")] {
            let report_dir = dir.path().join(name);
            fs::create_dir(&report_dir).unwrap();
            let report = report_dir.join("report.tsv");
            fs::write(
                &report,
                format!("{HEADER}\n/data/{run}.raw\t1\tPEPK\tPEPK\t0.9\t10\t9.9\t10.1\t1e5\t5\n"),
            )
            .unwrap();
            reports.push(report);
        }

        let out = dir.path().join("out");
        run(reports, catalog, Some(out.clone()), None, false, false).unwrap();

        for (name, file_id) in [("a", "1"), ("b", "2")] {
            let features = fs::read_to_string(out.join(format!("{name}_report.features.tsv")))
                .unwrap();
            let mut lines = features.lines();
            assert!(lines.next().unwrap().starts_with("file_id\t"));
            assert!(lines.next().unwrap().starts_with(&format!("{file_id}\t")));
            assert!(out.join(format!("{name}_report.psms.json")).exists());
        }
        assert!(!out.join("report.features.tsv").exists());
    }
}
