use anyhow::{Context, Result};
use std::path::PathBuf;

use diann_bridge::report::{columns, TableReader};

use super::Config;

/// Display the columns of a DIA-NN report and check it can be ingested
pub fn run(file: PathBuf, config: Option<PathBuf>) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let config = Config::load(config.as_deref())?;
    let options = config.report_options()?;
    let table = TableReader::open(&file, options.column_separator)
        .with_context(|| format!("Failed to open {}", file.display()))?;
    let header = table.header().clone();

    println!("DIA-NN Report Information");
    println!("=========================");
    println!("File: {}", file.display());
    println!();

    println!("Columns:");
    for (i, name) in header.columns().iter().enumerate() {
        println!("  {:3}. {}", i + 1, name);
    }
    println!();

    println!("Required Columns:");
    let mut missing = 0;
    for name in columns::REQUIRED_REPORT_COLUMNS {
        let present = header.index_of(name).is_some();
        if !present {
            missing += 1;
        }
        println!("  {}", required_column_line(name, present));
    }
    println!();

    let mut rows = 0usize;
    for row in table {
        row.with_context(|| format!("Failed to read {}", file.display()))?;
        rows += 1;
    }
    println!("Data rows: {}", rows);

    if missing > 0 {
        anyhow::bail!("{} required column(s) missing; report cannot be ingested", missing);
    }
    Ok(())
}

#[cfg(feature = "colorized_output")]
fn required_column_line(name: &str, present: bool) -> String {
    use console::{style, Emoji};

    static OK: Emoji<'_, '_> = Emoji("✓", "[OK]");
    static FAIL: Emoji<'_, '_> = Emoji("✗", "[MISSING]");

    if present {
        format!("[{}] {}", OK, style(name).green())
    } else {
        format!("[{}] {}", FAIL, style(name).red().bold())
    }
}

#[cfg(not(feature = "colorized_output"))]
fn required_column_line(name: &str, present: bool) -> String {
    if present {
        format!("[OK] {}", name)
    } else {
        format!("[MISSING] {}", name)
    }
}
