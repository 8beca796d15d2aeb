// src/cli/validate.rs — `--validate`: check the input CSV and exit

use std::path::Path;

use anyhow::Context;

use crate::dataset;

/// Print every issue found in `path`. Returns whether the file is valid.
pub fn run_validate(path: &Path) -> anyhow::Result<bool> {
    let report = dataset::validate_csv(path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    for issue in &report.issues {
        eprintln!("Error: {issue}");
    }

    if report.is_valid() {
        println!("CSV format is valid. ({} rows checked)", report.rows_checked);
    } else {
        println!("CSV format is not valid. Please check the file.");
    }
    Ok(report.is_valid())
}
