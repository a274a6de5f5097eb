/// Report Writer - CSV exports of original vs despiked series and per-run summaries
use std::path::Path;

use csv::Writer;
use serde::Serialize;

use crate::series::Series;
use crate::sweep::SweepResult;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SummaryRow {
    pub file: String,
    pub label: String,
    pub window: usize,
    pub multipass: usize,
    pub method: String,
    pub points: usize,
    pub passes: usize,
    pub corrected_windows: usize,
    pub max_abs_change: f64,
}

impl SummaryRow {
    pub fn new(file: &str, original: &Series, result: &SweepResult) -> Self {
        SummaryRow {
            file: file.to_string(),
            label: result.run.label.clone(),
            window: result.run.config.window,
            multipass: result.run.config.multipass,
            method: result.run.config.method.to_string(),
            points: original.len(),
            passes: result.passes.len(),
            corrected_windows: result.corrected_windows(),
            max_abs_change: result.max_abs_change(original),
        }
    }
}

/// Output name for `path` found under `input_root`: the relative path with its
/// components joined by `__`, extension kept, so `x/s.json` becomes
/// `x__s.json_despiked.csv`. A single-file input uses its file name.
pub fn comparison_file_name(input_root: &Path, path: &Path) -> String {
    let relative = path
        .strip_prefix(input_root)
        .ok()
        .filter(|r| !r.as_os_str().is_empty())
        .unwrap_or_else(|| path.file_name().map(Path::new).unwrap_or(path));

    let joined = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("__");

    format!("{}_despiked.csv", joined)
}

/// One row per point: argument, original value, then one column per run.
pub fn write_comparison_csv(
    output_path: &Path,
    original: &Series,
    results: &[SweepResult],
) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_path(output_path)?;

    let mut header = vec!["argument".to_string(), "original".to_string()];
    header.extend(results.iter().map(|r| r.run.label.clone()));
    wtr.write_record(&header)?;

    for (i, point) in original.points().enumerate() {
        let mut row = vec![point.argument.to_string(), point.value.to_string()];
        row.extend(results.iter().map(|r| r.series.values[i].to_string()));
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}

pub fn write_summary_csv(output_path: &Path, rows: &[SummaryRow]) -> Result<(), csv::Error> {
    let mut wtr = Writer::from_path(output_path)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}
