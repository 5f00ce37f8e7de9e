use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::bench::result::{ComparisonRun, MetricScore};

///
/// Error encountered while exporting a [`ComparisonRun`]
///
#[derive(Debug)]
pub enum ExportError {
    /// IO error
    IOError(std::io::Error),
    /// CSV writing error
    CSVError(csv::Error),
    /// JSON serialization error
    JSONError(serde_json::Error),
}

impl std::fmt::Display for ExportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to export comparison run: {:?}", self)
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::IOError(e) => Some(e),
            ExportError::CSVError(e) => Some(e),
            ExportError::JSONError(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for ExportError {
    fn from(e: std::io::Error) -> Self {
        Self::IOError(e)
    }
}

impl From<csv::Error> for ExportError {
    fn from(e: csv::Error) -> Self {
        Self::CSVError(e)
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(e: serde_json::Error) -> Self {
        Self::JSONError(e)
    }
}

fn score_field(score: MetricScore) -> String {
    score.value().map(|v| v.to_string()).unwrap_or_default()
}

///
/// Export a [`ComparisonRun`] as a CSV table to the specified filepath
///
/// One row per result record, in batch order. Undefined metric scores and the
/// overall score of invalid records export as empty fields; the winner row is
/// marked `WINNER`.
///
pub fn export_run_to_csv_path<P: AsRef<Path>>(
    run: &ComparisonRun,
    path: P,
) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record([
        "algorithm",
        "execution_time_ms",
        "places",
        "transitions",
        "arcs",
        "fitness",
        "precision",
        "f_measure",
        "overall_score",
        "winner",
        "error",
    ])?;
    for (idx, result) in run.results.iter().enumerate() {
        let overall = result
            .overall_score
            .filter(|s| s.is_finite())
            .map(|s| format!("{:.4}", s))
            .unwrap_or_default();
        writer.write_record([
            result.display_name(),
            result.execution_time_ms.to_string(),
            result.places_count.to_string(),
            result.transitions_count.to_string(),
            result.arcs_count.to_string(),
            score_field(result.fitness_score),
            score_field(result.precision_score),
            score_field(result.f_measure_score),
            overall,
            if run.winner == Some(idx) {
                "WINNER".to_string()
            } else {
                String::new()
            },
            result.error.clone().unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

///
/// Export a [`ComparisonRun`] as JSON to the specified filepath
///
/// The full run (inputs, records, winner) is serialized; see also
/// [`export_run_to_csv_path`] for a tabular export.
///
pub fn export_run_to_json_path<P: AsRef<Path>>(
    run: &ComparisonRun,
    path: P,
) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, run)?;
    writer.flush()?;
    Ok(())
}
