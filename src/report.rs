//! Report rendering shared by the harnesses.
//!
//! Reports are plain UTF-8 CSV, one row per input record plus a header and
//! no row index. Inapplicable sub-scores render as `N/A`; that marker exists
//! only at rendering time, never inside the score types.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::util::{ensure_directory, now_utc_string, sha256_file, write_json_pretty};

pub const NOT_APPLICABLE: &str = "N/A";

pub fn format_score(score: f64) -> String {
    format!("{score}")
}

pub fn format_optional_score(score: Option<f64>) -> String {
    match score {
        Some(value) => format_score(value),
        None => NOT_APPLICABLE.to_string(),
    }
}

/// Quote a field when it carries a delimiter, quote, or newline.
pub fn csv_escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

pub fn write_csv_report(path: &Path, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        ensure_directory(parent)?;
    }

    let mut out = String::new();
    out.push_str(&header.join(","));
    out.push('\n');
    for row in rows {
        let escaped = row
            .iter()
            .map(|field| csv_escape(field))
            .collect::<Vec<String>>();
        out.push_str(&escaped.join(","));
        out.push('\n');
    }

    fs::write(path, out).with_context(|| format!("failed to write report: {}", path.display()))
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Count of exactly-1.0 scores; the snap-to-unity step upstream makes this
/// an exact comparison on purpose.
pub fn perfect_count(values: &[f64]) -> usize {
    values.iter().filter(|value| **value == 1.0).count()
}

#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub harness: String,
    pub generated_at: String,
    pub input_path: String,
    pub input_sha256: String,
    pub report_path: String,
    pub record_count: usize,
    pub mean_combined_score: Option<f64>,
    pub perfect_count: usize,
}

impl RunSummary {
    pub fn for_run(
        harness: &str,
        input_path: &Path,
        report_path: &Path,
        combined_scores: &[f64],
    ) -> Result<Self> {
        Ok(Self {
            harness: harness.to_string(),
            generated_at: now_utc_string(),
            input_path: input_path.display().to_string(),
            input_sha256: sha256_file(input_path)?,
            report_path: report_path.display().to_string(),
            record_count: combined_scores.len(),
            mean_combined_score: mean(combined_scores),
            perfect_count: perfect_count(combined_scores),
        })
    }
}

pub fn summary_path_for(report_path: &Path, explicit: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => report_path.with_extension("summary.json"),
    }
}

pub fn write_run_summary(path: &Path, summary: &RunSummary) -> Result<()> {
    write_json_pretty(path, summary)
}
