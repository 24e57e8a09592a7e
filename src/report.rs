//! Presentation and export of validation results.
//!
//! The validator emits structured [`ValidationResult`]s; this module formats
//! them (text table, CSV, JSON report) but never re-derives a score.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

use crate::models::ValidationResult;

/// Errors raised while writing report files.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize report: {0}")]
    Serialization(#[source] serde_json::Error),

    #[error("failed to format report timestamp: {0}")]
    Timestamp(#[source] time::error::Format),
}

/// Aggregate statistics over one validation run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub valid: usize,
    pub invalid: usize,
    /// Share of VALID results in percent, 0.0 for an empty run.
    pub pass_rate: f64,
}

impl Summary {
    /// Computes the summary for a result sequence.
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let total = results.len();
        let valid = results.iter().filter(|r| r.verdict.is_valid()).count();
        let pass_rate = if total == 0 {
            0.0
        } else {
            valid as f64 / total as f64 * 100.0
        };

        Self {
            total,
            valid,
            invalid: total - valid,
            pass_rate,
        }
    }
}

/// Renders the current relationships as a fixed-width text table.
///
/// Scores are printed at four decimals; an empty result set renders the
/// header row only.
pub fn render_table(results: &[ValidationResult]) -> String {
    const HEADERS: [&str; 5] = ["Root Key", "Root Name", "Current Parent", "Score", "Status"];

    let rows: Vec<[String; 5]> = results
        .iter()
        .map(|r| {
            [
                r.root_key.clone(),
                r.root_name.clone(),
                r.current_parent.parent_name.clone(),
                format!("{:.4}", r.current_parent.similarity_score),
                r.verdict.to_string(),
            ]
        })
        .collect();

    let mut widths: [usize; 5] = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    write_table_row(&mut out, &widths, HEADERS);
    write_table_row(
        &mut out,
        &widths,
        [
            &"-".repeat(widths[0]),
            &"-".repeat(widths[1]),
            &"-".repeat(widths[2]),
            &"-".repeat(widths[3]),
            &"-".repeat(widths[4]),
        ],
    );
    for row in &rows {
        write_table_row(&mut out, &widths, [&row[0], &row[1], &row[2], &row[3], &row[4]]);
    }

    out
}

fn write_table_row(out: &mut String, widths: &[usize; 5], cells: [&str; 5]) {
    let line = cells
        .iter()
        .zip(widths)
        .map(|(cell, &w)| format!("{cell:w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    let _ = writeln!(out, "{}", line.trim_end());
}

/// Writes the two-sheet spreadsheet export as a pair of CSV files.
///
/// `<stem>_current.csv` holds the current relationships,
/// `<stem>_suggestions.csv` one row per suggested parent. Returns the two
/// paths written. Fields are quoted per RFC 4180 when they contain commas,
/// quotes, or newlines.
pub fn write_csv(results: &[ValidationResult], stem: &Path) -> Result<(PathBuf, PathBuf), ReportError> {
    let current_path = sibling_with_suffix(stem, "_current.csv");
    let suggestions_path = sibling_with_suffix(stem, "_suggestions.csv");

    let mut current = String::new();
    let _ = writeln!(
        current,
        "root_key,root_name,parent_key,parent_name,similarity_score,validation,validation_status"
    );
    for r in results {
        let _ = writeln!(
            current,
            "{},{},{},{},{:.6},{},{}",
            csv_field(&r.root_key),
            csv_field(&r.root_name),
            csv_field(&r.current_parent.parent_key),
            csv_field(&r.current_parent.parent_name),
            r.current_parent.similarity_score,
            r.verdict,
            r.validation_status,
        );
    }

    let mut suggestions = String::new();
    let _ = writeln!(
        suggestions,
        "root_key,root_name,suggested_parent_key,suggested_parent_name,similarity_score,improvement"
    );
    for r in results {
        for s in &r.suggested_parents {
            let _ = writeln!(
                suggestions,
                "{},{},{},{},{:.6},{:.6}",
                csv_field(&r.root_key),
                csv_field(&r.root_name),
                csv_field(&s.parent_key),
                csv_field(&s.parent_name),
                s.similarity_score,
                s.improvement,
            );
        }
    }

    write_file(&current_path, &current)?;
    write_file(&suggestions_path, &suggestions)?;
    Ok((current_path, suggestions_path))
}

/// Writes the full JSON report: summary, results, and an RFC 3339 timestamp.
pub fn write_json(
    results: &[ValidationResult],
    summary: &Summary,
    path: &Path,
) -> Result<(), ReportError> {
    let generated_at = OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(ReportError::Timestamp)?;

    let report = serde_json::json!({
        "generated_at": generated_at,
        "summary": summary,
        "results": results,
    });

    let json = serde_json::to_string_pretty(&report).map_err(ReportError::Serialization)?;
    write_file(path, &json)
}

fn write_file(path: &Path, contents: &str) -> Result<(), ReportError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|source| ReportError::Io {
            path: parent.display().to_string(),
            source,
        })?;
    }
    fs::write(path, contents).map_err(|source| ReportError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn sibling_with_suffix(stem: &Path, suffix: &str) -> PathBuf {
    let mut name = stem
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "report".to_string());
    name.push_str(suffix);
    stem.with_file_name(name)
}

fn csv_field(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
