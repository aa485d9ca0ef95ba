//! # Report Module
//!
//! Per-file outcomes and the aggregate processing summary, plus optional
//! JSON report generation.
//!
//! Every processed file ends in exactly one [`FileOutcome`]; the summary
//! carries per-category counts and is the contract surfaced to the CLI/log
//! layer. `Skipped` is not an error; only `Error`-category files affect the
//! process exit status.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// Terminal state of one processed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileOutcome {
  /// The license block was inserted and the file written.
  Added,
  /// The license block was removed and the file written.
  Removed,
  /// Add requested but the block was already present; no write.
  AlreadyPresent,
  /// Delete requested but no block was present; no write.
  NotPresent,
  /// The file was not processed (unsupported type, binary, symlink, ...).
  Skipped,
  /// The file could not be read or written.
  Error,
}

impl std::fmt::Display for FileOutcome {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let label = match self {
      FileOutcome::Added => "added",
      FileOutcome::Removed => "removed",
      FileOutcome::AlreadyPresent => "already present",
      FileOutcome::NotPresent => "not present",
      FileOutcome::Skipped => "skipped",
      FileOutcome::Error => "error",
    };
    write!(f, "{label}")
  }
}

/// Information about a processed file for reporting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
  /// Path to the file.
  #[serde(with = "path_serialization")]
  pub path: PathBuf,
  /// Terminal state the file ended in.
  pub outcome: FileOutcome,
  /// Skip reason or failure reason, when applicable.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub detail: Option<String>,
}

impl FileReport {
  /// Report a file that ended without a detail message.
  pub const fn new(path: PathBuf, outcome: FileOutcome) -> Self {
    Self {
      path,
      outcome,
      detail: None,
    }
  }

  /// Report a skipped file with the reason it was skipped.
  pub fn skipped(path: PathBuf, reason: impl Into<String>) -> Self {
    Self {
      path,
      outcome: FileOutcome::Skipped,
      detail: Some(reason.into()),
    }
  }

  /// Report a failed file with the failure reason.
  pub fn error(path: PathBuf, reason: impl Into<String>) -> Self {
    Self {
      path,
      outcome: FileOutcome::Error,
      detail: Some(reason.into()),
    }
  }
}

/// Helper module for serializing/deserializing PathBuf.
mod path_serialization {
  use std::path::PathBuf;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(path: &std::path::Path, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&path.to_string_lossy())
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
  }
}

/// Aggregate counts over one batch run.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ProcessingSummary {
  pub added: usize,
  pub removed: usize,
  pub already_present: usize,
  pub not_present: usize,
  pub skipped: usize,
  pub errors: usize,
  /// Wall-clock duration of the batch in milliseconds.
  pub duration_ms: u128,
}

impl ProcessingSummary {
  /// Builds a summary from the per-file reports of one batch.
  pub fn from_reports(reports: &[FileReport], elapsed: Duration) -> Self {
    let mut summary = Self {
      duration_ms: elapsed.as_millis(),
      ..Self::default()
    };

    for report in reports {
      match report.outcome {
        FileOutcome::Added => summary.added += 1,
        FileOutcome::Removed => summary.removed += 1,
        FileOutcome::AlreadyPresent => summary.already_present += 1,
        FileOutcome::NotPresent => summary.not_present += 1,
        FileOutcome::Skipped => summary.skipped += 1,
        FileOutcome::Error => summary.errors += 1,
      }
    }

    summary
  }

  /// Total number of files accounted for.
  pub const fn total(&self) -> usize {
    self.added + self.removed + self.already_present + self.not_present + self.skipped + self.errors
  }

  /// Whether any file ended in the `Error` category.
  pub const fn has_errors(&self) -> bool {
    self.errors > 0
  }
}

/// Envelope written to the JSON report file.
#[derive(Serialize)]
struct JsonReport<'a> {
  generated_at: String,
  summary: &'a ProcessingSummary,
  files: &'a [FileReport],
}

/// Writes the full per-file report plus summary as JSON.
///
/// # Errors
///
/// Returns an error if serialization fails or the file cannot be written.
pub fn write_json_report(output_path: &std::path::Path, reports: &[FileReport], summary: &ProcessingSummary) -> Result<()> {
  let envelope = JsonReport {
    generated_at: Local::now().to_rfc3339(),
    summary,
    files: reports,
  };

  let content = serde_json::to_string_pretty(&envelope).with_context(|| "Failed to serialize JSON report")?;
  std::fs::write(output_path, content)
    .with_context(|| format!("Failed to write report to {}", output_path.display()))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_summary_counts_by_outcome() {
    let reports = vec![
      FileReport::new(PathBuf::from("a.rs"), FileOutcome::Added),
      FileReport::new(PathBuf::from("b.rs"), FileOutcome::Added),
      FileReport::new(PathBuf::from("c.rs"), FileOutcome::AlreadyPresent),
      FileReport::skipped(PathBuf::from("d.bin"), "ELF binary"),
      FileReport::error(PathBuf::from("e.rs"), "permission denied"),
    ];

    let summary = ProcessingSummary::from_reports(&reports, Duration::from_millis(12));
    assert_eq!(summary.added, 2);
    assert_eq!(summary.already_present, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.total(), 5);
    assert!(summary.has_errors());
  }

  #[test]
  fn test_skipped_is_not_an_error() {
    let reports = vec![FileReport::skipped(PathBuf::from("d.bin"), "unsupported file type")];
    let summary = ProcessingSummary::from_reports(&reports, Duration::ZERO);
    assert!(!summary.has_errors());
  }

  #[test]
  fn test_file_report_serialization() {
    let report = FileReport::skipped(PathBuf::from("src/a.bin"), "ELF binary");
    let json = serde_json::to_string(&report).expect("serializes");
    assert!(json.contains("\"skipped\""));
    assert!(json.contains("ELF binary"));

    let back: FileReport = serde_json::from_str(&json).expect("deserializes");
    assert_eq!(back.outcome, FileOutcome::Skipped);
  }
}
