//! # Output Module
//!
//! This module centralizes all user-facing output for the licenser tool.
//! It provides consistent formatting, colors, and symbols for terminal
//! output.
//!
//! ## Design Goals
//!
//! - **Informative**: Show actionable information without requiring flags
//! - **Scannable**: Use formatting to make output easy to parse visually
//! - **Progressive**: More detail with `-v`, silence with `-q`
//! - **Scriptable**: Keep stdout predictable for piping/automation

use std::path::Path;

use owo_colors::{OwoColorize, Stream};

use crate::logging::{is_quiet, is_verbose};
use crate::report::{FileOutcome, FileReport, ProcessingSummary};

/// Symbols used in output
pub mod symbols {
  /// License added/removed successfully
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Failure (read or write error)
  pub const FAILURE: &str = "\u{2717}"; // ✗
  /// Skipped file
  pub const SKIPPED: &str = "-";
}

/// Maximum number of files to show in the default output before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Print the initial "Adding license to N files..." style message.
pub fn print_start_message(file_count: usize, verb: &str) {
  if is_quiet() {
    return;
  }

  let files_word = if file_count == 1 { "file" } else { "files" };
  println!("{} license headers in {} {}...", verb, file_count, files_word);
}

/// Print a blank line for visual separation (respects quiet mode).
pub fn print_blank_line() {
  if !is_quiet() {
    println!();
  }
}

/// Print one category of file reports as a headed, sorted list.
///
/// Shows up to `DEFAULT_FILE_LIST_LIMIT` files; verbose mode shows all. In
/// quiet mode only the bare paths are printed, for scripting.
pub fn print_category(files: &[&FileReport], header_text: &str, symbol: &str, workspace_root: Option<&Path>) {
  if files.is_empty() {
    return;
  }

  let mut sorted_files: Vec<_> = files.to_vec();
  sorted_files.sort_by(|a, b| a.path.cmp(&b.path));

  if is_quiet() {
    for file in &sorted_files {
      println!("{}", make_relative_path(&file.path, workspace_root));
    }
    return;
  }

  let count = sorted_files.len();
  println!(
    "{} {} {} {}:",
    symbol,
    count,
    if count == 1 { "file" } else { "files" },
    header_text
  );

  let show_all = is_verbose();
  let limit = if show_all { count } else { DEFAULT_FILE_LIST_LIMIT };

  for file in sorted_files.iter().take(limit) {
    let display_path = make_relative_path(&file.path, workspace_root);
    match &file.detail {
      Some(detail) => println!("  {} ({})", display_path, detail.if_supports_color(Stream::Stdout, |s| s.dimmed())),
      None => println!("  {}", display_path),
    }
  }

  if !show_all && count > limit {
    let remaining = count - limit;
    println!("  ... and {} more (use -v to see all)", remaining);
  }
}

/// Print the per-category lists for one batch run.
pub fn print_categories(categorized: &CategorizedReports<'_>, workspace_root: Option<&Path>) {
  let green_check = symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()).to_string();
  let red_cross = symbols::FAILURE.if_supports_color(Stream::Stdout, |s| s.red()).to_string();
  let dim_dash = symbols::SKIPPED.if_supports_color(Stream::Stdout, |s| s.dimmed()).to_string();

  let mut printed = false;
  let mut separator = |has_content: bool| {
    if has_content && printed {
      print_blank_line();
    }
    printed = printed || has_content;
  };

  separator(!categorized.added.is_empty());
  print_category(&categorized.added, "licensed", &green_check, workspace_root);

  separator(!categorized.removed.is_empty());
  print_category(&categorized.removed, "unlicensed", &green_check, workspace_root);

  separator(!categorized.already_present.is_empty());
  print_category(
    &categorized.already_present,
    "already carrying the header",
    &green_check,
    workspace_root,
  );

  separator(!categorized.not_present.is_empty());
  print_category(
    &categorized.not_present,
    "without the header",
    &dim_dash,
    workspace_root,
  );

  separator(!categorized.errors.is_empty());
  print_category(&categorized.errors, "failed", &red_cross, workspace_root);

  if is_verbose() {
    separator(!categorized.skipped.is_empty());
    print_category(&categorized.skipped, "skipped", &dim_dash, workspace_root);
  }
}

/// Print the message shown when nothing needed to change.
pub fn print_nothing_to_do() {
  if is_quiet() {
    return;
  }

  println!(
    "{} Nothing to do.",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green())
  );
}

/// Print the processing summary.
///
/// Format: "Summary: X added, Y removed, Z present, ... W skipped"
/// In verbose mode, also shows timing.
pub fn print_summary(summary: &ProcessingSummary) {
  if is_quiet() {
    return;
  }

  let mut parts: Vec<String> = Vec::new();

  let mut push_count = |count: usize, label: &str, highlight: bool| {
    if count == 0 {
      return;
    }
    let value = if highlight {
      count.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
    } else {
      count.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
    };
    parts.push(format!("{} {}", value, label));
  };

  push_count(summary.added, "added", false);
  push_count(summary.removed, "removed", false);
  push_count(summary.already_present, "already present", false);
  push_count(summary.not_present, "not present", false);
  push_count(summary.skipped, "skipped", false);
  push_count(summary.errors, "failed", true);

  if parts.is_empty() {
    parts.push("no files".to_string());
  }

  let mut summary_line = format!("Summary: {}", parts.join(", "));

  // Show timing in verbose mode
  if is_verbose() {
    summary_line.push_str(&format!(" ({:.2}s)", summary.duration_ms as f64 / 1000.0));
  }

  println!("{}", summary_line);
}

/// Categorize file reports into different groups for output.
pub struct CategorizedReports<'a> {
  /// Files that had the license block inserted
  pub added: Vec<&'a FileReport>,
  /// Files that had the license block removed
  pub removed: Vec<&'a FileReport>,
  /// Files already carrying the block (idempotent no-op)
  pub already_present: Vec<&'a FileReport>,
  /// Files without the block (delete/list no-op)
  pub not_present: Vec<&'a FileReport>,
  /// Files skipped (unsupported, binary, symlink)
  pub skipped: Vec<&'a FileReport>,
  /// Files that failed with a read or write error
  pub errors: Vec<&'a FileReport>,
}

impl<'a> CategorizedReports<'a> {
  /// Categorize a slice of file reports.
  pub fn from_reports(reports: &'a [FileReport]) -> Self {
    let mut added = Vec::new();
    let mut removed = Vec::new();
    let mut already_present = Vec::new();
    let mut not_present = Vec::new();
    let mut skipped = Vec::new();
    let mut errors = Vec::new();

    for report in reports {
      match report.outcome {
        FileOutcome::Added => added.push(report),
        FileOutcome::Removed => removed.push(report),
        FileOutcome::AlreadyPresent => already_present.push(report),
        FileOutcome::NotPresent => not_present.push(report),
        FileOutcome::Skipped => skipped.push(report),
        FileOutcome::Error => errors.push(report),
      }
    }

    Self {
      added,
      removed,
      already_present,
      not_present,
      skipped,
      errors,
    }
  }
}

/// Make a path relative to the workspace root for display.
fn make_relative_path(path: &Path, workspace_root: Option<&Path>) -> String {
  if let Some(root) = workspace_root {
    path
      .strip_prefix(root)
      .map(|p| p.to_string_lossy().to_string())
      .unwrap_or_else(|_| path.to_string_lossy().to_string())
  } else {
    path.to_string_lossy().to_string()
  }
}
