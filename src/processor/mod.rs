//! # Processor Module
//!
//! This module contains the core functionality for processing files:
//! classifying each candidate, rendering the license for its grammar,
//! locating an existing block near the placement anchor, and applying the
//! requested operation.
//!
//! The module is organized into several submodules:
//! - [`file_io`] - Bounded reads and atomic file replacement
//! - [`file_collector`] - Source expansion, prune rules, and traversal
//!
//! The [`Licenser`] struct is the main entry point, driving the per-file
//! state machine: Classify → Render → Locate → Act. Every file ends in
//! exactly one [`FileOutcome`]; per-file I/O failures are recorded against
//! that file and never abort the batch.

mod file_collector;
mod file_io;

use std::ops::Range;
use std::path::{Path, PathBuf};

use anyhow::Result;
pub use file_collector::{FileCollector, PruneSet};
pub use file_io::{FileIO, PREFIX_READ_LIMIT};
use rayon::prelude::*;
use tracing::{debug, trace};

use crate::commenter::{self, CommentGrammar, LicenseBlock};
use crate::file_types::{FileType, Identification, TypeRegistry};
use crate::info_log;
use crate::report::{FileOutcome, FileReport};

/// The requested per-file operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
  /// Insert the license block where absent.
  Add,
  /// Remove the license block where present.
  Delete,
  /// Report presence without ever writing.
  List,
}

impl Operation {
  /// Verb used in progress messages.
  pub const fn verb(self) -> &'static str {
    match self {
      Operation::Add => "Adding",
      Operation::Delete => "Removing",
      Operation::List => "Listing",
    }
  }
}

/// Configuration for creating a [`Licenser`] instance.
pub struct LicenserConfig {
  /// The immutable file-type table, with any user overrides merged in.
  pub registry: TypeRegistry,
  /// Raw license text, treated as an opaque sequence of lines.
  pub license_text: String,
  /// The operation applied to every file.
  pub operation: Operation,
  /// Prune patterns excluding files from discovery.
  pub prune_patterns: Vec<String>,
  /// Whether directory sources are traversed recursively.
  pub recurse: bool,
}

/// Maximum number of blank lines tolerated between the placement anchor and
/// the start of an existing license block. Bounds the presence scan so
/// incidental comment text deep in a file can never false-positive.
const MAX_LEADING_BLANKS: usize = 2;

/// The per-file add/remove/detect state machine.
///
/// The `Licenser` is responsible for:
/// - Expanding source patterns into candidate files
/// - Classifying each file into a type with a comment grammar
/// - Rendering the license text under that grammar
/// - Locating an existing block with tolerant matching
/// - Inserting or removing the block, writing atomically
/// - Collecting one [`FileReport`] per file
pub struct Licenser {
  registry: TypeRegistry,

  /// Raw license text, rendered per grammar.
  license_text: String,

  /// Canonical form of the license text, compared against stripped
  /// candidates during location.
  canonical_license: String,

  operation: Operation,

  file_collector: FileCollector,
}

impl Licenser {
  /// Batch size for parallel processing.
  const BATCH_SIZE: usize = 8;

  /// Creates a new licenser with the specified configuration.
  ///
  /// # Errors
  ///
  /// Returns an error if the license text is empty or a prune pattern is
  /// not a valid glob.
  pub fn new(config: LicenserConfig) -> Result<Self> {
    let canonical_license = commenter::canonicalize(&config.license_text);
    if canonical_license.is_empty() {
      anyhow::bail!("License text is empty");
    }

    let prune = PruneSet::new(&config.prune_patterns)?;
    let file_collector = FileCollector::new(prune, config.recurse);

    Ok(Self {
      registry: config.registry,
      license_text: config.license_text,
      canonical_license,
      operation: config.operation,
      file_collector,
    })
  }

  /// Expands the source arguments into the candidate file list without
  /// processing anything.
  pub fn collect(&self, sources: &[String]) -> Result<Vec<PathBuf>> {
    self.file_collector.collect(sources)
  }

  /// Processes all files named by the source arguments.
  ///
  /// Returns one report per candidate file. Per-file read/write failures
  /// are recorded as [`FileOutcome::Error`] reports; only discovery-level
  /// problems (an invalid glob, a nonexistent source) abort the run.
  pub fn process(&self, sources: &[String]) -> Result<Vec<FileReport>> {
    let files = self.collect(sources)?;
    Ok(self.process_collected(files))
  }

  /// Processes a pre-collected candidate list in parallel batches.
  ///
  /// Use this after [`collect`](Self::collect) to avoid expanding the
  /// sources twice.
  pub fn process_collected(&self, files: Vec<PathBuf>) -> Vec<FileReport> {
    if files.is_empty() {
      debug!("No files to process");
      return Vec::new();
    }

    // Symlinks are never followed; report them as skipped up front.
    let mut reports = Vec::with_capacity(files.len());
    let mut to_process = Vec::with_capacity(files.len());
    for path in files {
      match std::fs::symlink_metadata(&path) {
        Ok(metadata) if metadata.file_type().is_symlink() => {
          trace!("Skipping: {} (symlink)", path.display());
          reports.push(FileReport::skipped(path, "symlink"));
        }
        Ok(_) => to_process.push(path),
        Err(e) => reports.push(FileReport::error(path, format!("cannot stat file: {e}"))),
      }
    }

    let files_len = to_process.len();
    debug!("Processing {} files in batches of {}", files_len, Self::BATCH_SIZE);

    let batches: Vec<Vec<PathBuf>> = to_process.chunks(Self::BATCH_SIZE).map(<[PathBuf]>::to_vec).collect();

    // Each batch accumulates its reports locally; merging afterwards is the
    // thread-safe reduction.
    let batch_reports: Vec<Vec<FileReport>> = batches
      .into_par_iter()
      .map(|batch| self.process_file_batch(batch))
      .collect();

    for batch in batch_reports {
      reports.extend(batch);
    }

    reports
  }

  /// Process a batch of files, collecting reports locally.
  fn process_file_batch(&self, files: Vec<PathBuf>) -> Vec<FileReport> {
    files.into_iter().map(|path| self.process_single_file(path)).collect()
  }

  /// Runs the state machine on one file, folding any I/O failure into an
  /// `Error` report rather than propagating it.
  fn process_single_file(&self, path: PathBuf) -> FileReport {
    match self.run_state_machine(&path) {
      Ok(report) => report,
      Err(e) => FileReport::error(path, format!("{e:#}")),
    }
  }

  /// Classify → Render → Locate → Act, for one file.
  fn run_state_machine(&self, path: &Path) -> Result<FileReport> {
    let (prefix_bytes, prefix_content, file_len) = FileIO::read_prefix(path)?;

    let file_type = match self.registry.identify(path, &prefix_bytes) {
      Identification::Supported(file_type) => file_type,
      Identification::Binary(signature) => {
        trace!("Skipping: {} ({})", path.display(), signature);
        return Ok(FileReport::skipped(path.to_path_buf(), signature));
      }
      Identification::Unknown => {
        trace!("Skipping: {} (unsupported file type)", path.display());
        return Ok(FileReport::skipped(path.to_path_buf(), "unsupported file type"));
      }
    };

    let block = commenter::render(&self.license_text, &file_type.grammar);

    // Listing only needs the bounded prefix; a rewrite needs the whole file.
    let prefix_covers_file = prefix_bytes.len() as u64 >= file_len;
    let content = if self.operation == Operation::List || prefix_covers_file {
      prefix_content
    } else {
      FileIO::read_full_content(path)?
    };

    let line_ending = if content.contains("\r\n") { "\r\n" } else { "\n" };
    let had_trailing_newline = content.is_empty() || content.ends_with('\n');
    let lines: Vec<&str> = content.lines().collect();

    let anchor = placement_anchor(&lines, file_type);
    let located = locate_block(&lines, anchor, &block, &file_type.grammar, &self.canonical_license);

    let outcome = match (self.operation, located) {
      (Operation::Add, Some(_)) => FileOutcome::AlreadyPresent,
      (Operation::Add, None) => {
        let new_content = insert_block(&lines, anchor, &block, line_ending, had_trailing_newline);
        FileIO::write_atomic(path, &new_content)?;
        info_log!("Added license to: {}", path.display());
        FileOutcome::Added
      }
      (Operation::Delete, Some(range)) => {
        let new_content = remove_block(&lines, range, line_ending, had_trailing_newline);
        FileIO::write_atomic(path, &new_content)?;
        info_log!("Removed license from: {}", path.display());
        FileOutcome::Removed
      }
      (Operation::Delete, None) => FileOutcome::NotPresent,
      (Operation::List, Some(_)) => FileOutcome::AlreadyPresent,
      (Operation::List, None) => FileOutcome::NotPresent,
    };

    Ok(FileReport::new(path.to_path_buf(), outcome))
  }
}

/// Computes the line index after which the license block belongs.
///
/// Line 0 by default; after the shebang when one is present, and after the
/// encoding declaration too for types with the two-line directive
/// convention. Markup declarations (`<?xml`, `<!doctype`) anchor the same
/// way as a shebang.
fn placement_anchor(lines: &[&str], file_type: &FileType) -> usize {
  let Some(first) = lines.first() else {
    return 0;
  };

  if first.starts_with("#!") {
    if file_type.two_line_directive
      && let Some(second) = lines.get(1)
      && is_encoding_directive(second)
    {
      return 2;
    }
    return 1;
  }

  let lowered = first.trim_start().to_lowercase();
  if lowered.starts_with("<?xml") || lowered.starts_with("<!doctype") {
    return 1;
  }

  0
}

/// Recognizes the second-line directives that must stay glued to the
/// shebang: encoding declarations and interpreter instructions.
fn is_encoding_directive(line: &str) -> bool {
  let line = line.trim_start();
  line.starts_with("# -*-")
    || line.starts_with("# coding:")
    || line.starts_with("# encoding:")
    || line.starts_with("# frozen_string_literal:")
}

/// Scans a bounded window at the anchor for a contiguous run of lines that
/// strips back to the license text under this grammar.
///
/// Only blank lines may sit between the anchor and the block; the first
/// non-blank run either is the block or the block is absent. This keeps the
/// scan cheap and immune to incidental comment text deeper in the file.
fn locate_block(
  lines: &[&str],
  anchor: usize,
  block: &LicenseBlock,
  grammar: &CommentGrammar,
  canonical_license: &str,
) -> Option<Range<usize>> {
  if block.is_empty() {
    return None;
  }

  let len = block.len();
  let mut start = anchor;

  loop {
    if start + len <= lines.len()
      && let Some(text) = commenter::strip(&lines[start..start + len], grammar)
      && text == canonical_license
    {
      return Some(start..start + len);
    }

    if start >= anchor + MAX_LEADING_BLANKS {
      return None;
    }
    match lines.get(start) {
      Some(line) if line.trim().is_empty() => start += 1,
      _ => return None,
    }
  }
}

/// Rebuilds file content with the block inserted at the anchor, followed by
/// a single blank separator line when further content follows.
fn insert_block(lines: &[&str], anchor: usize, block: &LicenseBlock, line_ending: &str, trailing_newline: bool) -> String {
  let mut out: Vec<&str> = Vec::with_capacity(lines.len() + block.len() + 1);
  out.extend(&lines[..anchor]);
  out.extend(block.lines());

  let rest = &lines[anchor..];
  if !rest.is_empty() {
    out.push("");
    out.extend(rest);
  }

  join_lines(&out, line_ending, trailing_newline)
}

/// Rebuilds file content with the located block removed, along with at most
/// one directly following blank line (the separator introduced at
/// add-time).
fn remove_block(lines: &[&str], range: Range<usize>, line_ending: &str, trailing_newline: bool) -> String {
  let mut out: Vec<&str> = Vec::with_capacity(lines.len());
  out.extend(&lines[..range.start]);

  let mut rest_start = range.end;
  if lines.get(rest_start).is_some_and(|line| line.trim().is_empty()) {
    rest_start += 1;
  }
  out.extend(&lines[rest_start..]);

  join_lines(&out, line_ending, trailing_newline)
}

fn join_lines(lines: &[&str], line_ending: &str, trailing_newline: bool) -> String {
  if lines.is_empty() {
    return String::new();
  }

  let mut content = lines.join(line_ending);
  if trailing_newline {
    content.push_str(line_ending);
  }
  content
}
