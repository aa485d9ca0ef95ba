//! # Run Command
//!
//! Wires the parsed CLI arguments to the processor: logging setup, config
//! loading, license loading, file processing, terminal output, and the
//! optional JSON report. Exit status distinguishes failed files from
//! skipped ones: only `Error`-category files make the run exit non-zero.

use std::process;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::debug;

use crate::cli::Cli;
use crate::config::load_config;
use crate::file_types::TypeRegistry;
use crate::info_log;
use crate::logging::{init_tracing, set_quiet, set_verbose};
use crate::output::{CategorizedReports, print_blank_line, print_categories, print_nothing_to_do, print_start_message, print_summary};
use crate::processor::{Licenser, LicenserConfig, Operation};
use crate::report::{ProcessingSummary, write_json_report};

/// Run the licenser with the given arguments.
pub fn run(args: Cli) -> Result<()> {
  // Initialize tracing subscriber for structured logging
  init_tracing(args.quiet, args.verbose);

  // Set verbose mode for output formatting and info_log! macro
  if args.verbose > 0 {
    set_verbose();
  } else if args.quiet {
    set_quiet();
  }
  args.colors.apply();

  let operation = if args.delete {
    Operation::Delete
  } else if args.list {
    Operation::List
  } else {
    Operation::Add
  };

  // The invocation directory is the workspace root: config discovery and
  // display-path relativization both anchor here.
  let workspace_root = std::env::current_dir().with_context(|| "Failed to get current directory")?;
  debug!("Using workspace root: {}", workspace_root.display());

  // Load configuration if present; grammar-table defects are fatal here,
  // before any file is touched.
  let config = load_config(args.config.as_deref(), &workspace_root, args.no_config)?;
  let registry = match &config {
    Some(config) => {
      debug!("Using configuration file for grammar overrides");
      TypeRegistry::with_config(config)
    }
    None => TypeRegistry::builtin(),
  };

  let license_text = std::fs::read_to_string(&args.license_file)
    .with_context(|| format!("Failed to read license file: {}", args.license_file.display()))?;

  let licenser = Licenser::new(LicenserConfig {
    registry,
    license_text,
    operation,
    prune_patterns: args.prune,
    recurse: args.recurse,
  })?;

  let files = licenser.collect(&args.sources)?;
  print_start_message(files.len(), operation.verb());

  if files.is_empty() {
    print_blank_line();
    print_nothing_to_do();
    return Ok(());
  }

  let start_time = Instant::now();
  let file_reports = licenser.process_collected(files);
  let elapsed = start_time.elapsed();

  let summary = ProcessingSummary::from_reports(&file_reports, elapsed);
  let categorized = CategorizedReports::from_reports(&file_reports);

  print_blank_line();
  print_categories(&categorized, Some(&workspace_root));
  print_blank_line();
  print_summary(&summary);

  if let Some(ref output_path) = args.report_json {
    if let Err(e) = write_json_report(output_path, &file_reports, &summary) {
      eprintln!("Error generating JSON report: {}", e);
    } else {
      info_log!("Generated JSON report at {}", output_path.display());
    }
  }

  // Failed files make the run fail; skipped files never do.
  if summary.has_errors() {
    process::exit(1);
  }

  Ok(())
}
