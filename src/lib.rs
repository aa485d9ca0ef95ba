//! # licenser
//!
//! A tool that inserts, removes, or detects license header blocks in source
//! files across heterogeneous programming languages.
//!
//! `licenser` modifies source files in place and is idempotent by
//! construction: repeated application never duplicates or corrupts a header,
//! and an add followed by a delete restores the original file. Each language
//! is modeled by a comment grammar (a repeated line prefix like `# ...` or
//! `// ...`, or an enclosing block like `/* ... */`), and presence detection
//! uses tolerant matching that survives whitespace drift but never crosses
//! comment symbols.
//!
//! ## Features
//!
//! * Add, remove, or list license headers across a set of files, directories,
//!   and glob patterns
//! * File-type detection by filename rule, shebang interpreter, extension,
//!   and magic-number signature (binaries are skipped, not corrupted)
//! * Shebang-aware placement: the header lands after interpreter-directive
//!   lines, never before them
//! * Prune rules to exclude vendored or generated paths from a scan
//! * Atomic file replacement, so an interrupted run never truncates a file
//! * Grammar overrides per extension or filename via `.licenser.toml`
//!
//! ## Usage as a Library
//!
//! This crate can be used as a library in your Rust projects:
//!
//! ```rust,no_run
//! use licenser::file_types::TypeRegistry;
//! use licenser::processor::{Licenser, LicenserConfig, Operation};
//!
//! fn main() -> anyhow::Result<()> {
//!     let licenser = Licenser::new(LicenserConfig {
//!         registry: TypeRegistry::builtin(),
//!         license_text: "Copyright 2026 ACME".to_string(),
//!         operation: Operation::Add,
//!         prune_patterns: vec![],
//!         recurse: true,
//!     })?;
//!
//!     let reports = licenser.process(&["src".to_string()])?;
//!
//!     for report in &reports {
//!         println!("{}: {}", report.path.display(), report.outcome);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`commenter`] - Comment grammars and the render/strip transform
//! * [`file_types`] - File classification into grammar-carrying types
//! * [`processor`] - The per-file add/remove/detect state machine
//! * [`config`] - Grammar overrides from `.licenser.toml`
//! * [`logging`] - Logging utilities for verbose output
//!
//! [`commenter`]: crate::commenter
//! [`file_types`]: crate::file_types
//! [`processor`]: crate::processor
//! [`config`]: crate::config
//! [`logging`]: crate::logging

// Re-export modules for public API
pub mod cli;
pub mod commenter;
pub mod config;
pub mod file_types;
pub mod logging;
pub mod output;
pub mod processor;
pub mod report;

// Note: the logging macros (info_log!, verbose_log!) are exported from the
// crate root by #[macro_export] in the logging module.
