//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing; the run logic lives in [`run`].

mod run;

use std::path::PathBuf;

use clap::Parser;
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
pub use run::run;

use crate::logging::ColorMode;

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Add the license header to every supported file under src/
  licenser --license-file LICENSE.txt src/

  # Recurse into nested directories and skip vendored code
  licenser --license-file LICENSE.txt --recurse --prune vendor src/

  # Remove the header again
  licenser --license-file LICENSE.txt --delete src/

  # Report which files carry the header, without writing anything
  licenser --license-file LICENSE.txt --list src/ include/

  # Restrict processing to a glob
  licenser --license-file LICENSE.txt 'src/**/*.py'

  # Save a JSON report of the run
  licenser --license-file LICENSE.txt --report-json report.json src/
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  /// Files, directories, or glob patterns to process
  #[arg(required = true)]
  pub sources: Vec<String>,

  /// License file whose text becomes the header block
  #[arg(long, short = 'l', value_name = "FILE")]
  pub license_file: PathBuf,

  /// Remove the license header instead of adding it
  #[arg(long, short = 'd', group = "mode")]
  pub delete: bool,

  /// List per-file license status without modifying anything
  #[arg(long, short = 'L', group = "mode")]
  pub list: bool,

  /// Recurse into subdirectories of directory sources
  #[arg(long, short = 'r')]
  pub recurse: bool,

  /// Paths to skip: filenames, directories, or glob patterns (repeatable)
  #[arg(long, short = 'p', value_name = "PATTERN")]
  pub prune: Vec<String>,

  /// Path to config file (default: .licenser.toml in the workspace root)
  #[arg(long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Ignore config file even if present
  #[arg(long)]
  pub no_config: bool,

  /// Generate a JSON report of the run and save to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose")]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum
  )]
  pub colors: ColorMode,
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}
