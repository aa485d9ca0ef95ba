//! # licenser
//!
//! A tool that inserts, removes, or detects license header blocks in source
//! files.

use anyhow::Result;
use licenser::cli::{Cli, run};

fn main() -> Result<()> {
  let cli = Cli::parse_args();
  run(cli)
}
