//! # Configuration Module
//!
//! Optional configuration for licenser, letting users override or extend the
//! comment-grammar table per extension or per filename.
//!
//! Configuration can be specified in a `.licenser.toml` file or via the
//! `LICENSER_CONFIG` environment variable. The table is loaded and validated
//! exactly once at startup; an internally inconsistent grammar entry (a block
//! grammar missing one of its markers, or an entry with no symbols at all) is
//! a fatal configuration error, never a per-file condition.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use crate::commenter::CommentGrammar;

/// The default config file name.
pub const DEFAULT_CONFIG_FILENAME: &str = ".licenser.toml";

/// Environment variable for specifying config file path.
pub const CONFIG_ENV_VAR: &str = "LICENSER_CONFIG";

/// User-defined comment grammar for one extension or filename.
///
/// A line grammar sets only `prefix`; a block grammar sets `open`, `close`,
/// and optionally `prefix` for the interior lines.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GrammarConfig {
  /// Opening marker line (e.g. `"/*"`). Empty for line grammars.
  #[serde(default)]
  pub open: String,

  /// Per-line prefix (e.g. `"// "` or `" * "`).
  #[serde(default)]
  pub prefix: String,

  /// Closing marker line (e.g. `" */"`). Empty for line grammars.
  #[serde(default)]
  pub close: String,
}

impl GrammarConfig {
  /// Create a line-grammar entry.
  #[allow(dead_code)]
  pub fn line(prefix: &str) -> Self {
    Self {
      open: String::new(),
      prefix: prefix.to_string(),
      close: String::new(),
    }
  }

  /// Create a block-grammar entry.
  #[allow(dead_code)]
  pub fn block(open: &str, prefix: &str, close: &str) -> Self {
    Self {
      open: open.to_string(),
      prefix: prefix.to_string(),
      close: close.to_string(),
    }
  }

  /// Checks the entry for internal consistency.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::MalformedGrammar`] if the entry is a block
  /// grammar missing one of its markers, or a line grammar whose prefix
  /// carries no comment symbol.
  pub fn validate(&self, key: &str) -> Result<(), ConfigError> {
    let has_open = !self.open.trim().is_empty();
    let has_close = !self.close.trim().is_empty();

    if has_open != has_close {
      let missing = if has_open { "close" } else { "open" };
      return Err(ConfigError::MalformedGrammar {
        key: key.to_string(),
        message: format!("block grammar is missing its {missing} marker"),
      });
    }

    if !has_open && self.prefix.trim().is_empty() {
      return Err(ConfigError::MalformedGrammar {
        key: key.to_string(),
        message: "line grammar requires a non-whitespace prefix".to_string(),
      });
    }

    Ok(())
  }

  /// Converts a validated entry into a [`CommentGrammar`].
  pub fn to_grammar(&self) -> CommentGrammar {
    if self.open.trim().is_empty() {
      CommentGrammar::line(&self.prefix)
    } else {
      CommentGrammar::block(&self.open, &self.prefix, &self.close)
    }
  }
}

/// Main configuration struct for licenser.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
  /// Grammar overrides keyed by file extension without the leading dot
  /// (e.g. "java", "xyz").
  #[serde(default)]
  pub grammars: HashMap<String, GrammarConfig>,

  /// Grammar overrides keyed by exact basename (e.g. "Justfile").
  #[serde(default)]
  pub filenames: HashMap<String, GrammarConfig>,
}

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{}': {source}", path.display())]
  ReadError { path: PathBuf, source: std::io::Error },

  /// The config file contains invalid TOML.
  #[error("Failed to parse config file '{}': {source}", path.display())]
  ParseError { path: PathBuf, source: toml::de::Error },

  /// A grammar table entry is internally inconsistent.
  #[error("Malformed grammar for '{key}': {message}")]
  MalformedGrammar { key: String, message: String },
}

impl Config {
  /// Load configuration from a file.
  ///
  /// # Errors
  ///
  /// Returns a [`ConfigError`] if the file cannot be read, parsed, or if any
  /// grammar entry fails validation.
  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadError {
      path: path.to_path_buf(),
      source,
    })?;

    let config: Self = toml::from_str(&content).map_err(|source| ConfigError::ParseError {
      path: path.to_path_buf(),
      source,
    })?;

    config.validate()?;
    Ok(config)
  }

  /// Validates every grammar entry in the table.
  ///
  /// # Errors
  ///
  /// Returns the first [`ConfigError::MalformedGrammar`] found.
  pub fn validate(&self) -> Result<(), ConfigError> {
    for (ext, grammar) in &self.grammars {
      grammar.validate(ext)?;
    }
    for (name, grammar) in &self.filenames {
      grammar.validate(name)?;
    }
    Ok(())
  }
}

/// Load configuration, resolving the file path in precedence order:
/// explicit CLI path, `LICENSER_CONFIG` environment variable, then
/// `.licenser.toml` in the workspace root.
///
/// Returns `Ok(None)` when no config file exists or `no_config` is set.
/// A config file that exists but fails to read, parse, or validate is a
/// startup error.
pub fn load_config(cli_path: Option<&Path>, workspace_root: &Path, no_config: bool) -> Result<Option<Config>> {
  if no_config {
    debug!("Configuration loading disabled by --no-config");
    return Ok(None);
  }

  if let Some(path) = cli_path {
    let config = Config::from_file(path).with_context(|| format!("Failed to load config from {}", path.display()))?;
    return Ok(Some(config));
  }

  if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
    let path = PathBuf::from(env_path);
    let config = Config::from_file(&path)
      .with_context(|| format!("Failed to load config from {} ({})", path.display(), CONFIG_ENV_VAR))?;
    return Ok(Some(config));
  }

  let default_path = workspace_root.join(DEFAULT_CONFIG_FILENAME);
  if default_path.exists() {
    debug!("Loading config from {}", default_path.display());
    let config = Config::from_file(&default_path)
      .with_context(|| format!("Failed to load config from {}", default_path.display()))?;
    return Ok(Some(config));
  }

  Ok(None)
}
