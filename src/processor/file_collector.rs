//! # File Collector Module
//!
//! This module provides utilities for collecting candidate files from the
//! source arguments: file literals, directories, and glob patterns.
//!
//! Directories traverse one level deep by default and fully with
//! `--recurse`. Prune rules remove files that match a glob, carry a pruned
//! basename, or live under a pruned directory. The collector only discovers
//! paths; whether a file is processable is decided later by classification.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::{debug, trace};
use walkdir::WalkDir;

/// Prune rules compiled from `--prune` arguments.
///
/// A pattern with wildcards becomes a glob (matched anywhere in the path); a
/// pattern naming an existing directory prunes everything beneath it; any
/// other pattern prunes by exact path or basename.
pub struct PruneSet {
  glob_set: GlobSet,
  dirs: Vec<PathBuf>,
  names: Vec<String>,
}

impl PruneSet {
  /// Compiles prune patterns.
  ///
  /// # Errors
  ///
  /// Returns an error if a wildcard pattern is not a valid glob.
  pub fn new(patterns: &[String]) -> Result<Self> {
    let mut builder = GlobSetBuilder::new();
    let mut dirs = Vec::new();
    let mut names = Vec::new();

    for pattern in patterns {
      let pattern = pattern.replace('\\', "/");

      if pattern.contains('*') || pattern.contains('?') {
        builder.add(Glob::new(&pattern).with_context(|| format!("Invalid prune pattern: {}", pattern))?);
        // Also match the pattern anywhere in the path, the way users expect
        // "*.json" to apply below the top level too.
        if !pattern.starts_with("**/") {
          builder.add(
            Glob::new(&format!("**/{pattern}")).with_context(|| format!("Invalid prune pattern: {}", pattern))?,
          );
        }
        continue;
      }

      let path = PathBuf::from(&pattern);
      if path.is_dir() {
        dirs.push(path);
      } else {
        names.push(pattern);
      }
    }

    Ok(Self {
      glob_set: builder.build().with_context(|| "Failed to build prune glob set")?,
      dirs,
      names,
    })
  }

  /// Whether a candidate file is excluded by the prune rules.
  pub fn is_pruned(&self, path: &Path) -> bool {
    if self.glob_set.is_match(path) {
      trace!("Pruning: {} (matches prune glob)", path.display());
      return true;
    }

    if self.dirs.iter().any(|dir| path.starts_with(dir)) {
      trace!("Pruning: {} (under pruned directory)", path.display());
      return true;
    }

    let basename = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    if self
      .names
      .iter()
      .any(|name| name == basename || Path::new(name) == path)
    {
      trace!("Pruning: {} (pruned by name)", path.display());
      return true;
    }

    false
  }
}

/// File collector for source-pattern expansion and directory traversal.
pub struct FileCollector {
  prune: PruneSet,
  recurse: bool,
}

impl FileCollector {
  /// Creates a collector with the given prune rules and recursion setting.
  pub const fn new(prune: PruneSet, recurse: bool) -> Self {
    Self { prune, recurse }
  }

  /// Expands the source arguments into a deduplicated, pruned, sorted list
  /// of candidate files.
  ///
  /// Sources may be file literals, directories, or glob patterns. Symlinks
  /// are skipped. A source that names a nonexistent path and is not a valid
  /// glob is an error.
  pub fn collect(&self, sources: &[String]) -> Result<Vec<PathBuf>> {
    let mut all_files = Vec::new();

    for source in sources {
      let path = PathBuf::from(source);
      if path.is_file() {
        all_files.push(path);
      } else if path.is_dir() {
        all_files.extend(self.traverse_directory(&path)?);
      } else {
        let entries = glob::glob(source).with_context(|| format!("Invalid glob pattern: {}", source))?;
        let mut matched = false;

        for entry in entries {
          let entry = entry.with_context(|| format!("Error expanding glob: {}", source))?;
          matched = true;
          if entry.is_file() {
            all_files.push(entry);
          } else if entry.is_dir() {
            all_files.extend(self.traverse_directory(&entry)?);
          }
        }

        if !matched && !source.contains('*') && !source.contains('?') {
          anyhow::bail!("Source path does not exist: {}", source);
        }
      }
    }

    // Deduplicate so overlapping sources ("src" and "src/main.rs") cannot
    // dispatch the same file to two workers.
    let unique: HashSet<PathBuf> = all_files.into_iter().collect();

    let mut files: Vec<PathBuf> = unique
      .into_iter()
      .filter(|path| !self.prune.is_pruned(path))
      .collect();
    files.sort();

    debug!("Collected {} candidate files", files.len());
    Ok(files)
  }

  /// Walks a directory, one level deep by default or fully with recursion
  /// enabled, collecting regular files. Symlinks are not followed.
  fn traverse_directory(&self, dir: &Path) -> Result<Vec<PathBuf>> {
    let max_depth = if self.recurse { usize::MAX } else { 1 };
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).max_depth(max_depth).follow_links(false) {
      let entry = match entry {
        Ok(entry) => entry,
        Err(e) => {
          eprintln!("Error reading directory entry under {}: {}", dir.display(), e);
          continue;
        }
      };

      if entry.file_type().is_file() {
        files.push(entry.into_path());
      }
    }

    Ok(files)
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::*;

  fn touch(path: &Path) {
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).expect("mkdir");
    }
    fs::write(path, "content\n").expect("write");
  }

  fn collect_names(files: &[PathBuf]) -> Vec<String> {
    files
      .iter()
      .map(|p| p.file_name().expect("name").to_string_lossy().to_string())
      .collect()
  }

  #[test]
  fn test_collect_file_literals_and_dedup() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let file = dir.path().join("a.rs");
    touch(&file);

    let collector = FileCollector::new(PruneSet::new(&[])?, false);
    let sources = vec![
      file.to_string_lossy().to_string(),
      file.to_string_lossy().to_string(),
      dir.path().to_string_lossy().to_string(),
    ];

    let files = collector.collect(&sources)?;
    assert_eq!(files.len(), 1);
    Ok(())
  }

  #[test]
  fn test_collect_directory_is_shallow_by_default() -> Result<()> {
    let dir = tempfile::tempdir()?;
    touch(&dir.path().join("top.rs"));
    touch(&dir.path().join("nested/deep.rs"));

    let collector = FileCollector::new(PruneSet::new(&[])?, false);
    let files = collector.collect(&[dir.path().to_string_lossy().to_string()])?;
    assert_eq!(collect_names(&files), vec!["top.rs"]);
    Ok(())
  }

  #[test]
  fn test_collect_directory_recursive() -> Result<()> {
    let dir = tempfile::tempdir()?;
    touch(&dir.path().join("top.rs"));
    touch(&dir.path().join("nested/deep.rs"));

    let collector = FileCollector::new(PruneSet::new(&[])?, true);
    let files = collector.collect(&[dir.path().to_string_lossy().to_string()])?;
    assert_eq!(files.len(), 2);
    Ok(())
  }

  #[test]
  fn test_collect_glob_pattern() -> Result<()> {
    let dir = tempfile::tempdir()?;
    touch(&dir.path().join("a.py"));
    touch(&dir.path().join("b.py"));
    touch(&dir.path().join("c.rs"));

    let collector = FileCollector::new(PruneSet::new(&[])?, false);
    let pattern = dir.path().join("*.py").to_string_lossy().to_string();
    let files = collector.collect(&[pattern])?;
    assert_eq!(collect_names(&files), vec!["a.py", "b.py"]);
    Ok(())
  }

  #[test]
  fn test_collect_missing_source_is_error() -> Result<()> {
    let collector = FileCollector::new(PruneSet::new(&[])?, false);
    let result = collector.collect(&["/nonexistent/definitely_missing.rs".to_string()]);
    assert!(result.is_err());
    Ok(())
  }

  #[test]
  fn test_prune_by_glob() -> Result<()> {
    let dir = tempfile::tempdir()?;
    touch(&dir.path().join("keep.rs"));
    touch(&dir.path().join("drop.json"));

    let prune = PruneSet::new(&["*.json".to_string()])?;
    let collector = FileCollector::new(prune, false);
    let files = collector.collect(&[dir.path().to_string_lossy().to_string()])?;
    assert_eq!(collect_names(&files), vec!["keep.rs"]);
    Ok(())
  }

  #[test]
  fn test_prune_by_directory() -> Result<()> {
    let dir = tempfile::tempdir()?;
    touch(&dir.path().join("src/keep.rs"));
    touch(&dir.path().join("vendor/drop.rs"));

    let prune = PruneSet::new(&[dir.path().join("vendor").to_string_lossy().to_string()])?;
    let collector = FileCollector::new(prune, true);
    let files = collector.collect(&[dir.path().to_string_lossy().to_string()])?;
    assert_eq!(collect_names(&files), vec!["keep.rs"]);
    Ok(())
  }

  #[test]
  fn test_prune_by_basename() -> Result<()> {
    let dir = tempfile::tempdir()?;
    touch(&dir.path().join("main.rs"));
    touch(&dir.path().join("generated.rs"));

    let prune = PruneSet::new(&["generated.rs".to_string()])?;
    let collector = FileCollector::new(prune, false);
    let files = collector.collect(&[dir.path().to_string_lossy().to_string()])?;
    assert_eq!(collect_names(&files), vec!["main.rs"]);
    Ok(())
  }
}
