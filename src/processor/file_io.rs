//! # File I/O Module
//!
//! This module provides file reading and writing utilities for the
//! processor. Reads are bounded where possible (classification and presence
//! detection only need the start of the file); writes are atomic via
//! write-to-temporary-then-rename so an interrupted run never leaves a
//! truncated file behind.

use std::io::{Read as _, Write as _};
use std::path::Path;

use anyhow::{Context, Result};

/// Maximum number of bytes read when classifying a file and checking for an
/// existing license block. 8KB is sufficient for any realistic header.
pub const PREFIX_READ_LIMIT: usize = 8 * 1024;

/// File I/O operations for the processor.
///
/// This struct provides static methods for reading and writing files.
pub struct FileIO;

impl FileIO {
  /// Reads the initial portion of a file for classification and license
  /// detection.
  ///
  /// This method reads up to [`PREFIX_READ_LIMIT`] bytes from the start of
  /// the file. The raw bytes feed the magic-number and shebang checks; the
  /// UTF-8 view (truncated at the last valid character on invalid input)
  /// feeds the presence scan.
  ///
  /// Returns `(prefix_bytes, prefix_content, file_length)` so the caller can
  /// tell whether the prefix already covers the whole file.
  pub fn read_prefix(path: &Path) -> Result<(Vec<u8>, String, u64)> {
    let mut file = std::fs::File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;

    let file_len = file.metadata().map(|m| m.len()).unwrap_or(0);

    let mut buf = vec![0u8; PREFIX_READ_LIMIT];
    let read_len = file
      .read(&mut buf)
      .with_context(|| format!("Failed to read file: {}", path.display()))?;
    buf.truncate(read_len);

    let prefix_content = match std::str::from_utf8(&buf) {
      Ok(prefix) => prefix.to_string(),
      Err(e) => {
        let valid_up_to = e.valid_up_to();
        String::from_utf8_lossy(&buf[..valid_up_to]).to_string()
      }
    };

    Ok((buf, prefix_content, file_len))
  }

  /// Read full file content.
  pub fn read_full_content(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path.display()))
  }

  /// Write file content atomically.
  ///
  /// The content goes to a temporary file in the same directory, which is
  /// then renamed over the target. A crash mid-write leaves the original
  /// file untouched; the file is never observable in a half-written state.
  /// The original file's permissions are preserved across the replace.
  pub fn write_atomic(path: &Path, content: &str) -> Result<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));

    let mut temp = tempfile::NamedTempFile::new_in(parent)
      .with_context(|| format!("Failed to create temporary file in {}", parent.display()))?;

    temp
      .write_all(content.as_bytes())
      .with_context(|| format!("Failed to write file: {}", path.display()))?;
    temp
      .flush()
      .with_context(|| format!("Failed to flush file: {}", path.display()))?;

    // Carry the target's permissions over; the temp file defaults to 0600.
    if let Ok(metadata) = std::fs::metadata(path) {
      std::fs::set_permissions(temp.path(), metadata.permissions())
        .with_context(|| format!("Failed to set permissions on {}", path.display()))?;
    }

    temp
      .persist(path)
      .with_context(|| format!("Failed to replace file: {}", path.display()))?;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_read_prefix_small_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("small.txt");
    std::fs::write(&path, "hello\n")?;

    let (bytes, content, len) = FileIO::read_prefix(&path)?;
    assert_eq!(bytes, b"hello\n");
    assert_eq!(content, "hello\n");
    assert_eq!(len, 6);
    Ok(())
  }

  #[test]
  fn test_read_prefix_is_bounded() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("big.txt");
    std::fs::write(&path, "x".repeat(PREFIX_READ_LIMIT * 2))?;

    let (bytes, _, len) = FileIO::read_prefix(&path)?;
    assert_eq!(bytes.len(), PREFIX_READ_LIMIT);
    assert_eq!(len, (PREFIX_READ_LIMIT * 2) as u64);
    Ok(())
  }

  #[test]
  fn test_read_prefix_truncates_invalid_utf8() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("mixed.bin");
    std::fs::write(&path, [b'o', b'k', 0xff, 0xfe])?;

    let (bytes, content, _) = FileIO::read_prefix(&path)?;
    assert_eq!(bytes.len(), 4);
    assert_eq!(content, "ok");
    Ok(())
  }

  #[test]
  fn test_write_atomic_replaces_content() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("file.txt");
    std::fs::write(&path, "old")?;

    FileIO::write_atomic(&path, "new")?;
    assert_eq!(std::fs::read_to_string(&path)?, "new");
    Ok(())
  }

  #[test]
  fn test_write_atomic_creates_missing_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("fresh.txt");

    FileIO::write_atomic(&path, "content")?;
    assert_eq!(std::fs::read_to_string(&path)?, "content");
    Ok(())
  }

  #[cfg(unix)]
  #[test]
  fn test_write_atomic_preserves_permissions() -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("script.sh");
    std::fs::write(&path, "#!/bin/sh\n")?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;

    FileIO::write_atomic(&path, "#!/bin/sh\necho hi\n")?;
    let mode = std::fs::metadata(&path)?.permissions().mode() & 0o777;
    assert_eq!(mode, 0o755);
    Ok(())
  }
}
