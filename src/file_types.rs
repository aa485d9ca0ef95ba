//! # File Types Module
//!
//! Classification of a file path (and a bounded byte prefix) into a
//! [`FileType`] carrying the comment grammar for that language.
//!
//! Resolution order, first match wins:
//! 1. exact basename rule (`Makefile`, `Dockerfile`, ...),
//! 2. shebang interpreter name,
//! 3. file extension,
//! 4. magic-number signature (binary formats, which are skipped rather than
//!    commented).
//!
//! The shebang check outranks the extension because scripts are frequently
//! extensionless or mis-tagged. Classification never reads more than the
//! bounded prefix handed to it; no file I/O happens in this module.

use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::commenter::CommentGrammar;
use crate::config::Config;

/// An immutable identifier for a language/format, plus the signals used to
/// recognize it and the grammar used to comment it.
///
/// Every entry carries at least one of {extension, filename rule,
/// interpreter name}.
#[derive(Debug, Clone)]
pub struct FileType {
  /// Short token naming the type, e.g. `"python"`.
  pub name: String,

  /// Recognized extensions, lowercase, without the leading dot.
  pub extensions: Vec<String>,

  /// Exact basenames (lowercase) recognized regardless of extension.
  pub filenames: Vec<String>,

  /// Interpreter basenames recognized in a shebang line, version suffix
  /// stripped (`python3.11` matches `python`).
  pub interpreters: Vec<String>,

  /// How this language comments text.
  pub grammar: CommentGrammar,

  /// Whether the shebang may be followed by a second directive line (an
  /// encoding or interpreter-instruction comment), as in Python and Ruby.
  pub two_line_directive: bool,
}

impl FileType {
  fn new(name: &str, extensions: &[&str], grammar: CommentGrammar) -> Self {
    Self {
      name: name.to_string(),
      extensions: extensions.iter().map(|e| e.to_string()).collect(),
      filenames: Vec::new(),
      interpreters: Vec::new(),
      grammar,
      two_line_directive: false,
    }
  }

  fn with_filenames(mut self, filenames: &[&str]) -> Self {
    self.filenames = filenames.iter().map(|f| f.to_lowercase()).collect();
    self
  }

  fn with_interpreters(mut self, interpreters: &[&str]) -> Self {
    self.interpreters = interpreters.iter().map(|i| i.to_string()).collect();
    self
  }

  fn with_two_line_directive(mut self) -> Self {
    self.two_line_directive = true;
    self
  }
}

/// Result of classifying one file.
#[derive(Debug, Clone)]
pub enum Identification<'a> {
  /// A supported language with a comment grammar.
  Supported(&'a FileType),
  /// A known binary format, named by its signature. Skipped, never
  /// commented.
  Binary(&'static str),
  /// Nothing matched.
  Unknown,
}

/// Known binary signatures, matched against the start of the byte prefix.
/// These identify compiled or container formats that must be skipped.
const MAGIC_SIGNATURES: &[(&[u8], &str)] = &[
  (b"\x7fELF", "ELF binary"),
  (b"\x89PNG\r\n\x1a\n", "PNG image"),
  (b"\xff\xd8\xff", "JPEG image"),
  (b"GIF8", "GIF image"),
  (b"\x1f\x8b", "gzip archive"),
  (b"PK\x03\x04", "ZIP archive"),
  (b"%PDF-", "PDF document"),
];

/// The immutable table of known file types.
///
/// Constructed once at process start (optionally merged with user
/// configuration) and passed explicitly to whoever classifies files; there is
/// no ambient global table.
pub struct TypeRegistry {
  types: Vec<FileType>,
}

impl TypeRegistry {
  /// Builds the built-in table.
  pub fn builtin() -> Self {
    let types = vec![
      FileType::new("c", &["c", "h"], CommentGrammar::line("// ")),
      FileType::new("c++", &["cc", "cpp", "cxx", "hh", "hpp"], CommentGrammar::line("// ")),
      FileType::new("rust", &["rs"], CommentGrammar::line("// ")),
      FileType::new("go", &["go"], CommentGrammar::line("// ")),
      FileType::new("python", &["py"], CommentGrammar::line("# "))
        .with_interpreters(&["python"])
        .with_two_line_directive(),
      FileType::new("shell", &["sh", "bash", "zsh"], CommentGrammar::line("# "))
        .with_interpreters(&["sh", "bash", "zsh", "dash", "ksh"]),
      FileType::new("ruby", &["rb"], CommentGrammar::line("# "))
        .with_interpreters(&["ruby"])
        .with_two_line_directive(),
      FileType::new("javascript", &["js", "mjs", "cjs", "jsx"], CommentGrammar::line("// "))
        .with_interpreters(&["node"]),
      FileType::new("typescript", &["ts", "tsx"], CommentGrammar::line("// ")),
      FileType::new("java", &["java"], CommentGrammar::block("/*", " * ", " */")),
      FileType::new("css", &["css", "scss"], CommentGrammar::block("/*", " * ", " */")),
      FileType::new("yaml", &["yaml", "yml"], CommentGrammar::line("# ")),
      FileType::new("toml", &["toml"], CommentGrammar::line("# ")),
      FileType::new("text", &["txt"], CommentGrammar::line("# ")),
      FileType::new("markdown", &["md", "markdown"], CommentGrammar::block("<!--", " ", "-->")),
      FileType::new("html", &["html", "htm"], CommentGrammar::block("<!--", " ", "-->")),
      FileType::new("xml", &["xml", "svg"], CommentGrammar::block("<!--", " ", "-->")),
      FileType::new("makefile", &["mk"], CommentGrammar::line("# ")).with_filenames(&[
        "makefile",
        "gnumakefile",
        "justfile",
      ]),
      FileType::new("dockerfile", &[], CommentGrammar::line("# ")).with_filenames(&["dockerfile"]),
      FileType::new("cmake", &["cmake"], CommentGrammar::line("# ")).with_filenames(&["cmakelists.txt"]),
    ];

    Self { types }
  }

  /// Builds the table with user configuration merged in.
  ///
  /// Extension overrides replace the grammar of the built-in type owning that
  /// extension, or add a new single-extension type when no built-in claims
  /// it. Filename overrides work the same way against the basename rules.
  /// The config is expected to be validated already; see
  /// [`Config::validate`].
  pub fn with_config(config: &Config) -> Self {
    let mut registry = Self::builtin();

    for (ext, grammar_config) in &config.grammars {
      let ext = ext.to_lowercase();
      let grammar = grammar_config.to_grammar();
      if let Some(index) = registry.types.iter().position(|t| t.extensions.iter().any(|e| *e == ext)) {
        registry.types[index].grammar = grammar;
      } else {
        registry
          .types
          .push(FileType::new(&format!("custom-{ext}"), &[ext.as_str()], grammar));
      }
    }

    for (name, grammar_config) in &config.filenames {
      let name = name.to_lowercase();
      let grammar = grammar_config.to_grammar();
      if let Some(index) = registry.types.iter().position(|t| t.filenames.iter().any(|f| *f == name)) {
        registry.types[index].grammar = grammar;
      } else {
        registry
          .types
          .push(FileType::new(&format!("custom-{name}"), &[], grammar).with_filenames(&[name.as_str()]));
      }
    }

    registry
  }

  /// Classifies a file from its path and a bounded byte prefix.
  ///
  /// `prefix` is whatever bounded amount the caller read from the start of
  /// the file; it is used for the shebang and magic-number checks only.
  pub fn identify(&self, path: &Path, prefix: &[u8]) -> Identification<'_> {
    let basename = path
      .file_name()
      .and_then(|name| name.to_str())
      .unwrap_or("")
      .to_lowercase();

    // 1. Exact basename rule (extensionless conventional files).
    if let Some(file_type) = self.types.iter().find(|t| t.filenames.iter().any(|f| *f == basename)) {
      return Identification::Supported(file_type);
    }

    // 2. Shebang interpreter.
    if let Some(interpreter) = interpreter_from_prefix(prefix)
      && let Some(file_type) = self
        .types
        .iter()
        .find(|t| t.interpreters.iter().any(|i| *i == interpreter))
    {
      return Identification::Supported(file_type);
    }

    // 3. Extension.
    if let Some(ext) = basename.rsplit_once('.').map(|(_, ext)| ext)
      && let Some(file_type) = self.types.iter().find(|t| t.extensions.iter().any(|e| e == ext))
    {
      return Identification::Supported(file_type);
    }

    // 4. Magic number, for files with no other signal.
    for &(signature, name) in MAGIC_SIGNATURES {
      if prefix.starts_with(signature) {
        return Identification::Binary(name);
      }
    }

    Identification::Unknown
  }
}

/// Parses the interpreter name out of a shebang line at the start of the
/// byte prefix, resolving `env` indirection and stripping any trailing
/// version suffix (`python3.11` → `python`).
fn interpreter_from_prefix(prefix: &[u8]) -> Option<String> {
  if !prefix.starts_with(b"#!") {
    return None;
  }

  let first_line_end = prefix.iter().position(|&b| b == b'\n').unwrap_or(prefix.len());
  let first_line = std::str::from_utf8(&prefix[..first_line_end]).ok()?;

  static SHEBANG_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#!\s*(\S+)(?:\s+(\S+))?").expect("shebang regex must compile"));

  let caps = SHEBANG_REGEX.captures(first_line)?;
  let command = basename_of(caps.get(1)?.as_str());

  let interpreter = if command == "env" {
    basename_of(caps.get(2)?.as_str())
  } else {
    command
  };

  let trimmed = interpreter.trim_end_matches(|c: char| c.is_ascii_digit() || c == '.');
  if trimmed.is_empty() {
    None
  } else {
    Some(trimmed.to_string())
  }
}

fn basename_of(path: &str) -> &str {
  path.rsplit('/').next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
  use std::collections::HashMap;

  use super::*;
  use crate::config::GrammarConfig;

  fn assert_supported(id: Identification<'_>, name: &str) {
    match id {
      Identification::Supported(file_type) => assert_eq!(file_type.name, name),
      other => panic!("expected {name}, got {other:?}"),
    }
  }

  #[test]
  fn test_identify_by_extension() {
    let registry = TypeRegistry::builtin();
    assert_supported(registry.identify(Path::new("src/main.rs"), b""), "rust");
    assert_supported(registry.identify(Path::new("script.py"), b""), "python");
    assert_supported(registry.identify(Path::new("README.md"), b""), "markdown");
    assert_supported(registry.identify(Path::new("UPPER.PY"), b""), "python");
  }

  #[test]
  fn test_identify_by_filename_rule() {
    let registry = TypeRegistry::builtin();
    assert_supported(registry.identify(Path::new("Makefile"), b""), "makefile");
    assert_supported(registry.identify(Path::new("deploy/Dockerfile"), b""), "dockerfile");
    assert_supported(registry.identify(Path::new("CMakeLists.txt"), b""), "cmake");
  }

  #[test]
  fn test_filename_rule_outranks_extension() {
    // CMakeLists.txt has the .txt extension but is cmake, not plain text.
    let registry = TypeRegistry::builtin();
    assert_supported(registry.identify(Path::new("CMakeLists.txt"), b""), "cmake");
  }

  #[test]
  fn test_identify_by_shebang() {
    let registry = TypeRegistry::builtin();
    assert_supported(registry.identify(Path::new("deploy"), b"#!/bin/bash\necho hi\n"), "shell");
    assert_supported(
      registry.identify(Path::new("tool"), b"#!/usr/bin/env python3\nprint(1)\n"),
      "python",
    );
  }

  #[test]
  fn test_shebang_outranks_extension() {
    // A bash script mis-tagged as .txt is still shell.
    let registry = TypeRegistry::builtin();
    assert_supported(registry.identify(Path::new("notes.txt"), b"#!/bin/sh\n"), "shell");
  }

  #[test]
  fn test_identify_binary_by_magic_number() {
    let registry = TypeRegistry::builtin();
    match registry.identify(Path::new("a.out"), b"\x7fELF\x02\x01\x01") {
      Identification::Binary(name) => assert_eq!(name, "ELF binary"),
      other => panic!("expected binary, got {other:?}"),
    }
    assert!(matches!(
      registry.identify(Path::new("archive"), b"PK\x03\x04rest"),
      Identification::Binary("ZIP archive")
    ));
  }

  #[test]
  fn test_identify_unknown() {
    let registry = TypeRegistry::builtin();
    assert!(matches!(
      registry.identify(Path::new("data.xyz"), b"not a known signature"),
      Identification::Unknown
    ));
    assert!(matches!(
      registry.identify(Path::new("no_extension"), b"plain text"),
      Identification::Unknown
    ));
  }

  #[test]
  fn test_interpreter_parsing() {
    assert_eq!(interpreter_from_prefix(b"#!/bin/bash\n"), Some("bash".to_string()));
    assert_eq!(
      interpreter_from_prefix(b"#!/usr/bin/env python3.11\n"),
      Some("python".to_string())
    );
    assert_eq!(interpreter_from_prefix(b"#! /bin/sh\n"), Some("sh".to_string()));
    assert_eq!(interpreter_from_prefix(b"print(1)\n"), None);
    assert_eq!(interpreter_from_prefix(b""), None);
  }

  #[test]
  fn test_config_extension_override_replaces_grammar() {
    let mut grammars = HashMap::new();
    grammars.insert("java".to_string(), GrammarConfig::line("// "));
    let config = Config {
      grammars,
      filenames: HashMap::new(),
    };

    let registry = TypeRegistry::with_config(&config);
    match registry.identify(Path::new("Main.java"), b"") {
      Identification::Supported(file_type) => {
        assert_eq!(file_type.grammar, CommentGrammar::line("// "));
      }
      other => panic!("expected java, got {other:?}"),
    }
  }

  #[test]
  fn test_config_adds_new_extension() {
    let mut grammars = HashMap::new();
    grammars.insert("xyz".to_string(), GrammarConfig::line("; "));
    let config = Config {
      grammars,
      filenames: HashMap::new(),
    };

    let registry = TypeRegistry::with_config(&config);
    match registry.identify(Path::new("custom.xyz"), b"") {
      Identification::Supported(file_type) => {
        assert_eq!(file_type.grammar, CommentGrammar::line("; "));
      }
      other => panic!("expected custom type, got {other:?}"),
    }
  }

  #[test]
  fn test_config_adds_new_filename_rule() {
    let mut filenames = HashMap::new();
    filenames.insert("Vagrantfile".to_string(), GrammarConfig::line("# "));
    let config = Config {
      grammars: HashMap::new(),
      filenames,
    };

    let registry = TypeRegistry::with_config(&config);
    assert!(matches!(
      registry.identify(Path::new("Vagrantfile"), b""),
      Identification::Supported(_)
    ));
  }
}
