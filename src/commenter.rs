//! # Commenter Module
//!
//! Bidirectional transform between raw license text and its commented form,
//! parameterized by a [`CommentGrammar`].
//!
//! [`render`] turns license text into a [`LicenseBlock`] for one grammar;
//! [`strip`] recognizes a run of candidate lines as a rendering under that
//! grammar and recovers the text. Both sides funnel every line through the
//! same [`normalize`] helper, which is what makes the render/strip round-trip
//! exact and presence detection tolerant of trailing-whitespace drift.
//!
//! No file I/O happens here; everything operates on in-memory text.

/// How a language comments text.
///
/// Two shapes exist in practice: a repeated per-line prefix (`# ...`,
/// `// ...`) and an enclosing block with distinct open and close markers
/// (`/* ... */`, `<!-- ... -->`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommentGrammar {
  /// Every rendered line is `prefix` followed by the text line.
  Line {
    /// Symbol plus separating whitespace, e.g. `"# "` or `"// "`.
    prefix: String,
  },
  /// An open-marker line, prefixed body lines, and a close-marker line.
  Block {
    /// Opening marker line, e.g. `"/*"`.
    open: String,
    /// Per-line prefix between the markers, e.g. `" * "`. May be
    /// whitespace-only.
    prefix: String,
    /// Closing marker line, e.g. `" */"`.
    close: String,
  },
}

impl CommentGrammar {
  /// Create a prefix-line grammar.
  pub fn line(prefix: &str) -> Self {
    Self::Line {
      prefix: prefix.to_string(),
    }
  }

  /// Create a block grammar with open/close markers.
  pub fn block(open: &str, prefix: &str, close: &str) -> Self {
    Self::Block {
      open: open.to_string(),
      prefix: prefix.to_string(),
      close: close.to_string(),
    }
  }
}

/// Role of a single rendered line within a license block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineRole {
  /// The opening marker of a block grammar.
  Open,
  /// A prefixed body line.
  Body,
  /// The closing marker of a block grammar.
  Close,
}

/// The rendered form of the license text for a specific grammar.
///
/// An ordered sequence of lines, each tagged with its [`LineRole`]. This is a
/// derived, ephemeral value recomputed on every operation and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseBlock {
  lines: Vec<(LineRole, String)>,
}

impl LicenseBlock {
  /// Number of lines in the rendered block, markers included.
  pub fn len(&self) -> usize {
    self.lines.len()
  }

  /// Whether the block contains no lines at all (empty license text under a
  /// prefix-line grammar).
  pub fn is_empty(&self) -> bool {
    self.lines.is_empty()
  }

  /// Iterate over the rendered line texts in order.
  pub fn lines(&self) -> impl Iterator<Item = &str> {
    self.lines.iter().map(|(_, text)| text.as_str())
  }

  /// Iterate over `(role, text)` pairs in order.
  pub fn tagged_lines(&self) -> impl Iterator<Item = (LineRole, &str)> {
    self.lines.iter().map(|(role, text)| (*role, text.as_str()))
  }
}

/// Right-trims trailing whitespace from a line.
///
/// This is the single normalization rule shared by [`render`], [`strip`], and
/// [`canonicalize`]. Keeping it in one place is what makes the idempotence
/// and round-trip properties mechanically checkable: a blank license line
/// renders as the trimmed prefix alone, and a candidate line with editor-added
/// trailing spaces still matches.
pub fn normalize(line: &str) -> &str {
  line.trim_end()
}

/// Normalizes license text to its canonical matching form: lines joined with
/// `\n`, each right-trimmed, with no trailing newline.
///
/// [`strip`] returns text in exactly this form, so presence detection reduces
/// to string equality against the canonicalized license text.
pub fn canonicalize(text: &str) -> String {
  text.lines().map(normalize).collect::<Vec<_>>().join("\n")
}

/// Renders license text as a comment block under the given grammar.
///
/// For a prefix-line grammar every text line (blank lines included) is
/// prefixed; lines that would end in trailing whitespace are right-trimmed.
/// For a block grammar the body is framed by one open-marker line and one
/// close-marker line.
pub fn render(text: &str, grammar: &CommentGrammar) -> LicenseBlock {
  let mut lines = Vec::new();

  match grammar {
    CommentGrammar::Line { prefix } => {
      for line in text.lines() {
        lines.push((LineRole::Body, prefix_line(prefix, line)));
      }
    }
    CommentGrammar::Block { open, prefix, close } => {
      lines.push((LineRole::Open, normalize(open).to_string()));
      for line in text.lines() {
        lines.push((LineRole::Body, prefix_line(prefix, line)));
      }
      lines.push((LineRole::Close, normalize(close).to_string()));
    }
  }

  LicenseBlock { lines }
}

/// Attempts to recognize `candidate` as a rendering of some text under
/// `grammar`, returning the de-commented text in [`canonicalize`]d form.
///
/// Matching is tolerant of whitespace-only differences (trailing spaces,
/// tab-vs-space after the comment symbol) but never of symbol differences: a
/// candidate commented with the wrong symbol or the wrong markers yields
/// `None`, so grammars cannot cross-match.
pub fn strip(candidate: &[&str], grammar: &CommentGrammar) -> Option<String> {
  let body = match grammar {
    CommentGrammar::Line { prefix } => candidate
      .iter()
      .map(|line| unprefix_line(prefix, line))
      .collect::<Option<Vec<_>>>()?,
    CommentGrammar::Block { open, prefix, close } => {
      if candidate.len() < 2 {
        return None;
      }
      let (first, rest) = candidate.split_first()?;
      let (last, interior) = rest.split_last()?;
      if normalize(first) != normalize(open) || normalize(last) != normalize(close) {
        return None;
      }
      interior
        .iter()
        .map(|line| unprefix_line(prefix, line))
        .collect::<Option<Vec<_>>>()?
    }
  };

  Some(body.join("\n"))
}

/// Renders one body line: prefix plus text, right-trimmed so blank license
/// lines do not leave trailing-whitespace artifacts.
fn prefix_line(prefix: &str, line: &str) -> String {
  normalize(&format!("{prefix}{line}")).to_string()
}

/// Inverse of [`prefix_line`]: removes the prefix from a candidate line,
/// tolerating trailing-whitespace drift around the symbol.
fn unprefix_line(prefix: &str, line: &str) -> Option<String> {
  let bare = normalize(prefix);

  // Exact prefix match preserves any indentation inside the license text.
  if let Some(rest) = line.strip_prefix(prefix) {
    return Some(normalize(rest).to_string());
  }

  let line = normalize(line);

  // A blank body line renders as the bare symbol alone.
  if line == bare {
    return Some(String::new());
  }

  // Symbol is right but the whitespace after it drifted.
  if let Some(rest) = line.strip_prefix(bare) {
    let rest = rest.strip_prefix([' ', '\t']).unwrap_or(rest);
    return Some(normalize(rest).to_string());
  }

  None
}

#[cfg(test)]
mod tests {
  use super::*;

  fn as_lines(block: &LicenseBlock) -> Vec<String> {
    block.lines().map(str::to_string).collect()
  }

  #[test]
  fn test_render_line_grammar() {
    let grammar = CommentGrammar::line("# ");
    let block = render("Copyright X\nAll rights reserved.", &grammar);

    assert_eq!(as_lines(&block), vec!["# Copyright X", "# All rights reserved."]);
    assert!(block.tagged_lines().all(|(role, _)| role == LineRole::Body));
  }

  #[test]
  fn test_render_line_grammar_trims_blank_lines() {
    let grammar = CommentGrammar::line("# ");
    let block = render("First\n\nThird", &grammar);

    // The blank license line must not render as "# " with a trailing space.
    assert_eq!(as_lines(&block), vec!["# First", "#", "# Third"]);
  }

  #[test]
  fn test_render_block_grammar() {
    let grammar = CommentGrammar::block("/*", " * ", " */");
    let block = render("Line A", &grammar);

    assert_eq!(as_lines(&block), vec!["/*", " * Line A", " */"]);
    let roles: Vec<_> = block.tagged_lines().map(|(role, _)| role).collect();
    assert_eq!(roles, vec![LineRole::Open, LineRole::Body, LineRole::Close]);
  }

  #[test]
  fn test_render_empty_text() {
    let line = render("", &CommentGrammar::line("# "));
    assert!(line.is_empty());

    let block = render("", &CommentGrammar::block("/*", " * ", " */"));
    assert_eq!(as_lines(&block), vec!["/*", " */"]);
  }

  #[test]
  fn test_strip_round_trips_every_grammar_shape() {
    let text = "Copyright X\n\n  Indented clause\nAll rights reserved.";
    let grammars = [
      CommentGrammar::line("# "),
      CommentGrammar::line("// "),
      CommentGrammar::line(";; "),
      CommentGrammar::block("/*", " * ", " */"),
      CommentGrammar::block("<!--", " ", "-->"),
    ];

    for grammar in &grammars {
      let block = render(text, grammar);
      let lines: Vec<&str> = block.lines().collect();
      assert_eq!(
        strip(&lines, grammar).as_deref(),
        Some(canonicalize(text).as_str()),
        "round trip failed for {grammar:?}"
      );
    }
  }

  #[test]
  fn test_strip_round_trips_empty_text() {
    for grammar in [CommentGrammar::line("# "), CommentGrammar::block("/*", " * ", " */")] {
      let block = render("", &grammar);
      let lines: Vec<&str> = block.lines().collect();
      assert_eq!(strip(&lines, &grammar).as_deref(), Some(""));
    }
  }

  #[test]
  fn test_strip_tolerates_trailing_whitespace() {
    let grammar = CommentGrammar::line("# ");
    let candidate = vec!["# Copyright X   ", "# All rights reserved.\t"];
    assert_eq!(
      strip(&candidate, &grammar).as_deref(),
      Some("Copyright X\nAll rights reserved.")
    );
  }

  #[test]
  fn test_strip_tolerates_missing_space_after_symbol() {
    let grammar = CommentGrammar::line("# ");
    let candidate = vec!["#Copyright X"];
    assert_eq!(strip(&candidate, &grammar).as_deref(), Some("Copyright X"));
  }

  #[test]
  fn test_strip_rejects_wrong_symbol() {
    let text = "Copyright X";
    let hash = CommentGrammar::line("# ");
    let slashes = CommentGrammar::line("// ");

    let block = render(text, &hash);
    let lines: Vec<&str> = block.lines().collect();
    assert_eq!(strip(&lines, &slashes), None);
  }

  #[test]
  fn test_strip_rejects_cross_grammar_shapes() {
    let text = "Copyright X\nAll rights reserved.";
    let line = CommentGrammar::line("# ");
    let block = CommentGrammar::block("/*", " * ", " */");
    let markup = CommentGrammar::block("<!--", " ", "-->");

    let rendered_line = render(text, &line);
    let rendered_block = render(text, &block);

    let line_lines: Vec<&str> = rendered_line.lines().collect();
    let block_lines: Vec<&str> = rendered_block.lines().collect();

    assert_eq!(strip(&line_lines, &block), None);
    assert_eq!(strip(&block_lines, &line), None);
    assert_eq!(strip(&block_lines, &markup), None);
  }

  #[test]
  fn test_strip_rejects_truncated_block() {
    let grammar = CommentGrammar::block("/*", " * ", " */");
    // Close marker missing.
    assert_eq!(strip(&["/*", " * Line A"], &grammar), None);
    // Too short to contain both markers.
    assert_eq!(strip(&["/*"], &grammar), None);
  }

  #[test]
  fn test_strip_rejects_unrelated_content() {
    let grammar = CommentGrammar::line("# ");
    assert_eq!(strip(&["import os"], &grammar), None);
    assert_eq!(strip(&["# good", "bad"], &grammar), None);
  }

  #[test]
  fn test_normalize_is_trailing_only() {
    assert_eq!(normalize("  text  "), "  text");
    assert_eq!(normalize("text\t"), "text");
    assert_eq!(normalize(""), "");
  }

  #[test]
  fn test_canonicalize() {
    assert_eq!(canonicalize("a \nb\t\nc\n"), "a\nb\nc");
    assert_eq!(canonicalize(""), "");
  }
}
