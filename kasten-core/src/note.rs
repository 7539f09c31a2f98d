//! Note metadata extraction: document title and tag declarations.
//!
//! Notes are AsciiDoc documents. The title is the first `= Title` line and
//! tags are declared through the `:tags:` document attribute:
//!
//! ```text
//! = Ownership in Rust
//! :tags: rust, memory, borrowing
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Document title marker (level-0 section).
const TITLE_MARKER: &str = "= ";

static TAG_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^:tags:\s*(.*)$").expect("valid tag line regex"));

/// Title and tags scanned from a note's raw text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteMetadata {
    pub title: String,
    pub tags: Vec<String>,
}

impl NoteMetadata {
    /// Scan `content` for the title and tags of note `id`.
    pub fn parse(id: &str, content: &str) -> Self {
        Self {
            title: extract_title(content, id),
            tags: extract_tags(content),
        }
    }
}

/// Find the document title.
///
/// Uses the first line whose trimmed form starts with `= `. Falls back to
/// `fallback_id` when there is no such line or its text is empty.
pub fn extract_title(content: &str, fallback_id: &str) -> String {
    content
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with(TITLE_MARKER))
        .map(|line| line.trim_start_matches(['=', ' ']).trim())
        .filter(|title| !title.is_empty())
        .unwrap_or(fallback_id)
        .to_string()
}

/// Collect the tags declared on every `:tags:` line.
///
/// Values are split on commas and trimmed; empty pieces are dropped.
/// Order of first appearance is kept and repeats are removed, whether they
/// come from the same line or from separate tag lines.
pub fn extract_tags(content: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();

    for line in content.lines() {
        let Some(caps) = TAG_LINE_RE.captures(line.trim()) else {
            continue;
        };
        let value = caps.get(1).map(|m| m.as_str()).unwrap_or_default();

        for tag in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if !tags.iter().any(|existing| existing == tag) {
                tags.push(tag.to_string());
            }
        }
    }

    tags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_from_marker() {
        let content = "// comment\n= Ownership in Rust  \n:tags: rust\n\nBody\n";
        assert_eq!(extract_title(content, "ownership"), "Ownership in Rust");
    }

    #[test]
    fn test_title_ignores_section_headings() {
        let content = "== Section\nBody\n";
        assert_eq!(extract_title(content, "20240101-note"), "20240101-note");
    }

    #[test]
    fn test_title_first_match_wins() {
        let content = "= First\n= Second\n";
        assert_eq!(extract_title(content, "x"), "First");
    }

    #[test]
    fn test_title_indented_marker() {
        assert_eq!(extract_title("   = Indented\n", "x"), "Indented");
    }

    #[test]
    fn test_title_empty_text_falls_back() {
        assert_eq!(extract_title("= =\n", "fallback"), "fallback");
    }

    #[test]
    fn test_title_missing() {
        assert_eq!(extract_title("", "empty"), "empty");
        assert_eq!(extract_title("just text\n", "plain"), "plain");
    }

    #[test]
    fn test_tags_split_and_trimmed() {
        let content = "= T\n:tags:  rust ,  memory,borrowing \n";
        assert_eq!(extract_tags(content), vec!["rust", "memory", "borrowing"]);
    }

    #[test]
    fn test_tags_deduplicated() {
        assert_eq!(extract_tags(":tags: a, a, b\n"), vec!["a", "b"]);
    }

    #[test]
    fn test_tags_case_insensitive_marker() {
        assert_eq!(extract_tags(":TAGS: One\n:Tags: two\n"), vec!["One", "two"]);
    }

    #[test]
    fn test_tags_case_preserved() {
        assert_eq!(extract_tags(":tags: Rust, rust\n"), vec!["Rust", "rust"]);
    }

    #[test]
    fn test_tags_multiple_lines_union() {
        let content = ":tags: a, b\nBody\n:tags: b, c\n";
        assert_eq!(extract_tags(content), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_tags_empty_pieces_dropped() {
        assert_eq!(extract_tags(":tags: , ,x,,\n"), vec!["x"]);
        assert!(extract_tags(":tags:\n").is_empty());
    }

    #[test]
    fn test_tags_marker_must_start_line() {
        assert!(extract_tags("see :tags: a\n").is_empty());
        assert_eq!(extract_tags("  :tags: a\n"), vec!["a"]);
    }

    #[test]
    fn test_parse_metadata() {
        let meta = NoteMetadata::parse("a", "= Alpha\n:tags: x, y\n");
        assert_eq!(meta.title, "Alpha");
        assert_eq!(meta.tags, vec!["x", "y"]);
    }
}
