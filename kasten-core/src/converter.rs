//! Preview rendering for note hover text.
//!
//! A [`PreviewConverter`] turns a note document into a display-ready HTML
//! fragment: one readable line per text segment, with segments starting with
//! `Note` or `References` emphasised as headings.
//!
//! Two converters are provided:
//!
//! - [`AsciidoctorConverter`] shells out to `asciidoctor --embedded` and
//!   keeps the text content of the generated HTML.
//! - [`PlainTextConverter`] escapes the raw document lines; it needs no
//!   external tooling.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use std::process::Command;
use thiserror::Error;

/// Segments starting with one of these words are rendered as headings.
const HEADING_PREFIXES: &[&str] = &["Note", "References"];

static IGNORED_BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)<!--.*?-->|<script\b.*?</script\s*>|<style\b.*?</style\s*>")
        .expect("valid ignored block regex")
});
static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid tag regex"));

/// Errors raised by a preview converter.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// The converter program could not be started.
    #[error("Failed to run '{program}': {source}")]
    Spawn {
        program: String,
        source: std::io::Error,
    },

    /// The converter program exited unsuccessfully.
    #[error("Converter exited with status {status}: {stderr}")]
    Exit { status: i32, stderr: String },

    /// The converter produced output that is not UTF-8.
    #[error("Converter output is not valid UTF-8")]
    Encoding,

    /// The document could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Converts a note document into an HTML preview fragment.
pub trait PreviewConverter: Send + Sync {
    /// Render the preview for the document at `path`.
    fn convert(&self, path: &Path) -> Result<String, ConvertError>;
}

/// Renders previews through the Ruby `asciidoctor` tool.
#[derive(Debug, Clone)]
pub struct AsciidoctorConverter {
    program: String,
}

impl AsciidoctorConverter {
    /// Use `program` instead of `asciidoctor` from `PATH`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for AsciidoctorConverter {
    fn default() -> Self {
        Self::new("asciidoctor")
    }
}

impl PreviewConverter for AsciidoctorConverter {
    fn convert(&self, path: &Path) -> Result<String, ConvertError> {
        let output = Command::new(&self.program)
            .args(["--embedded", "-o", "-"])
            .arg(path)
            .output()
            .map_err(|source| ConvertError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(ConvertError::Exit {
                status: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        let html = String::from_utf8(output.stdout).map_err(|_| ConvertError::Encoding)?;
        Ok(render_preview(&html))
    }
}

/// Renders previews from the raw document text, without external tools.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextConverter;

impl PreviewConverter for PlainTextConverter {
    fn convert(&self, path: &Path) -> Result<String, ConvertError> {
        let content = std::fs::read_to_string(path)?;
        let escaped = escape_html(&content);
        Ok(render_segments(escaped.lines()))
    }
}

/// Reduce an HTML document to the preview fragment.
///
/// Keeps the non-empty text between tags; comments, scripts and styles are
/// dropped. Entities are left encoded so the fragment stays safe to embed.
pub fn render_preview(html: &str) -> String {
    let cleaned = IGNORED_BLOCK_RE.replace_all(html, "");
    render_segments(TAG_RE.split(&cleaned))
}

/// Join text segments into `<br>`-separated lines.
fn render_segments<'a>(segments: impl Iterator<Item = &'a str>) -> String {
    let mut body = String::new();

    for segment in segments.map(str::trim).filter(|s| !s.is_empty()) {
        if HEADING_PREFIXES.iter().any(|p| segment.starts_with(p)) {
            body.push_str("<br><b>");
            body.push_str(segment);
            body.push_str("</b><br>");
        } else {
            body.push_str(segment);
            body.push_str("<br>");
        }
    }

    body
}

/// Escape the characters that carry meaning in HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_render_preview_strips_markup() {
        let html = r#"<div class="paragraph">
<p>Ownership moves values.</p>
</div>
<div class="ulist"><ul><li><p>one</p></li><li><p>two</p></li></ul></div>"#;

        assert_eq!(
            render_preview(html),
            "Ownership moves values.<br>one<br>two<br>"
        );
    }

    #[test]
    fn test_render_preview_headings() {
        let html = "<h2>Notes</h2><p>body</p><h2>References</h2><p>The Book</p>";
        assert_eq!(
            render_preview(html),
            "<br><b>Notes</b><br>body<br><br><b>References</b><br>The Book<br>"
        );
    }

    #[test]
    fn test_render_preview_heading_prefix_is_case_sensitive() {
        assert_eq!(render_preview("<p>notebook</p>"), "notebook<br>");
    }

    #[test]
    fn test_render_preview_drops_comments_and_scripts() {
        let html = "<!-- generated --><p>kept</p><script>var x = 1;</script><style>p{}</style>";
        assert_eq!(render_preview(html), "kept<br>");
    }

    #[test]
    fn test_render_preview_keeps_entities() {
        assert_eq!(render_preview("<p>a &lt; b</p>"), "a &lt; b<br>");
    }

    #[test]
    fn test_render_preview_empty() {
        assert_eq!(render_preview(""), "");
        assert_eq!(render_preview("<div>\n  </div>"), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_plain_text_converter() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.adoc");
        fs::write(&path, "= Title\n\nBody <b>\n\nReferences\n").unwrap();

        let preview = PlainTextConverter.convert(&path).unwrap();
        assert_eq!(
            preview,
            "= Title<br>Body &lt;b&gt;<br><br><b>References</b><br>"
        );
    }

    #[test]
    fn test_plain_text_converter_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = PlainTextConverter.convert(&dir.path().join("missing.adoc"));
        assert!(matches!(result, Err(ConvertError::Io(_))));
    }

    #[test]
    fn test_asciidoctor_missing_program() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.adoc");
        fs::write(&path, "= Title\n").unwrap();

        let converter = AsciidoctorConverter::new("kasten-no-such-converter-binary");
        let result = converter.convert(&path);
        assert!(matches!(result, Err(ConvertError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn test_asciidoctor_nonzero_exit() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("note.adoc");
        fs::write(&path, "= Title\n").unwrap();

        let converter = AsciidoctorConverter::new("false");
        match converter.convert(&path) {
            Err(ConvertError::Exit { status, .. }) => assert_eq!(status, 1),
            other => panic!("expected Exit, got {:?}", other),
        }
    }
}
