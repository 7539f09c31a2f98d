//! Builds the note/tag graph from a notes directory.
//!
//! Every note file is read and converted independently (in parallel with
//! rayon unless disabled). The per-file results are then merged into the
//! graph one by one in file-name order, so the graph does not depend on how
//! the parallel work was scheduled.

use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;

use crate::converter::PreviewConverter;
use crate::error::{KastenError, Result};
use crate::graph::NoteGraph;
use crate::note::NoteMetadata;
use crate::scanner::{scan_notes, NoteFile, DEFAULT_EXTENSION};

/// Options for [`build_graph`].
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Note file extension, with or without the leading dot.
    pub extension: String,

    /// Read and convert notes on the rayon thread pool.
    pub parallel: bool,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
            parallel: true,
        }
    }
}

/// A note read from disk, ready to merge into the graph.
#[derive(Debug)]
struct ParsedNote {
    id: String,
    metadata: NoteMetadata,
    preview: String,
}

fn parse_note(file: &NoteFile, converter: &dyn PreviewConverter) -> Result<ParsedNote> {
    let content =
        std::fs::read_to_string(&file.path).map_err(|source| KastenError::UnreadableFile {
            path: file.path.clone(),
            source,
        })?;

    let metadata = NoteMetadata::parse(&file.id, &content);

    let preview = converter
        .convert(&file.path)
        .map_err(|source| KastenError::ConversionFailure {
            path: file.path.clone(),
            source,
        })?;

    tracing::debug!("Parsed note '{}' ({} tags)", file.id, metadata.tags.len());

    Ok(ParsedNote {
        id: file.id.clone(),
        metadata,
        preview,
    })
}

/// Merge parsed notes into a fresh graph, in slice order.
fn merge_notes(notes: Vec<ParsedNote>) -> NoteGraph {
    let mut graph = NoteGraph::new();

    for note in notes {
        graph.upsert_note(&note.id, note.metadata.title, note.preview);
        for tag in &note.metadata.tags {
            graph.ensure_tag(tag);
            graph.link(&note.id, tag);
        }
    }

    graph
}

/// Build the note/tag graph for the notes directly under `dir`.
///
/// # Arguments
///
/// * `dir` - Notes directory (not searched recursively)
/// * `options` - Extension filter and parallelism
/// * `converter` - Renders each note's preview fragment
///
/// # Errors
///
/// The first unreadable file or failed conversion aborts the whole build;
/// no partial graph is returned.
pub fn build_graph(
    dir: &Path,
    options: &ExtractOptions,
    converter: &dyn PreviewConverter,
) -> Result<NoteGraph> {
    let start = Instant::now();
    let files = scan_notes(dir, &options.extension)?;

    if files.is_empty() {
        tracing::warn!(
            "No .{} notes found in {:?}",
            options.extension.trim_start_matches('.'),
            dir
        );
    }

    let parsed: Vec<ParsedNote> = if options.parallel {
        files
            .par_iter()
            .map(|file| parse_note(file, converter))
            .collect::<Result<_>>()?
    } else {
        files
            .iter()
            .map(|file| parse_note(file, converter))
            .collect::<Result<_>>()?
    };

    let graph = merge_notes(parsed);

    tracing::info!(
        "Extracted {} notes, {} tags, {} edges in {:.1}ms",
        graph.note_count(),
        graph.tag_count(),
        graph.edge_count(),
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::ConvertError;
    use crate::graph::NodeGroup;
    use std::fs;
    use tempfile::TempDir;

    /// Uses the file name as the preview.
    struct NameConverter;

    impl PreviewConverter for NameConverter {
        fn convert(&self, path: &Path) -> std::result::Result<String, ConvertError> {
            Ok(path.file_name().unwrap().to_string_lossy().to_string())
        }
    }

    /// Fails for one specific file.
    struct FailingConverter(&'static str);

    impl PreviewConverter for FailingConverter {
        fn convert(&self, path: &Path) -> std::result::Result<String, ConvertError> {
            if path.ends_with(self.0) {
                Err(ConvertError::Exit {
                    status: 1,
                    stderr: "boom".to_string(),
                })
            } else {
                Ok(String::new())
            }
        }
    }

    fn write_note(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_build_graph_example() {
        let dir = TempDir::new().unwrap();
        write_note(dir.path(), "a.adoc", "= Alpha\n:tags: x, y\n\nBody\n");
        write_note(dir.path(), "b.adoc", "= Beta\n:tags: y\n");

        let graph = build_graph(dir.path(), &ExtractOptions::default(), &NameConverter).unwrap();

        let ids: Vec<&str> = graph.nodes().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "x", "y", "b"]);

        let edges: Vec<(&str, &str)> = graph.edges().collect();
        assert_eq!(edges, vec![("a", "x"), ("a", "y"), ("b", "y")]);

        let a = graph.node("a").unwrap();
        assert_eq!(a.group, NodeGroup::Note);
        assert_eq!(a.title.as_deref(), Some("Alpha"));
        assert_eq!(a.preview.as_deref(), Some("a.adoc"));

        let y = graph.node("y").unwrap();
        assert_eq!(y.group, NodeGroup::Tag);
        assert!(y.title.is_none());
        assert!(y.preview.is_none());
    }

    #[test]
    fn test_duplicate_tags_single_edge() {
        let dir = TempDir::new().unwrap();
        write_note(dir.path(), "n.adoc", ":tags: a, a, b\n:tags: b\n");

        let graph = build_graph(dir.path(), &ExtractOptions::default(), &NameConverter).unwrap();
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.tag_count(), 2);
    }

    #[test]
    fn test_missing_title_uses_stem() {
        let dir = TempDir::new().unwrap();
        write_note(dir.path(), "202401011200.adoc", "no title here\n");

        let graph = build_graph(dir.path(), &ExtractOptions::default(), &NameConverter).unwrap();
        let node = graph.node("202401011200").unwrap();
        assert_eq!(node.title.as_deref(), Some("202401011200"));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let dir = TempDir::new().unwrap();
        for i in 0..20 {
            write_note(
                dir.path(),
                &format!("note{:02}.adoc", i),
                &format!("= Note {}\n:tags: t{}, shared\n", i, i % 3),
            );
        }

        let parallel = build_graph(dir.path(), &ExtractOptions::default(), &NameConverter).unwrap();
        let sequential = build_graph(
            dir.path(),
            &ExtractOptions {
                parallel: false,
                ..ExtractOptions::default()
            },
            &NameConverter,
        )
        .unwrap();

        assert!(parallel.nodes().eq(sequential.nodes()));
        assert!(parallel.edges().eq(sequential.edges()));
        assert_eq!(parallel.note_count(), 20);
        assert_eq!(parallel.tag_count(), 4);
        assert_eq!(parallel.edge_count(), 40);
    }

    #[test]
    fn test_conversion_failure_is_fatal() {
        let dir = TempDir::new().unwrap();
        write_note(dir.path(), "good.adoc", "= Good\n");
        write_note(dir.path(), "bad.adoc", "= Bad\n");

        let result = build_graph(
            dir.path(),
            &ExtractOptions::default(),
            &FailingConverter("bad.adoc"),
        );

        match result {
            Err(KastenError::ConversionFailure { path, .. }) => {
                assert!(path.ends_with("bad.adoc"));
            }
            other => panic!("expected ConversionFailure, got {:?}", other),
        }
    }

    #[test]
    fn test_unreadable_file_is_fatal() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("binary.adoc"), [0xff, 0xfe, 0x00, 0x80]).unwrap();

        let result = build_graph(dir.path(), &ExtractOptions::default(), &NameConverter);
        assert!(matches!(result, Err(KastenError::UnreadableFile { .. })));
    }

    #[test]
    fn test_empty_directory() {
        let dir = TempDir::new().unwrap();
        let graph = build_graph(dir.path(), &ExtractOptions::default(), &NameConverter).unwrap();
        assert!(graph.is_empty());
        assert_eq!(graph.edge_count(), 0);
    }
}
