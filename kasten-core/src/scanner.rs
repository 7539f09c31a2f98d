//! Note file discovery using the `ignore` crate's walker.
//!
//! Only files directly under the notes directory are considered (no
//! recursion) and ignore files are not consulted: every regular file with
//! the note extension is a note. Results are sorted by file name so the
//! graph is built in the same order on every run.

use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{KastenError, Result};

/// Extension of note documents (AsciiDoc).
pub const DEFAULT_EXTENSION: &str = "adoc";

/// A note document found in the notes directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteFile {
    /// Note identifier: the file name without its extension.
    pub id: String,

    /// Full path to the document.
    pub path: PathBuf,
}

/// Check whether `path` carries the note extension (case-insensitive).
fn has_extension(path: &Path, extension: &str) -> bool {
    let wanted = extension.trim_start_matches('.');
    path.extension()
        .map(|ext| ext.to_string_lossy().eq_ignore_ascii_case(wanted))
        .unwrap_or(false)
}

/// Path of the entry an `ignore` walk error refers to, if any.
fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.as_path()),
        _ => None,
    }
}

/// List the note documents directly under `root`.
///
/// # Arguments
///
/// * `root` - Notes directory
/// * `extension` - Note extension, with or without the leading dot
///
/// # Returns
///
/// Note files sorted by file name, or `DirectoryUnreadable` if `root`
/// cannot be listed. An entry with the note extension that cannot be
/// inspected (such as a dangling symlink) is `UnreadableFile`; broken
/// entries without the extension are skipped.
///
/// The extension match ignores case, so `a.adoc` and `a.ADOC` share the
/// identifier `a`. Both are returned and a warning is logged; the later
/// one wins when the graph is built.
pub fn scan_notes(root: &Path, extension: &str) -> Result<Vec<NoteFile>> {
    let unreadable = |source: io::Error| KastenError::DirectoryUnreadable {
        path: root.to_path_buf(),
        source,
    };

    if !root.is_dir() {
        return Err(unreadable(io::Error::new(
            io::ErrorKind::NotFound,
            "not a directory",
        )));
    }

    let walker = WalkBuilder::new(root)
        .standard_filters(false) // notes are never hidden by .gitignore
        .max_depth(Some(1))
        .follow_links(true)
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = error_path(&err).filter(|p| *p != root).map(Path::to_path_buf);
                let source = err
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "walk failed"));
                match path {
                    Some(path) if has_extension(&path, extension) => {
                        return Err(KastenError::UnreadableFile { path, source });
                    }
                    Some(path) => {
                        tracing::debug!("Skipping unreadable entry {:?}: {}", path, source);
                        continue;
                    }
                    None => return Err(unreadable(source)),
                }
            }
        };

        if !entry.file_type().map(|ft| ft.is_file()).unwrap_or(false) {
            continue;
        }

        let path = entry.into_path();
        if !has_extension(&path, extension) {
            continue;
        }

        let id = match path.file_stem() {
            Some(stem) => stem.to_string_lossy().to_string(),
            None => continue,
        };
        files.push(NoteFile { id, path });
    }

    files.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));

    let mut seen = HashSet::new();
    for file in &files {
        if !seen.insert(file.id.as_str()) {
            tracing::warn!(
                "Note identifier '{}' is used by more than one file; {:?} wins",
                file.id,
                file.path
            );
        }
    }
    tracing::debug!("Found {} note files in {:?}", files.len(), root);

    Ok(files)
}
