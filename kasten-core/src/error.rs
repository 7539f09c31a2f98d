//! Error types for kasten-core.

use std::path::PathBuf;

use thiserror::Error;

use crate::converter::ConvertError;
use crate::layout::LayoutError;

/// Result type alias for kasten-core operations.
pub type Result<T> = std::result::Result<T, KastenError>;

/// Errors that abort a Kasten run.
///
/// There is no partial-success mode: every variant is fatal for the whole run.
#[derive(Error, Debug)]
pub enum KastenError {
    /// The notes directory itself could not be listed.
    #[error("Cannot read notes directory {}: {source}", .path.display())]
    DirectoryUnreadable {
        /// Directory that was scanned.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// A note file could not be read as UTF-8 text.
    #[error("Cannot read note {}: {source}", .path.display())]
    UnreadableFile {
        /// Offending note file.
        path: PathBuf,
        /// Underlying IO error (permissions, invalid UTF-8, ...).
        source: std::io::Error,
    },

    /// The markup converter failed for a note.
    #[error("Preview conversion failed for {}: {source}", .path.display())]
    ConversionFailure {
        /// Offending note file.
        path: PathBuf,
        /// Converter error.
        source: ConvertError,
    },

    /// The layout function rejected the graph.
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    /// The layout function returned no position for a node.
    #[error("Layout returned no position for node '{node}'")]
    LayoutIncomplete {
        /// Identifier of the unpositioned node.
        node: String,
    },
}
