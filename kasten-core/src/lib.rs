//! Kasten core - note graph extraction and scene assembly.
//!
//! This crate turns a directory of AsciiDoc notes into an undirected
//! note/tag graph and lays that graph out as a renderer-agnostic 3D scene.
//!
//! # Pipeline
//!
//! ```text
//! notes dir -> scanner -> extractor (+ converter) -> NoteGraph -> scene (+ layout) -> SceneDescription
//! ```
//!
//! The markup converter and the layout function sit behind the
//! [`PreviewConverter`] and [`Layout`] traits so callers can swap them out.
//!
//! # Usage
//!
//! ```no_run
//! use kasten_core::{build_graph, build_scene, ExtractOptions, PlainTextConverter, SceneOptions, SpringLayout};
//!
//! let graph = build_graph("permanent".as_ref(), &ExtractOptions::default(), &PlainTextConverter)?;
//! let scene = build_scene(&graph, &SpringLayout::default(), &SceneOptions::default())?;
//! println!("{} nodes, {} edges", scene.node_count(), scene.edge_count());
//! # Ok::<(), kasten_core::KastenError>(())
//! ```

pub mod converter;
pub mod error;
pub mod extractor;
pub mod graph;
pub mod layout;
pub mod note;
pub mod scanner;
pub mod scene;

pub use converter::{AsciidoctorConverter, ConvertError, PlainTextConverter, PreviewConverter};
pub use error::{KastenError, Result};
pub use extractor::{build_graph, ExtractOptions};
pub use graph::{NodeData, NodeGroup, NoteGraph};
pub use layout::{Layout, LayoutError, Positions, SpringLayout, DEFAULT_SEED};
pub use note::NoteMetadata;
pub use scanner::{scan_notes, NoteFile, DEFAULT_EXTENSION};
pub use scene::{build_scene, EdgeLists, NodeLists, Presentation, SceneDescription, SceneOptions};

/// Get the version of kasten-core.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
