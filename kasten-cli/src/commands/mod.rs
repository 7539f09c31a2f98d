//! Command implementations for the Kasten CLI
//!
//! Each command module provides a `run` function that executes the command logic.

pub mod render;
pub mod scene;
pub mod stats;

use anyhow::{Context, Result};
use kasten_core::{
    build_graph, build_scene, ExtractOptions, NoteGraph, SceneDescription, SceneOptions,
    SpringLayout,
};
use std::path::Path;

use crate::config::{ConverterKind, KastenConfig};

/// Read every note under `dir` into a graph.
pub fn load_graph(
    dir: &Path,
    config: &KastenConfig,
    converter: Option<ConverterKind>,
) -> Result<NoteGraph> {
    let options = ExtractOptions {
        extension: config.extension().to_string(),
        parallel: config.parallel(),
    };
    let converter = config.converter(converter);

    build_graph(dir, &options, converter.as_ref())
        .with_context(|| format!("Failed to extract notes from {}", dir.display()))
}

/// Lay out `graph` into a scene using the configured seed and title.
pub fn load_scene(
    graph: &NoteGraph,
    config: &KastenConfig,
    seed: Option<u64>,
) -> Result<SceneDescription> {
    let layout = config
        .iterations()
        .map(SpringLayout::new)
        .unwrap_or_default();

    let mut options = SceneOptions {
        seed: config.seed(seed),
        ..SceneOptions::default()
    };
    if let Some(title) = config.title() {
        options.title = title.to_string();
    }

    build_scene(graph, &layout, &options).context("Failed to build scene")
}
