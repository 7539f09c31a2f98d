//! Render command - Build the 3D graph page
//!
//! Runs the whole pipeline (notes -> graph -> scene) and writes the scene as
//! a standalone plotly.js HTML page. Nothing is written unless every note
//! was extracted and every node was positioned.

use crate::config::{ConverterKind, KastenConfig};
use crate::output::{Output, OutputConfig, TableDisplay};
use crate::page;
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;

/// Render result
#[derive(Debug, Serialize)]
pub struct RenderResult {
    pub output_path: String,
    pub note_count: usize,
    pub tag_count: usize,
    pub node_count: usize,
    pub edge_count: usize,
    pub opened: bool,
}

impl TableDisplay for RenderResult {
    fn to_table(&self, _config: &OutputConfig) -> String {
        let mut output = format!(
            "{} Rendered {} notes and {} tags ({} edges) to {}",
            "SUCCESS:".green().bold(),
            self.note_count,
            self.tag_count,
            self.edge_count,
            self.output_path.cyan()
        );
        if self.node_count == 0 {
            output.push_str(&format!("\n{}", "No notes found; the scene is empty.".dimmed()));
        }
        output
    }
}

/// Options for the render command
pub struct RenderArgs<'a> {
    pub dir: Option<&'a str>,
    pub output: Option<&'a str>,
    pub converter: Option<ConverterKind>,
    pub seed: Option<u64>,
    pub open: bool,
}

/// Run the render command
pub fn run(
    args: RenderArgs<'_>,
    config: &KastenConfig,
    output_config: &OutputConfig,
) -> Result<()> {
    let dir = config.notes_directory(args.dir);
    let graph = super::load_graph(&dir, config, args.converter)?;
    let scene = super::load_scene(&graph, config, args.seed)?;

    let html = page::render_html(&scene)?;
    let output_path = config.output_file(args.output);
    fs::write(&output_path, html)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;
    tracing::info!("Wrote scene to {:?}", output_path);

    let opened = config.open_browser(args.open);
    if opened {
        page::open_in_browser(&output_path)?;
    }

    let result = RenderResult {
        output_path: output_path.display().to_string(),
        note_count: graph.note_count(),
        tag_count: graph.tag_count(),
        node_count: scene.node_count(),
        edge_count: scene.edge_count(),
        opened,
    };

    Output::new(result, output_config).render()
}
