//! Scene command - Dump the scene description as JSON
//!
//! The JSON document is the renderer-agnostic hand-off: parallel node
//! arrays, edge polylines with `null` breaks and presentation settings.

use crate::config::{ConverterKind, KastenConfig};
use crate::output::{Output, OutputConfig, TableDisplay};
use anyhow::{Context, Result};
use colored::Colorize;
use serde::Serialize;
use std::fs;

/// Summary printed when the scene is written to a file
#[derive(Debug, Serialize)]
pub struct SceneResult {
    pub output_path: String,
    pub node_count: usize,
    pub edge_count: usize,
}

impl TableDisplay for SceneResult {
    fn to_table(&self, _config: &OutputConfig) -> String {
        format!(
            "{} Exported {} nodes, {} edges to {}",
            "SUCCESS:".green().bold(),
            self.node_count,
            self.edge_count,
            self.output_path.cyan()
        )
    }
}

/// Run the scene command
pub fn run(
    dir: Option<&str>,
    output: Option<&str>,
    converter: Option<ConverterKind>,
    seed: Option<u64>,
    config: &KastenConfig,
    output_config: &OutputConfig,
) -> Result<()> {
    let dir = config.notes_directory(dir);
    let graph = super::load_graph(&dir, config, converter)?;
    let scene = super::load_scene(&graph, config, seed)?;

    let json = if output_config.compact {
        serde_json::to_string(&scene)
    } else {
        serde_json::to_string_pretty(&scene)
    }
    .context("Failed to serialize scene")?;

    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path))?;
            let result = SceneResult {
                output_path: path.to_string(),
                node_count: scene.node_count(),
                edge_count: scene.edge_count(),
            };
            Output::new(result, output_config).render()
        }
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}
