//! Stats command - Summarise the note graph
//!
//! Extracts the graph without laying it out and reports how many notes,
//! tags and links it holds, plus the most used tags.

use crate::config::{ConverterKind, KastenConfig};
use crate::output::{Output, OutputConfig, TableDisplay, TableOutput};
use anyhow::Result;
use colored::Colorize;
use kasten_core::{NodeGroup, NoteGraph};
use serde::Serialize;

/// How many notes reference a tag
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagUsage {
    pub tag: String,
    pub notes: usize,
}

/// Stats result
#[derive(Debug, Serialize)]
pub struct StatsResult {
    pub directory: String,
    pub note_count: usize,
    pub tag_count: usize,
    pub edge_count: usize,
    /// Notes without any tag
    pub untagged: Vec<String>,
    pub top_tags: Vec<TagUsage>,
}

impl StatsResult {
    pub fn from_graph(directory: &str, graph: &NoteGraph, limit: usize) -> Self {
        let mut top_tags: Vec<TagUsage> = graph
            .nodes()
            .filter(|n| n.group == NodeGroup::Tag)
            .map(|n| TagUsage {
                tag: n.id.clone(),
                notes: graph.degree(&n.id),
            })
            .collect();
        top_tags.sort_by(|a, b| b.notes.cmp(&a.notes).then_with(|| a.tag.cmp(&b.tag)));
        top_tags.truncate(limit);

        let untagged = graph
            .nodes()
            .filter(|n| n.group == NodeGroup::Note && graph.degree(&n.id) == 0)
            .map(|n| n.id.clone())
            .collect();

        Self {
            directory: directory.to_string(),
            note_count: graph.note_count(),
            tag_count: graph.tag_count(),
            edge_count: graph.edge_count(),
            untagged,
            top_tags,
        }
    }
}

impl TableDisplay for StatsResult {
    fn to_table(&self, config: &OutputConfig) -> String {
        let mut output = format!("{} {}\n", "Notes directory:".bold(), self.directory.cyan());

        output.push_str(&TableOutput::format_key_value(
            &[
                ("Notes", self.note_count.to_string()),
                ("Tags", self.tag_count.to_string()),
                ("Links", self.edge_count.to_string()),
                ("Untagged notes", self.untagged.len().to_string()),
            ],
            config,
        ));

        if !self.top_tags.is_empty() {
            let rows: Vec<Vec<String>> = self
                .top_tags
                .iter()
                .map(|t| vec![t.tag.clone(), t.notes.to_string()])
                .collect();
            output.push_str(&format!("\n\n{}\n", "Top tags".bold()));
            output.push_str(&TableOutput::from_rows(&["Tag", "Notes"], &rows, config));
        }

        output
    }
}

/// Run the stats command
pub fn run(
    dir: Option<&str>,
    limit: usize,
    converter: Option<ConverterKind>,
    config: &KastenConfig,
    output_config: &OutputConfig,
) -> Result<()> {
    let dir = config.notes_directory(dir);
    let graph = super::load_graph(&dir, config, converter)?;
    let result = StatsResult::from_graph(&dir.display().to_string(), &graph, limit);
    Output::new(result, output_config).render()
}
