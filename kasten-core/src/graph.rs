//! Note/tag graph powered by petgraph.
//!
//! Holds an in-memory undirected simple graph where:
//! - Nodes are notes (keyed by file stem) or tags (keyed by tag text)
//! - Edges connect a note to every tag it declares
//!
//! Notes and tags share one identifier namespace. A tag spelled exactly like
//! a note identifier resolves to that note's node; the merge is logged.
//!
//! Nodes and edges are never removed, so petgraph's dense indices double as
//! insertion order. Every iterator here yields in that order, which keeps the
//! parallel scene arrays aligned from run to run.

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Kind of a graph node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeGroup {
    Note,
    Tag,
}

impl NodeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Tag => "tag",
        }
    }
}

/// Attributes carried by a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: String,
    pub group: NodeGroup,
    /// Display title (notes only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// HTML preview fragment (notes only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl NodeData {
    /// Label shown next to the node: the title, else the identifier.
    pub fn label(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.id)
    }

    /// Hover content: the preview, else an empty string.
    pub fn hover(&self) -> &str {
        self.preview.as_deref().unwrap_or("")
    }
}

/// Undirected note/tag graph with insertion-ordered iteration.
#[derive(Debug, Default, Clone)]
pub struct NoteGraph {
    graph: UnGraph<NodeData, ()>,
    node_map: HashMap<String, NodeIndex>,
}

impl NoteGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a note, or overwrite the node with the same identifier.
    ///
    /// Later writes win: re-adding a note replaces its title and preview.
    pub fn upsert_note(&mut self, id: &str, title: String, preview: String) -> NodeIndex {
        let data = NodeData {
            id: id.to_string(),
            group: NodeGroup::Note,
            title: Some(title),
            preview: Some(preview),
        };

        match self.node_map.get(id) {
            Some(&idx) => {
                if self.graph[idx].group == NodeGroup::Tag {
                    tracing::warn!("Note '{}' shares its identifier with a tag; merging", id);
                }
                self.graph[idx] = data;
                idx
            }
            None => self.insert(data),
        }
    }

    /// Insert a tag unless a node with that identifier already exists.
    ///
    /// An existing node keeps its attributes untouched.
    pub fn ensure_tag(&mut self, tag: &str) -> NodeIndex {
        match self.node_map.get(tag) {
            Some(&idx) => {
                if self.graph[idx].group == NodeGroup::Note {
                    tracing::warn!("Tag '{}' shares its identifier with a note; merging", tag);
                }
                idx
            }
            None => self.insert(NodeData {
                id: tag.to_string(),
                group: NodeGroup::Tag,
                title: None,
                preview: None,
            }),
        }
    }

    /// Connect two existing nodes.
    ///
    /// Returns `true` if a new edge was added, `false` if the edge already
    /// existed or either endpoint is unknown.
    pub fn link(&mut self, a: &str, b: &str) -> bool {
        let (Some(&ia), Some(&ib)) = (self.node_map.get(a), self.node_map.get(b)) else {
            return false;
        };

        if self.graph.find_edge(ia, ib).is_some() {
            return false;
        }
        self.graph.add_edge(ia, ib, ());
        true
    }

    fn insert(&mut self, data: NodeData) -> NodeIndex {
        let id = data.id.clone();
        let idx = self.graph.add_node(data);
        self.node_map.insert(id, idx);
        idx
    }

    /// Look up a node by identifier.
    pub fn node(&self, id: &str) -> Option<&NodeData> {
        self.node_map.get(id).map(|&idx| &self.graph[idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.node_map.contains_key(id)
    }

    /// All nodes, in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeData> + '_ {
        self.graph.node_weights()
    }

    /// All edges as identifier pairs, in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.graph.edge_references().map(|edge| {
            (
                self.graph[edge.source()].id.as_str(),
                self.graph[edge.target()].id.as_str(),
            )
        })
    }

    /// Identifiers adjacent to `id`, sorted.
    pub fn neighbors(&self, id: &str) -> Vec<&str> {
        let Some(&idx) = self.node_map.get(id) else {
            return vec![];
        };

        let mut ids: Vec<&str> = self
            .graph
            .neighbors(idx)
            .map(|n| self.graph[n].id.as_str())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// Number of edges touching `id`.
    pub fn degree(&self, id: &str) -> usize {
        self.node_map
            .get(id)
            .map(|&idx| self.graph.edges(idx).count())
            .unwrap_or(0)
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn note_count(&self) -> usize {
        self.count_group(NodeGroup::Note)
    }

    pub fn tag_count(&self) -> usize {
        self.count_group(NodeGroup::Tag)
    }

    fn count_group(&self, group: NodeGroup) -> usize {
        self.nodes().filter(|n| n.group == group).count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}
