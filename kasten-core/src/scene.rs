//! Scene assembly: positioned, styled nodes and edges for a 3D renderer.
//!
//! The scene is column-oriented: node attributes live in parallel arrays
//! indexed by node position in the graph, and edges are flattened into
//! polyline coordinates where each edge contributes `start, end, None`.
//! The `None` break lets a renderer draw every edge as one line primitive.

use serde::{Deserialize, Serialize};

use crate::error::{KastenError, Result};
use crate::graph::{NodeGroup, NoteGraph};
use crate::layout::{Layout, DEFAULT_SEED};

/// Marker color for note nodes.
pub const NOTE_COLOR: &str = "orange";
/// Marker color for tag nodes.
pub const TAG_COLOR: &str = "skyblue";

/// Options for [`build_scene`].
#[derive(Debug, Clone)]
pub struct SceneOptions {
    /// Seed handed to the layout function.
    pub seed: u64,
    /// Scene title shown by the renderer.
    pub title: String,
}

impl Default for SceneOptions {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            title: "Zettelkasten 3D Graph".to_string(),
        }
    }
}

/// Per-node attribute arrays, all of equal length.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeLists {
    pub ids: Vec<String>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
    /// Title, or identifier for nodes without one.
    pub labels: Vec<String>,
    pub colors: Vec<String>,
    /// Preview fragment, or empty.
    pub hovers: Vec<String>,
}

/// Edge polylines; `None` separates consecutive segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EdgeLists {
    pub x: Vec<Option<f64>>,
    pub y: Vec<Option<f64>>,
    pub z: Vec<Option<f64>>,
}

impl EdgeLists {
    fn push_segment(&mut self, start: [f64; 3], end: [f64; 3]) {
        self.x.extend([Some(start[0]), Some(end[0]), None]);
        self.y.extend([Some(start[1]), Some(end[1]), None]);
        self.z.extend([Some(start[2]), Some(end[2]), None]);
    }
}

/// Static presentation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Presentation {
    pub title: String,
    pub background_color: String,
    pub font_color: String,
    pub axes_visible: bool,
    pub edge_color: String,
    pub edge_width: f64,
    pub marker_size: f64,
    pub marker_opacity: f64,
}

impl Presentation {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            background_color: "black".to_string(),
            font_color: "white".to_string(),
            axes_visible: false,
            edge_color: "gray".to_string(),
            edge_width: 2.0,
            marker_size: 10.0,
            marker_opacity: 0.9,
        }
    }
}

/// Everything a renderer needs to draw the graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub nodes: NodeLists,
    pub edges: EdgeLists,
    pub presentation: Presentation,
}

impl SceneDescription {
    fn empty(options: &SceneOptions) -> Self {
        Self {
            nodes: NodeLists::default(),
            edges: EdgeLists::default(),
            presentation: Presentation::new(&options.title),
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.ids.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.x.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.ids.is_empty()
    }
}

fn group_color(group: NodeGroup) -> &'static str {
    match group {
        NodeGroup::Note => NOTE_COLOR,
        NodeGroup::Tag => TAG_COLOR,
    }
}

/// Lay out `graph` and assemble its scene description.
///
/// An empty graph yields an empty scene without calling the layout.
///
/// # Errors
///
/// - `Layout` if the layout function fails
/// - `LayoutIncomplete` if any node is left without a position; no scene
///   is produced in that case
pub fn build_scene(
    graph: &NoteGraph,
    layout: &dyn Layout,
    options: &SceneOptions,
) -> Result<SceneDescription> {
    if graph.is_empty() {
        tracing::info!("Graph is empty; producing an empty scene");
        return Ok(SceneDescription::empty(options));
    }

    let positions = layout.positions(graph, options.seed)?;

    if let Some(missing) = graph.nodes().find(|n| !positions.contains_key(&n.id)) {
        return Err(KastenError::LayoutIncomplete {
            node: missing.id.clone(),
        });
    }

    let mut scene = SceneDescription::empty(options);

    let nodes = &mut scene.nodes;
    for node in graph.nodes() {
        let [x, y, z] = positions[&node.id];
        nodes.ids.push(node.id.clone());
        nodes.x.push(x);
        nodes.y.push(y);
        nodes.z.push(z);
        nodes.labels.push(node.label().to_string());
        nodes.colors.push(group_color(node.group).to_string());
        nodes.hovers.push(node.hover().to_string());
    }

    for (a, b) in graph.edges() {
        scene.edges.push_segment(positions[a], positions[b]);
    }

    tracing::debug!(
        "Built scene with {} nodes and {} edges",
        scene.node_count(),
        scene.edge_count()
    );

    Ok(scene)
}
