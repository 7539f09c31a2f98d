//! HTML rendering surface for a scene description.
//!
//! Produces a self-contained page that loads plotly.js from its CDN and
//! draws two `scatter3d` traces: one line trace holding every edge and one
//! marker trace for the nodes, with the note preview shown on hover.

use kasten_core::SceneDescription;
use serde_json::{json, Value};
use std::path::Path;
use std::process::Command;

const PLOTLY_CDN: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";
const HOVER_TEMPLATE: &str = "%{text}<br>%{customdata}<extra></extra>";

/// Build the plotly figure (`data` + `layout`) for a scene.
pub fn figure(scene: &SceneDescription) -> Value {
    let p = &scene.presentation;
    let hidden_axis = json!({ "visible": p.axes_visible });

    let edge_trace = json!({
        "type": "scatter3d",
        "mode": "lines",
        "x": scene.edges.x,
        "y": scene.edges.y,
        "z": scene.edges.z,
        "line": { "color": p.edge_color, "width": p.edge_width },
        "hoverinfo": "none",
        "showlegend": false,
    });

    let node_trace = json!({
        "type": "scatter3d",
        "mode": "markers+text",
        "x": scene.nodes.x,
        "y": scene.nodes.y,
        "z": scene.nodes.z,
        "text": scene.nodes.labels,
        "textposition": "top center",
        "marker": {
            "size": p.marker_size,
            "color": scene.nodes.colors,
            "opacity": p.marker_opacity,
        },
        "customdata": scene.nodes.hovers,
        "hovertemplate": HOVER_TEMPLATE,
        "showlegend": false,
    });

    json!({
        "data": [edge_trace, node_trace],
        "layout": {
            "title": { "text": p.title },
            "margin": { "l": 0, "r": 0, "t": 30, "b": 0 },
            "scene": {
                "xaxis": hidden_axis,
                "yaxis": hidden_axis,
                "zaxis": hidden_axis,
            },
            "paper_bgcolor": p.background_color,
            "plot_bgcolor": p.background_color,
            "font": { "color": p.font_color },
        },
    })
}

/// Render the complete HTML page for a scene.
pub fn render_html(scene: &SceneDescription) -> anyhow::Result<String> {
    // Previews carry markup such as `</b>`; keep `</` from closing the script tag.
    let figure = serde_json::to_string(&figure(scene))?.replace("</", "<\\/");
    let title = kasten_core::converter::escape_html(&scene.presentation.title);
    let background = &scene.presentation.background_color;

    Ok(format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{PLOTLY_CDN}"></script>
<style>html, body, #graph {{ margin: 0; width: 100%; height: 100%; background: {background}; }}</style>
</head>
<body>
<div id="graph"></div>
<script>
const figure = {figure};
Plotly.newPlot("graph", figure.data, figure.layout, {{ responsive: true }});
</script>
</body>
</html>
"#
    ))
}

/// Open `path` with the platform's default handler.
pub fn open_in_browser(path: &Path) -> anyhow::Result<()> {
    let opener = if cfg!(target_os = "macos") {
        "open"
    } else if cfg!(target_os = "windows") {
        "explorer"
    } else {
        "xdg-open"
    };

    tracing::debug!("Opening {:?} with {}", path, opener);
    Command::new(opener)
        .arg(path)
        .spawn()
        .map_err(|e| anyhow::anyhow!("Failed to launch '{}': {}", opener, e))?;
    Ok(())
}
