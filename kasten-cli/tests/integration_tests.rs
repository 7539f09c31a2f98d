//! Integration tests for the Kasten CLI
//!
//! Tests end-to-end command behavior using the CLI binary.
//! Uses tempfile for isolated note directories and the plain converter so
//! asciidoctor does not need to be installed.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// Get the path to the kasten binary (built by cargo)
fn kasten_binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_kasten"))
}

/// Run kasten in the specified directory with logging silenced
fn run_kasten(dir: &Path, args: &[&str]) -> Output {
    kasten_binary()
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("Failed to execute kasten command")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Create ./permanent with two tagged notes
fn setup_sample_notes(dir: &Path) {
    let notes = dir.join("permanent");
    fs::create_dir(&notes).unwrap();
    fs::write(
        notes.join("a.adoc"),
        "= Alpha\n:tags: x, y\n\nFirst note.\n\nReferences\n",
    )
    .unwrap();
    fs::write(notes.join("b.adoc"), "= Beta\n:tags: y\n\nSecond </script> note.\n").unwrap();
}

// ============================================================================
// Commands
// ============================================================================

#[test]
fn test_no_command_prints_help() {
    let dir = TempDir::new().unwrap();
    let output = run_kasten(dir.path(), &[]);

    assert!(output.status.success());
    assert!(stdout(&output).contains("render"));
}

#[test]
fn test_scene_json_to_stdout() {
    let dir = TempDir::new().unwrap();
    setup_sample_notes(dir.path());

    let output = run_kasten(dir.path(), &["scene", "--converter", "plain"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let scene: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(scene["nodes"]["ids"], serde_json::json!(["a", "x", "y", "b"]));
    assert_eq!(
        scene["nodes"]["labels"],
        serde_json::json!(["Alpha", "x", "y", "Beta"])
    );
    assert_eq!(scene["edges"]["x"].as_array().unwrap().len(), 9);
    assert!(scene["edges"]["x"][2].is_null());
    assert_eq!(scene["presentation"]["background_color"], "black");
}

#[test]
fn test_scene_is_reproducible() {
    let dir = TempDir::new().unwrap();
    setup_sample_notes(dir.path());

    let first = run_kasten(dir.path(), &["scene", "--converter", "plain"]);
    let second = run_kasten(dir.path(), &["scene", "--converter", "plain"]);
    assert_eq!(stdout(&first), stdout(&second));

    let other_seed = run_kasten(dir.path(), &["scene", "--converter", "plain", "--seed", "7"]);
    assert_ne!(stdout(&first), stdout(&other_seed));
}

#[test]
fn test_render_writes_html() {
    let dir = TempDir::new().unwrap();
    setup_sample_notes(dir.path());

    let output = run_kasten(
        dir.path(),
        &["render", "--converter", "plain", "-o", "graph.html", "--format", "json"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let result: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(result["note_count"], 2);
    assert_eq!(result["tag_count"], 2);
    assert_eq!(result["edge_count"], 3);

    let html = fs::read_to_string(dir.path().join("graph.html")).unwrap();
    assert!(html.contains("Plotly.newPlot"));
    assert!(html.contains("Alpha"));
    assert!(html.contains("<br><b>References<\\/b><br>"));
}

#[test]
fn test_render_uses_config_file() {
    let dir = TempDir::new().unwrap();
    let notes = dir.path().join("zettel");
    fs::create_dir(&notes).unwrap();
    fs::write(notes.join("only.txt"), "= Only\n:tags: solo\n").unwrap();
    fs::write(
        dir.path().join(".kastenrc.toml"),
        r#"
[notes]
directory = "zettel"
extension = "txt"

[converter]
kind = "plain"

[render]
output = "custom.html"
title = "Slip box"
"#,
    )
    .unwrap();

    let output = run_kasten(dir.path(), &["render"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let html = fs::read_to_string(dir.path().join("custom.html")).unwrap();
    assert!(html.contains("<title>Slip box</title>"));
    assert!(html.contains("solo"));
}

#[test]
fn test_stats_json() {
    let dir = TempDir::new().unwrap();
    setup_sample_notes(dir.path());

    let output = run_kasten(
        dir.path(),
        &["stats", "--converter", "plain", "--format", "json"],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let stats: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(stats["note_count"], 2);
    assert_eq!(stats["tag_count"], 2);
    assert_eq!(stats["edge_count"], 3);
    assert_eq!(stats["top_tags"][0]["tag"], "y");
    assert_eq!(stats["top_tags"][0]["notes"], 2);
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn test_empty_directory_renders_empty_scene() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("permanent")).unwrap();

    let output = run_kasten(dir.path(), &["scene", "--converter", "plain"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let scene: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(scene["nodes"]["ids"].as_array().unwrap().len(), 0);
    assert_eq!(scene["edges"]["x"].as_array().unwrap().len(), 0);
}

#[test]
fn test_missing_directory_fails() {
    let dir = TempDir::new().unwrap();

    let output = run_kasten(dir.path(), &["render", "--converter", "plain"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("permanent"));
    assert!(!dir.path().join("kasten-graph.html").exists());
}

#[test]
fn test_unreadable_note_fails_without_output() {
    let dir = TempDir::new().unwrap();
    setup_sample_notes(dir.path());
    fs::write(dir.path().join("permanent/broken.adoc"), [0xff, 0xfe, 0x80]).unwrap();

    let output = run_kasten(dir.path(), &["render", "--converter", "plain"]);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("broken.adoc"));
    assert!(!dir.path().join("kasten-graph.html").exists());
}

#[test]
fn test_converter_failure_names_file() {
    let dir = TempDir::new().unwrap();
    setup_sample_notes(dir.path());
    fs::write(
        dir.path().join(".kastenrc.toml"),
        "[converter]\nkind = \"asciidoctor\"\nprogram = \"kasten-test-missing-asciidoctor\"\n",
    )
    .unwrap();

    let output = run_kasten(dir.path(), &["render"]);
    assert!(!output.status.success());

    let err = stderr(&output);
    assert!(err.contains("Preview conversion failed"));
    assert!(err.contains(".adoc"));
    assert!(!dir.path().join("kasten-graph.html").exists());
}

#[cfg(unix)]
#[test]
fn test_converter_exit_status_names_file() {
    let dir = TempDir::new().unwrap();
    setup_sample_notes(dir.path());
    fs::write(
        dir.path().join(".kastenrc.toml"),
        "[converter]\nkind = \"asciidoctor\"\nprogram = \"false\"\n",
    )
    .unwrap();

    let output = run_kasten(dir.path(), &["scene"]);
    assert!(!output.status.success());

    let err = stderr(&output);
    assert!(err.contains("Preview conversion failed"));
    assert!(err.contains("Converter exited with status 1"));
    assert!(err.contains(".adoc"));
    assert!(stdout(&output).is_empty());
}

#[test]
fn test_compact_scene_json() {
    let dir = TempDir::new().unwrap();
    setup_sample_notes(dir.path());

    let output = run_kasten(dir.path(), &["scene", "--converter", "plain", "--compact"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert_eq!(out.trim_end().lines().count(), 1);
    let scene: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(scene["nodes"]["ids"].as_array().unwrap().len(), 4);
}
