//! Kasten configuration loading from `.kastenrc.toml`.
//!
//! Configuration is optional - Kasten uses the defaults below when no
//! config file exists. Command-line flags override file settings.
//!
//! # Example Configuration
//!
//! ```toml
//! [notes]
//! directory = "permanent"
//! extension = "adoc"
//! parallel = true
//!
//! [converter]
//! kind = "asciidoctor"   # or "plain"
//! program = "asciidoctor"
//!
//! [layout]
//! seed = 42
//! iterations = 50
//!
//! [render]
//! output = "kasten-graph.html"
//! title = "Zettelkasten 3D Graph"
//! open = false
//!
//! [output]
//! format = "table"
//! color = true
//! ```

use clap::ValueEnum;
use kasten_core::{AsciidoctorConverter, PlainTextConverter, PreviewConverter};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the config file looked up in the working directory.
pub const CONFIG_FILE: &str = ".kastenrc.toml";

/// Notes directory used when neither the CLI nor the config names one.
const DEFAULT_NOTES_DIR: &str = "permanent";
const DEFAULT_OUTPUT_FILE: &str = "kasten-graph.html";

/// Root configuration structure loaded from `.kastenrc.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct KastenConfig {
    #[serde(default)]
    pub notes: NotesConfig,

    #[serde(default)]
    pub converter: ConverterConfig,

    #[serde(default)]
    pub layout: LayoutConfig,

    #[serde(default)]
    pub render: RenderConfig,

    /// Output formatting preferences.
    #[serde(default)]
    pub output: OutputSettings,
}

/// Where notes live and how they are read.
#[derive(Debug, Deserialize, Default)]
pub struct NotesConfig {
    /// Notes directory, relative to the working directory.
    ///
    /// Default: `permanent`
    #[serde(default)]
    pub directory: Option<String>,

    /// Note file extension.
    ///
    /// Default: `adoc`
    #[serde(default)]
    pub extension: Option<String>,

    /// Read and convert notes in parallel.
    ///
    /// Default: `true`
    #[serde(default)]
    pub parallel: Option<bool>,
}

/// Which preview converter to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ConverterKind {
    /// Render previews with the `asciidoctor` tool
    #[default]
    Asciidoctor,
    /// Use the raw note text, no external tool needed
    Plain,
}

/// Preview converter settings.
#[derive(Debug, Deserialize, Default)]
pub struct ConverterConfig {
    #[serde(default)]
    pub kind: ConverterKind,

    /// Program to invoke for `kind = "asciidoctor"`.
    #[serde(default)]
    pub program: Option<String>,
}

/// Layout settings.
#[derive(Debug, Deserialize, Default)]
pub struct LayoutConfig {
    /// Layout seed; identical seeds give identical scenes.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Spring simulation iterations.
    #[serde(default)]
    pub iterations: Option<usize>,
}

/// HTML rendering settings.
#[derive(Debug, Deserialize, Default)]
pub struct RenderConfig {
    #[serde(default)]
    pub output: Option<String>,

    #[serde(default)]
    pub title: Option<String>,

    /// Open the rendered page in the browser.
    #[serde(default)]
    pub open: bool,
}

/// Output formatting preferences.
///
/// Command-line flags (e.g., `--format json`) override these settings.
#[derive(Debug, Deserialize, Default)]
pub struct OutputSettings {
    /// Valid values: `table`, `json`. Default: `table`
    #[serde(default)]
    pub format: Option<String>,

    /// Defaults to `true` when stdout is a TTY.
    #[serde(default)]
    pub color: Option<bool>,

    /// Minified JSON and borderless tables. Default: `false`
    #[serde(default)]
    pub compact: bool,
}

impl KastenConfig {
    /// Load configuration from `.kastenrc.toml` in the given directory.
    ///
    /// If the config file doesn't exist or can't be parsed, returns defaults.
    /// Parse errors are logged as warnings but don't cause failures.
    pub fn load(root: &Path) -> Self {
        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            match std::fs::read_to_string(&config_path) {
                Ok(content) => match toml::from_str(&content) {
                    Ok(config) => return config,
                    Err(e) => {
                        tracing::warn!("Failed to parse {}: {}", CONFIG_FILE, e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read {}: {}", CONFIG_FILE, e);
                }
            }
        }
        Self::default()
    }

    /// Notes directory: CLI argument, else config, else `permanent`.
    pub fn notes_directory(&self, cli_dir: Option<&str>) -> PathBuf {
        PathBuf::from(
            cli_dir
                .or(self.notes.directory.as_deref())
                .unwrap_or(DEFAULT_NOTES_DIR),
        )
    }

    pub fn extension(&self) -> &str {
        self.notes
            .extension
            .as_deref()
            .unwrap_or(kasten_core::DEFAULT_EXTENSION)
    }

    pub fn parallel(&self) -> bool {
        self.notes.parallel.unwrap_or(true)
    }

    /// Build the preview converter, honouring a CLI override.
    pub fn converter(&self, cli_kind: Option<ConverterKind>) -> Box<dyn PreviewConverter> {
        match cli_kind.unwrap_or(self.converter.kind) {
            ConverterKind::Asciidoctor => match &self.converter.program {
                Some(program) => Box::new(AsciidoctorConverter::new(program.clone())),
                None => Box::new(AsciidoctorConverter::default()),
            },
            ConverterKind::Plain => Box::new(PlainTextConverter),
        }
    }

    pub fn seed(&self, cli_seed: Option<u64>) -> u64 {
        cli_seed
            .or(self.layout.seed)
            .unwrap_or(kasten_core::DEFAULT_SEED)
    }

    pub fn iterations(&self) -> Option<usize> {
        self.layout.iterations
    }

    pub fn output_file(&self, cli_output: Option<&str>) -> PathBuf {
        PathBuf::from(
            cli_output
                .or(self.render.output.as_deref())
                .unwrap_or(DEFAULT_OUTPUT_FILE),
        )
    }

    pub fn title(&self) -> Option<&str> {
        self.render.title.as_deref()
    }

    pub fn open_browser(&self, cli_open: bool) -> bool {
        cli_open || self.render.open
    }

    /// Get the default output format, if configured.
    pub fn default_format(&self) -> Option<&str> {
        self.output.format.as_deref()
    }

    /// Whether compact output is configured.
    pub fn compact(&self) -> bool {
        self.output.compact
    }

    /// Returns the configured value, or `None` to use auto-detection.
    pub fn use_color(&self) -> Option<bool> {
        self.output.color
    }
}
