//! Output formatting for the Kasten CLI
//!
//! Command results implement [`TableDisplay`] and are printed through
//! [`Output`], which picks the human-readable table form or JSON depending
//! on `--format`.

use clap::ValueEnum;
use serde::Serialize;
use std::str::FromStr;

mod json;
mod table;

pub use self::json::JsonOutput;
pub use self::table::TableOutput;

/// Output format for CLI results
#[derive(Debug, Clone, Copy, Default, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable table format (default)
    #[default]
    Table,
    /// JSON format for machine consumption
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown output format: '{}'", s)),
        }
    }
}

/// Configuration for output rendering
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Compact mode (minified JSON, borderless tables)
    pub compact: bool,
}

impl OutputConfig {
    pub fn new(format: OutputFormat, compact: bool) -> Self {
        Self { format, compact }
    }
}

/// Trait for types that can be formatted as output
pub trait Outputter: Serialize + Sized {
    fn to_table(&self, config: &OutputConfig) -> String;

    fn to_json(&self, config: &OutputConfig) -> String {
        JsonOutput::format(self, config)
    }

    /// Render using the format specified in config
    fn render(&self, config: &OutputConfig) -> String {
        match config.format {
            OutputFormat::Table => self.to_table(config),
            OutputFormat::Json => self.to_json(config),
        }
    }

    /// Render and print to stdout
    fn output(&self, config: &OutputConfig) {
        println!("{}", self.render(config));
    }
}

/// Result wrapper for formatted output with automatic format selection
pub struct Output<T> {
    data: T,
    config: OutputConfig,
}

impl<T: Outputter> Output<T> {
    pub fn new(data: T, config: &OutputConfig) -> Self {
        Self {
            data,
            config: config.clone(),
        }
    }

    /// Render the output to stdout
    pub fn render(&self) -> anyhow::Result<()> {
        self.data.output(&self.config);
        Ok(())
    }
}

/// Types that know their human-readable form
pub trait TableDisplay: Serialize {
    fn to_table(&self, config: &OutputConfig) -> String;
}

impl<T: TableDisplay + Serialize> Outputter for T {
    fn to_table(&self, config: &OutputConfig) -> String {
        TableDisplay::to_table(self, config)
    }
}
