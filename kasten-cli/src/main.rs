//! Kasten CLI - 3D graph explorer for AsciiDoc Zettelkasten notes
//!
//! Scans a notes directory, links every note to the tags it declares and
//! renders the resulting graph as an interactive 3D page.

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;
mod page;

use commands::*;
use config::{ConverterKind, KastenConfig};
use output::{OutputConfig, OutputFormat};

/// 3D graph explorer for Zettelkasten notes.
///
/// Kasten reads the AsciiDoc notes in a directory, connects each note to
/// the tags on its `:tags:` line and lays the graph out in 3D.
#[derive(Parser)]
#[command(name = "kasten")]
#[command(author, version)]
#[command(about = "3D graph explorer for Zettelkasten notes")]
#[command(propagate_version = true)]
#[command(after_help = "Examples:
  kasten render               Render ./permanent to kasten-graph.html
  kasten render notes --open  Render ./notes and open it in the browser
  kasten scene -o scene.json  Export the scene description as JSON
  kasten stats                Count notes, tags and links")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format (overrides config default)
    #[arg(long, global = true, value_enum)]
    format: Option<OutputFormat>,

    /// Compact output (minified JSON, borderless tables)
    #[arg(long, global = true)]
    compact: bool,

    /// Preview converter (overrides config default)
    #[arg(long, global = true, value_enum)]
    converter: Option<ConverterKind>,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the note graph to an interactive HTML page
    #[command(visible_alias = "r")]
    Render {
        /// Notes directory (defaults to config, then ./permanent)
        dir: Option<String>,

        /// Output HTML file
        #[arg(short, long)]
        output: Option<String>,

        /// Layout seed
        #[arg(long)]
        seed: Option<u64>,

        /// Open the page in the default browser
        #[arg(long)]
        open: bool,
    },

    /// Export the scene description as JSON
    Scene {
        /// Notes directory (defaults to config, then ./permanent)
        dir: Option<String>,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<String>,

        /// Layout seed
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show note, tag and link counts
    Stats {
        /// Notes directory (defaults to config, then ./permanent)
        dir: Option<String>,

        /// Number of top tags to list
        #[arg(short = 'n', long = "limit", default_value = "10")]
        limit: usize,
    },
}

fn setup_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Load configuration from .kastenrc.toml
    let config = KastenConfig::load(std::path::Path::new("."));

    // Resolve output format: CLI flag > config default > Table
    let format = cli.format.unwrap_or_else(|| {
        config
            .default_format()
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Table)
    });

    let output_config = OutputConfig::new(format, cli.compact || config.compact());

    if let Some(use_color) = config.use_color() {
        colored::control::set_override(use_color);
    }

    let command = match cli.command {
        Some(cmd) => cmd,
        None => {
            let _ = Cli::command().print_help();
            println!();
            return Ok(());
        }
    };

    match command {
        Commands::Render {
            dir,
            output,
            seed,
            open,
        } => render::run(
            render::RenderArgs {
                dir: dir.as_deref(),
                output: output.as_deref(),
                converter: cli.converter,
                seed,
                open,
            },
            &config,
            &output_config,
        ),
        Commands::Scene { dir, output, seed } => scene::run(
            dir.as_deref(),
            output.as_deref(),
            cli.converter,
            seed,
            &config,
            &output_config,
        ),
        Commands::Stats { dir, limit } => stats::run(
            dir.as_deref(),
            limit,
            cli.converter,
            &config,
            &output_config,
        ),
    }
}
