//! Huddle CLI: inspect the client core and replay recorded sessions.
//!
//! Usage:
//!   huddle events [--json]        List native events and their aliases
//!   huddle config                 Print the effective configuration
//!   huddle replay <TRACE>         Replay a JSONL client trace headlessly

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use huddle_common::config::{AppConfig, RenderPreference};

mod commands;

#[derive(Parser)]
#[command(
    name = "huddle",
    about = "Video-conferencing client core: event catalogue and trace replay",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to the standard location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the native event catalogue and the names each event is emitted under
    Events {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration
    Config,

    /// Replay a JSONL trace through a loopback engine and headless renderers
    Replay {
        /// Path to the trace file
        trace: PathBuf,

        /// Renderer selection: auto|accelerated|software
        #[arg(long)]
        mode: Option<RenderPreference>,

        /// Simulate a system without an accelerated drawing context
        #[arg(long)]
        no_accelerated: bool,

        /// Only print the summary
        #[arg(short, long)]
        quiet: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    huddle_common::logging::init_logging(&config.logging);

    match cli.command {
        Commands::Events { json } => commands::events::run(json),
        Commands::Config => commands::config::run(&config),
        Commands::Replay {
            trace,
            mode,
            no_accelerated,
            quiet,
        } => {
            if let Some(mode) = mode {
                config.render.mode = mode;
            }
            commands::replay::run(trace, config, !no_accelerated, quiet)
        }
    }
}
