//! Command-line front end for the named logger.
//!
//! ```text
//! named-log --config log.json emit --name svc --level warning disk almost full
//! named-log --config log.json show-config
//! ```

use std::fmt::Display;
use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use named_log::observability::logging::init_logging;
use named_log::{Level, Registry};

#[derive(Parser)]
#[command(name = "named-log")]
#[command(about = "Write to and inspect named, leveled logs", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(short, long, default_value = named_log::config::DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Emit one line for a log name
    Emit {
        /// Logical log name
        #[arg(short, long)]
        name: String,

        /// debug, info, warning or error
        #[arg(short, long, default_value = "info")]
        level: Level,

        /// Message words, joined with spaces
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Print the effective configuration as JSON
    ShowConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();
    let cli = Cli::parse();

    let registry = Registry::builder().config_file(&cli.config).build();
    tracing::debug!(config = %cli.config.display(), "Registry ready");

    run(cli.command, &registry, &mut std::io::stdout().lock())
}

fn run(
    command: Commands,
    registry: &Registry,
    out: &mut dyn Write,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Emit { name, level, words } => {
            let parts: Vec<&dyn Display> = words.iter().map(|w| w as &dyn Display).collect();
            registry.log_join(level, &name, &parts);
        }
        Commands::ShowConfig => {
            let config = registry.config();
            writeln!(out, "{}", serde_json::to_string_pretty(&config)?)?;
        }
    }

    Ok(())
}
