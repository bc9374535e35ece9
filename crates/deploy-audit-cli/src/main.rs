//! deploy-audit CLI tool.
//!
//! Usage:
//! ```bash
//! deploy-audit [check] [OPTIONS] [PATH]
//! deploy-audit list-phases
//! deploy-audit init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;
mod config_resolver;

/// Audits Docker deployment configuration of a project
#[derive(Parser)]
#[command(name = "deploy-audit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the audit (default when no subcommand is given)
    Check {
        /// Project root to audit (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Report path, relative to the project root
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Do not write the JSON report file
        #[arg(long)]
        no_write: bool,

        /// Exclude patterns for Dockerfile discovery (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Only run specific phases, by name or code (comma-separated)
        #[arg(long, value_delimiter = ',')]
        phases: Vec<String>,
    },

    /// List available phases
    ListPhases,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for the audit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Progress lines and a human-readable summary.
    #[default]
    Text,
    /// The full result document as JSON on stdout.
    Json,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let code = match cli.command {
        Some(Commands::Check {
            path,
            format,
            output,
            no_write,
            exclude,
            phases,
        }) => commands::check::run(&commands::check::CheckOptions {
            path,
            format,
            output,
            write: !no_write,
            exclude,
            phases,
            config: cli.config,
        })?,
        None => commands::check::run(&commands::check::CheckOptions {
            path: PathBuf::from("."),
            format: OutputFormat::Text,
            output: None,
            write: true,
            exclude: Vec::new(),
            phases: Vec::new(),
            config: cli.config,
        })?,
        Some(Commands::ListPhases) => {
            commands::list_phases::run();
            0
        }
        Some(Commands::Init { force }) => {
            commands::init::run(force)?;
            0
        }
    };

    Ok(ExitCode::from(code))
}
