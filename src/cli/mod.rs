//! Command-line interface for openapi-filter-config
//!
//! Provides `check` and `show` subcommands over a single configuration file.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod check;
mod logging;
mod show;

/// Inspect OpenAPI filter configuration files
#[derive(Parser)]
#[command(name = "openapi-filter-config")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a configuration file and summarise what it keeps
    Check(check::CheckArgs),

    /// Print the normalised configuration
    Show(show::ShowArgs),
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let logging = logging::Logging::init(cli.verbose);

    match cli.command {
        Commands::Check(args) => check::run(args, &logging),
        Commands::Show(args) => show::run(args, &logging),
    }
}
