//! Check command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;
use tracing::info;

use super::logging::Logging;
use openapi_filter_config::load_config;

#[derive(Args)]
pub struct CheckArgs {
    /// Configuration file (.yaml, .yml, .toml or .json)
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

pub fn run(args: CheckArgs, logging: &Logging) -> Result<()> {
    let config = load_config(&args.path)
        .with_context(|| format!("Failed to load config {}", args.path.display()))?;
    logging.apply(&config);
    info!(path = %args.path.display(), "Config is valid");

    let filter = &config.filter;
    println!("Config: {}", args.path.display());
    println!("Logger level: {}", config.logger_level().unwrap_or("(default)"));
    println!("External refs allowed: {}", yes_no(config.external_refs_allowed()));

    println!("Paths: {}", filter.paths.len());
    for (path, entry) in &filter.paths {
        let preserve = if entry.preserve_servers { " (preserve servers)" } else { "" };
        println!("  {} [{}]{}", path, entry.methods.join(", "), preserve);
    }

    let components = filter.components.as_ref().map(|c| c.total()).unwrap_or(0);
    println!("Components: {}", components);

    println!("Sections:");
    println!("  servers: {}", yes_no(filter.servers));
    println!("  preservePathServers: {}", yes_no(filter.preserve_path_servers));
    println!("  security: {}", yes_no(filter.security));
    println!("  tags: {}", yes_no(filter.tags));
    println!("  externalDocs: {}", yes_no(filter.external_docs));

    Ok(())
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}
