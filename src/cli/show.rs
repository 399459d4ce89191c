//! Show command implementation

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

use super::logging::Logging;
use openapi_filter_config::{load_config, Config};

#[derive(Args)]
pub struct ShowArgs {
    /// Configuration file (.yaml, .yml, .toml or .json)
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_name = "FORMAT", default_value = "yaml")]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
    Toml,
}

pub fn run(args: ShowArgs, logging: &Logging) -> Result<()> {
    let config = load_config(&args.path)
        .with_context(|| format!("Failed to load config {}", args.path.display()))?;
    logging.apply(&config);

    let rendered = render(&config, args.format)?;
    println!("{}", rendered.trim_end());
    Ok(())
}

fn render(config: &Config, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            serde_json::to_string_pretty(config).context("Failed to render config as JSON")
        }
        OutputFormat::Yaml => {
            serde_yaml::to_string(config).context("Failed to render config as YAML")
        }
        OutputFormat::Toml => toml::to_string(config).context("Failed to render config as TOML"),
    }
}
