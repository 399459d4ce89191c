//! openapi-filter-config: inspect OpenAPI filter configuration files
//!
//! Loads a filter configuration in YAML, TOML or JSON and either summarises it
//! or prints it back in normalised form.

use anyhow::Result;

mod cli;

fn main() -> Result<()> {
    cli::run()
}
