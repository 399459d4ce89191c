//! openapi-filter-config: typed configuration for the OpenAPI filter tool
//!
//! Loads a YAML, TOML or JSON file into [`Config`]. The one field with two
//! accepted shapes, [`PathEntry`], is decoded identically whichever format or
//! decoding route produced it.

pub mod config;

pub use config::{load_config, Config, ConfigError, PathEntry};
