//! Config file loading

use figment::providers::{Format as _, Json, Toml, Yaml};
use figment::Figment;
use std::fmt;
use std::fs;
use std::path::Path;
use tracing::debug;

use super::error::ConfigError;
use super::raw::RawValue;
use super::schema::Config;

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Toml,
    Json,
}

impl Format {
    /// Match an extension (without the leading dot). Case-sensitive.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "yaml" | "yml" => Some(Format::Yaml),
            "toml" => Some(Format::Toml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path.extension().map(|e| e.to_string_lossy()).unwrap_or_default();
        Format::from_extension(&ext).ok_or_else(|| ConfigError::UnsupportedFormat(ext.into_owned()))
    }

    /// Extensions recognised for this format.
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            Format::Yaml => &["yaml", "yml"],
            Format::Toml => &["toml"],
            Format::Json => &["json"],
        }
    }

    /// Parse a whole document into a raw tree rooted at the document root.
    pub fn parse(self, content: &str) -> Result<RawValue, figment::Error> {
        let figment = match self {
            Format::Yaml => Figment::from(Yaml::string(content)),
            Format::Toml => Figment::from(Toml::string(content)),
            Format::Json => Figment::from(Json::string(content)),
        };
        figment.extract()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Yaml => "YAML",
            Format::Toml => "TOML",
            Format::Json => "JSON",
        })
    }
}

/// Read `path` and parse it with the format its extension names.
pub fn load_raw(path: &Path) -> Result<RawValue, ConfigError> {
    if path.as_os_str().is_empty() {
        return Err(ConfigError::EmptyPath);
    }
    let format = Format::from_path(path)?;
    debug!(path = %path.display(), %format, "Loading config");

    let content = fs::read_to_string(path)
        .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
    debug!(bytes = content.len(), "Read config file");

    format.parse(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        format,
        source: Box::new(source),
    })
}

/// Load a configuration file into a typed [`Config`].
///
/// The extension picks the parser (`yaml`/`yml`, `toml`, `json`). Each call
/// builds its own raw tree and result; nothing is cached between calls.
pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let raw = load_raw(path)?;
    let config = Config::from_raw(&raw)
        .map_err(|source| ConfigError::Decode { path: path.to_path_buf(), source })?;
    debug!(paths = config.filter.paths.len(), "Decoded config");
    Ok(config)
}
