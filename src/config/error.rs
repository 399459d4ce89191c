//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

use super::decode::DecodeError;
use super::loader::Format;

/// Errors that can occur while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No path was given. Raised before touching the filesystem.
    #[error("config path is empty")]
    EmptyPath,

    /// The file extension does not name a supported format.
    #[error("unsupported config format: {0:?}")]
    UnsupportedFormat(String),

    /// Failed to read the configuration file.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Path to the file that couldn't be read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The file was read but is not valid in its format.
    #[error("failed to parse {format} config file {path}: {source}")]
    Parse {
        /// Path to the file that couldn't be parsed.
        path: PathBuf,
        /// Format selected from the file extension.
        format: Format,
        /// The underlying parser error.
        source: Box<figment::Error>,
    },

    /// The document parsed but does not fit the configuration structure.
    #[error("failed to decode config file {path}: {source}")]
    Decode {
        /// Path to the file that couldn't be decoded.
        path: PathBuf,
        /// The failing key path and reason.
        source: DecodeError,
    },
}
