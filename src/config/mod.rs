//! Configuration loading and typed decoding
//!
//! A file is parsed into an untyped [`RawValue`] tree by the format its
//! extension names, then mapped onto [`Config`]. Path entries accept a bare
//! method list or an object with flags; [`decode_path_entry`] decides which.

pub mod decode;
pub mod error;
pub mod loader;
pub mod path_entry;
pub mod raw;
pub mod schema;

pub use decode::{decode, DecodeError};
pub use error::ConfigError;
pub use loader::{load_config, load_raw, Format};
pub use path_entry::{decode_path_entry, PathEntry, PathEntryError};
pub use raw::{RawValue, Scalar};
pub use schema::{
    ComponentsFilter, Config, FilterConfig, LoaderConfig, LoggerConfig, ToolConfig,
    TOOL_SECTION_KEY,
};
