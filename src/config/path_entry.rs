//! Per-path filter entries and the decoder that accepts both of their shapes.
//!
//! A path entry is written either as a bare list of methods:
//!
//! ```yaml
//! /pets: [GET, POST]
//! ```
//!
//! or as an object that carries the list plus flags:
//!
//! ```yaml
//! /pets:
//!   methods: [GET]
//!   preserveServers: true
//! ```
//!
//! [`decode_path_entry`] is the only place that tells the two apart. The
//! `Deserialize` impl of [`PathEntry`] funnels `serde_json`, `serde_yaml`,
//! figment and the raw-tree decoder into it, so the formats cannot drift.

use serde::de::{self, Deserialize, Deserializer};
use serde::ser::{Serialize, SerializeStruct, Serializer};
use thiserror::Error;
use tracing::trace;

use super::raw::RawValue;

const METHODS_KEY: &str = "methods";
const PRESERVE_SERVERS_KEY: &str = "preserveServers";

/// Methods kept for one API path, and whether its path-level servers survive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathEntry {
    pub methods: Vec<String>,
    pub preserve_servers: bool,
}

impl PathEntry {
    pub fn new<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let methods = methods.into_iter().map(Into::into).collect();
        PathEntry { methods, preserve_servers: false }
    }

    pub fn with_preserved_servers<I, S>(methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        PathEntry { preserve_servers: true, ..PathEntry::new(methods) }
    }

    /// HTTP methods compare case-insensitively.
    pub fn allows(&self, method: &str) -> bool {
        self.methods.iter().any(|m| m.eq_ignore_ascii_case(method))
    }
}

/// Shape errors for a path entry. Each names what was expected and what was found.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathEntryError {
    #[error("path config cannot be null")]
    Null,

    #[error("invalid path config format: expected array or object, got {0}")]
    InvalidShape(&'static str),

    #[error("path config array element {index} must be a string, got {found}")]
    ArrayElement { index: usize, found: &'static str },

    #[error("path config array must list at least one method")]
    EmptyArray,

    #[error("methods field must be an array, got {0}")]
    MethodsNotArray(&'static str),

    #[error("methods array element {index} must be a string, got {found}")]
    MethodsElement { index: usize, found: &'static str },

    #[error("preserveServers field must be a boolean, got {0}")]
    PreserveServersNotBool(&'static str),

    #[error("path config object must have a methods field")]
    MissingMethods,
}

/// Classify `raw` as the simple (list) or advanced (object) form and decode it.
///
/// Sequences are tried first; mappings second; anything else is a shape error.
/// A successful result always has at least one method.
pub fn decode_path_entry(raw: &RawValue) -> Result<PathEntry, PathEntryError> {
    let entry = match raw {
        RawValue::Sequence(items) => {
            let methods = string_list(items, |index, found| PathEntryError::ArrayElement {
                index,
                found,
            })?;
            if methods.is_empty() {
                return Err(PathEntryError::EmptyArray);
            }
            PathEntry { methods, preserve_servers: false }
        }
        RawValue::Mapping(fields) => {
            // Unrecognised keys are ignored.
            let methods = match fields.get(METHODS_KEY) {
                Some(RawValue::Sequence(items)) => {
                    string_list(items, |index, found| PathEntryError::MethodsElement {
                        index,
                        found,
                    })?
                }
                Some(other) => return Err(PathEntryError::MethodsNotArray(other.kind())),
                None => Vec::new(),
            };
            let preserve_servers = match fields.get(PRESERVE_SERVERS_KEY) {
                Some(value) => value
                    .as_bool()
                    .ok_or(PathEntryError::PreserveServersNotBool(value.kind()))?,
                None => false,
            };
            if methods.is_empty() {
                return Err(PathEntryError::MissingMethods);
            }
            PathEntry { methods, preserve_servers }
        }
        RawValue::Scalar(_) if raw.is_null() => return Err(PathEntryError::Null),
        RawValue::Scalar(_) => return Err(PathEntryError::InvalidShape(raw.kind())),
    };

    trace!(
        methods = entry.methods.len(),
        preserve_servers = entry.preserve_servers,
        "decoded path entry"
    );
    Ok(entry)
}

fn string_list(
    items: &[RawValue],
    element_error: impl Fn(usize, &'static str) -> PathEntryError,
) -> Result<Vec<String>, PathEntryError> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_str().map(str::to_string).ok_or_else(|| element_error(index, item.kind()))
        })
        .collect()
}

impl<'de> Deserialize<'de> for PathEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawValue::deserialize(deserializer)?;
        decode_path_entry(&raw).map_err(de::Error::custom)
    }
}

/// Entries without flags are written back in the short list form.
impl Serialize for PathEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.preserve_servers {
            let mut state = serializer.serialize_struct("PathEntry", 2)?;
            state.serialize_field(METHODS_KEY, &self.methods)?;
            state.serialize_field(PRESERVE_SERVERS_KEY, &self.preserve_servers)?;
            state.end()
        } else {
            self.methods.serialize(serializer)
        }
    }
}
