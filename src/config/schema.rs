//! Typed configuration of the OpenAPI filter.

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::decode::{decode, DecodeError};
use super::path_entry::PathEntry;
use super::raw::RawValue;

/// Root key of the tool's own settings.
pub const TOOL_SECTION_KEY: &str = "x-openapi-filter";

/// Root configuration: tool settings under `x-openapi-filter`, filter settings
/// at the document root.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Config {
    #[serde(rename = "x-openapi-filter")]
    pub tool: ToolConfig,
    #[serde(flatten)]
    pub filter: FilterConfig,
}

impl Config {
    /// Build a `Config` from a raw tree.
    ///
    /// The filter section is squashed into the root, so it is decoded from the
    /// whole document; the tool section only from its own key.
    pub fn from_raw(raw: &RawValue) -> Result<Self, DecodeError> {
        let filter: FilterConfig = decode(raw)?;
        let tool = match raw.get(TOOL_SECTION_KEY) {
            Some(section) => decode(section).map_err(|e| e.at(TOOL_SECTION_KEY))?,
            None => ToolConfig::default(),
        };
        Ok(Config { tool, filter })
    }

    pub fn logger_level(&self) -> Option<&str> {
        self.tool.logger.as_ref().map(|logger| logger.level.as_str())
    }

    pub fn external_refs_allowed(&self) -> bool {
        self.tool.loader.as_ref().is_some_and(|loader| loader.external_refs_allowed)
    }
}

/// Any serde format can produce a `Config`: the document is captured as a raw
/// tree and then run through the same typed decoding as [`Config::from_raw`].
impl<'de> Deserialize<'de> for Config {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawValue::deserialize(deserializer)?;
        Config::from_raw(&raw).map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logger: Option<LoggerConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loader: Option<LoaderConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub level: String,
}

impl LoggerConfig {
    /// Parse the configured level. Unknown or empty levels yield `None`.
    pub fn level_directive(&self) -> Option<tracing::Level> {
        match self.level.trim().to_ascii_lowercase().as_str() {
            "trace" => Some(tracing::Level::TRACE),
            "debug" => Some(tracing::Level::DEBUG),
            "info" => Some(tracing::Level::INFO),
            "warn" | "warning" => Some(tracing::Level::WARN),
            "error" => Some(tracing::Level::ERROR),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Whether the OpenAPI loader may follow `$ref`s into other documents.
    pub external_refs_allowed: bool,
}

/// Which parts of an OpenAPI document survive filtering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterConfig {
    pub servers: bool,
    pub preserve_path_servers: bool,
    pub paths: BTreeMap<String, PathEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<ComponentsFilter>,
    pub security: bool,
    pub tags: bool,
    pub external_docs: bool,
}

/// Names of the components to keep, per component category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentsFilter {
    pub schemas: Vec<String>,
    pub parameters: Vec<String>,
    pub security_schemes: Vec<String>,
    pub request_bodies: Vec<String>,
    pub responses: Vec<String>,
    pub headers: Vec<String>,
    pub examples: Vec<String>,
    pub links: Vec<String>,
    pub callbacks: Vec<String>,
}

impl ComponentsFilter {
    fn categories(&self) -> [&Vec<String>; 9] {
        [
            &self.schemas,
            &self.parameters,
            &self.security_schemes,
            &self.request_bodies,
            &self.responses,
            &self.headers,
            &self.examples,
            &self.links,
            &self.callbacks,
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.categories().iter().all(|names| names.is_empty())
    }

    /// Number of component names across all categories.
    pub fn total(&self) -> usize {
        self.categories().iter().map(|names| names.len()).sum()
    }
}
