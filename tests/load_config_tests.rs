//! Integration tests for loading configuration files in every format

use openapi_filter_config::config::{decode, load_raw, ComponentsFilter, ConfigError};
use openapi_filter_config::{load_config, Config, PathEntry};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// The same document written as YAML, TOML and JSON.
struct Fixture {
    yaml: &'static str,
    toml: &'static str,
    json: &'static str,
}

impl Fixture {
    fn write_all(&self, dir: &TempDir) -> Vec<PathBuf> {
        [("config.yaml", self.yaml), ("config.toml", self.toml), ("config.json", self.json)]
            .into_iter()
            .map(|(name, content)| {
                let path = dir.path().join(name);
                fs::write(&path, content).expect("write fixture");
                path
            })
            .collect()
    }
}

const SIMPLE: Fixture = Fixture {
    yaml: "paths:\n  /x: [GET, POST]\n",
    toml: "[paths]\n\"/x\" = [\"GET\", \"POST\"]\n",
    json: r#"{"paths": {"/x": ["GET", "POST"]}}"#,
};

const ADVANCED: Fixture = Fixture {
    yaml: "paths:\n  /x:\n    methods: [GET]\n    preserveServers: true\n",
    toml: "[paths]\n\"/x\" = { methods = [\"GET\"], preserveServers = true }\n",
    json: r#"{"paths": {"/x": {"methods": ["GET"], "preserveServers": true}}}"#,
};

const EMPTY_METHODS: Fixture = Fixture {
    yaml: "paths:\n  /x:\n    methods: []\n",
    toml: "[paths]\n\"/x\" = { methods = [] }\n",
    json: r#"{"paths": {"/x": {"methods": []}}}"#,
};

const MISSING_METHODS: Fixture = Fixture {
    yaml: "paths:\n  /x:\n    preserveServers: true\n",
    toml: "[paths]\n\"/x\" = { preserveServers = true }\n",
    json: r#"{"paths": {"/x": {"preserveServers": true}}}"#,
};

const NON_STRING_ELEMENT: Fixture = Fixture {
    yaml: "paths:\n  /x: [1, GET]\n",
    toml: "[paths]\n\"/x\" = [1, \"GET\"]\n",
    json: r#"{"paths": {"/x": [1, "GET"]}}"#,
};

const FULL: Fixture = Fixture {
    yaml: r#"
x-openapi-filter:
  logger:
    level: info
  loader:
    external_refs_allowed: true
servers: true
preservePathServers: false
paths:
  /pets: [GET]
  /pets/{id}:
    methods: [GET, DELETE]
    preserveServers: true
components:
  schemas: [Pet, Error]
  securitySchemes: [apiKey]
security: true
tags: true
externalDocs: false
"#,
    toml: r#"
servers = true
preservePathServers = false
security = true
tags = true
externalDocs = false

[x-openapi-filter.logger]
level = "info"

[x-openapi-filter.loader]
external_refs_allowed = true

[paths]
"/pets" = ["GET"]
"/pets/{id}" = { methods = ["GET", "DELETE"], preserveServers = true }

[components]
schemas = ["Pet", "Error"]
securitySchemes = ["apiKey"]
"#,
    json: r#"{
  "x-openapi-filter": {
    "logger": {"level": "info"},
    "loader": {"external_refs_allowed": true}
  },
  "servers": true,
  "preservePathServers": false,
  "paths": {
    "/pets": ["GET"],
    "/pets/{id}": {"methods": ["GET", "DELETE"], "preserveServers": true}
  },
  "components": {
    "schemas": ["Pet", "Error"],
    "securitySchemes": ["apiKey"]
  },
  "security": true,
  "tags": true,
  "externalDocs": false
}"#,
};

fn load_error(path: &Path) -> String {
    let err = load_config(path).expect_err("load should fail");
    assert!(matches!(err, ConfigError::Decode { .. }), "{path:?}: {err}");
    err.to_string()
}

#[test]
fn test_simple_form_in_every_format() {
    let tmp = TempDir::new().expect("tmp");
    for path in SIMPLE.write_all(&tmp) {
        let config = load_config(&path).expect("config");
        assert_eq!(config.filter.paths["/x"], PathEntry::new(["GET", "POST"]), "{path:?}");
    }
}

#[test]
fn test_advanced_form_in_every_format() {
    let tmp = TempDir::new().expect("tmp");
    for path in ADVANCED.write_all(&tmp) {
        let config = load_config(&path).expect("config");
        let expected = PathEntry::with_preserved_servers(["GET"]);
        assert_eq!(config.filter.paths["/x"], expected, "{path:?}");
    }
}

#[test]
fn test_empty_methods_fails_in_every_format() {
    let tmp = TempDir::new().expect("tmp");
    for path in EMPTY_METHODS.write_all(&tmp) {
        let message = load_error(&path);
        assert!(message.contains("path config object must have a methods field"), "{message}");
    }
}

#[test]
fn test_missing_methods_fails_in_every_format() {
    let tmp = TempDir::new().expect("tmp");
    for path in MISSING_METHODS.write_all(&tmp) {
        let message = load_error(&path);
        assert!(message.contains("paths./x"), "{message}");
        assert!(message.contains("must have a methods field"), "{message}");
    }
}

#[test]
fn test_non_string_element_is_identified() {
    let tmp = TempDir::new().expect("tmp");
    for path in NON_STRING_ELEMENT.write_all(&tmp) {
        let message = load_error(&path);
        assert!(message.contains("array element 0 must be a string, got integer"), "{message}");
    }
}

#[test]
fn test_formats_produce_identical_configs() {
    let tmp = TempDir::new().expect("tmp");
    let configs: Vec<Config> =
        FULL.write_all(&tmp).iter().map(|path| load_config(path).expect("config")).collect();

    let expected = &configs[0];
    assert_eq!(expected.logger_level(), Some("info"));
    assert!(expected.external_refs_allowed());
    assert!(expected.filter.servers);
    assert!(expected.filter.security);
    assert_eq!(
        expected.filter.paths["/pets/{id}"],
        PathEntry::with_preserved_servers(["GET", "DELETE"])
    );
    assert_eq!(
        expected.filter.components,
        Some(ComponentsFilter {
            schemas: vec!["Pet".into(), "Error".into()],
            security_schemes: vec!["apiKey".into()],
            ..ComponentsFilter::default()
        })
    );

    for config in &configs[1..] {
        similar_asserts::assert_eq!(config, expected);
    }
}

#[test]
fn test_loading_twice_is_deterministic() {
    let tmp = TempDir::new().expect("tmp");
    for path in FULL.write_all(&tmp) {
        let first = load_config(&path).expect("first");
        let second = load_config(&path).expect("second");
        similar_asserts::assert_eq!(first, second);
    }
}

#[test]
fn test_native_and_raw_decoding_agree() {
    let tmp = TempDir::new().expect("tmp");
    let paths = FULL.write_all(&tmp);
    let from_file = load_config(&paths[0]).expect("config");

    let from_yaml: Config = serde_yaml::from_str(FULL.yaml).expect("yaml");
    let from_json: Config = serde_json::from_str(FULL.json).expect("json");
    let raw = load_raw(&paths[2]).expect("raw");
    let from_raw: Config = decode(&raw).expect("raw decode");

    similar_asserts::assert_eq!(from_yaml, from_file);
    similar_asserts::assert_eq!(from_json, from_file);
    similar_asserts::assert_eq!(from_raw, from_file);
}

#[test]
fn test_simple_entry_survives_reencoding() {
    let tmp = TempDir::new().expect("tmp");
    let entry = PathEntry::new(["GET"]);
    let mut config = Config::default();
    config.filter.paths.insert("/x".to_string(), entry.clone());

    let path = tmp.path().join("reencoded.json");
    fs::write(&path, serde_json::to_string(&config).expect("encode")).expect("write");
    let reloaded = load_config(&path).expect("reload");

    assert_eq!(reloaded.filter.paths["/x"], entry);
    assert!(!reloaded.filter.paths["/x"].preserve_servers);
}

#[test]
fn test_weakly_typed_scalars_are_accepted() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("weak.yaml");
    fs::write(&path, "servers: \"true\"\ntags: 1\nx-openapi-filter:\n  logger:\n    level: 3\n")
        .expect("write");

    let config = load_config(&path).expect("config");
    assert!(config.filter.servers);
    assert!(config.filter.tags);
    assert_eq!(config.logger_level(), Some("3"));
}

#[test]
fn test_unsupported_format_and_empty_path() {
    let err = load_config("config.ini").expect_err("ini");
    assert!(matches!(&err, ConfigError::UnsupportedFormat(ext) if ext == "ini"));
    assert!(err.to_string().contains("ini"));

    let err = load_config("").expect_err("empty");
    assert!(matches!(err, ConfigError::EmptyPath));
}
