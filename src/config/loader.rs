// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::consts::DEFAULT_LOOKBACK;
use crate::config::EngineOptions;
use crate::engine::DatasourceEngine;
use crate::errors::{EngineError, ValidationError};
use crate::registry::DatasourceDeclaration;
use crate::tags::RawTags;
use serde::Deserialize;
use serde_yaml::Value;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Declarative description of a set of datasources.
///
/// Typically loaded from a YAML file.
///
/// # Example
/// ```yaml
/// options:
///   tag_policy: lenient
/// datasources:
///   - id: prices
///     constructor: CsvPrices
///     tags: [raw, daily]
///   - id: returns
///     depends_on: [prices]
///     lookback: 1
///     tags: [derived]
/// ```
#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub options: EngineOptions,
    #[serde(default)]
    pub datasources: Vec<DatasourceConfig>,
}

/// One datasource entry.
///
/// # Fields
/// * `id` - Unique reference of the datasource
/// * `constructor` - Constructor name handed to the builder (defaults to `id`)
/// * `depends_on` - References of the datasources this one is computed from
/// * `lookback` - How much history the processing task needs
/// * `tags` - Declared tags; anything other than a list of strings is malformed
#[derive(Debug, Clone, Deserialize)]
pub struct DatasourceConfig {
    pub id: String,
    #[serde(default)]
    pub constructor: Option<String>,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default = "default_lookback")]
    pub lookback: u32,
    #[serde(default)]
    pub tags: Value,
}

fn default_lookback() -> u32 {
    DEFAULT_LOOKBACK
}

impl DatasourceConfig {
    /// Raw tags as written in the file.
    pub fn raw_tags(&self) -> RawTags {
        match &self.tags {
            Value::Null => RawTags::none(),
            Value::Sequence(items) => {
                let mut tags = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        Value::String(tag) => tags.push(tag.clone()),
                        _ => return RawTags::Malformed(describe(item).to_string()),
                    }
                }
                RawTags::List(tags)
            }
            other => RawTags::Malformed(describe(other).to_string()),
        }
    }

    pub fn declaration(&self) -> DatasourceDeclaration<String> {
        let constructor = self.constructor.clone().unwrap_or_else(|| self.id.clone());
        DatasourceDeclaration::new(self.id.as_str(), constructor)
            .depends_on(self.depends_on.iter().map(String::as_str))
            .lookback(self.lookback)
            .raw_tags(self.raw_tags())
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

impl Config {
    /// Declares every datasource into `engine`, in file order.
    pub fn declare_into<I, T>(&self, engine: &mut DatasourceEngine<String, I, T>) -> Result<(), EngineError> {
        for datasource in &self.datasources {
            engine.declare(datasource.declaration())?;
        }
        Ok(())
    }
}

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("configuration validation failed:\n{}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("\n")
}

/// Load a config from a YAML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: Config = serde_yaml::from_str(&content)?;
    Ok(cfg)
}

/// Load and validate a config from a YAML file
///
/// Rejects duplicate ids, dependencies on undeclared datasources and cycles.
pub fn load_and_validate_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let cfg = load_config(path)?;
    crate::config::validate_dependency_graph(&cfg).map_err(ConfigError::Invalid)?;
    Ok(cfg)
}
