// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod dependency_graph;
mod loader;
mod options;
mod validation;

pub mod consts;

pub use dependency_graph::DependencyGraph;
pub use loader::{load_and_validate_config, load_config, Config, ConfigError, DatasourceConfig};
pub use options::{DuplicatePolicy, EngineOptions};
pub use validation::{validate_dependency_graph, validate_graph};
