// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors that can occur during dependency graph validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A circular dependency was detected between datasources
    CyclicDependency {
        /// The cycle path showing the circular dependency
        cycle: Vec<String>,
    },
    /// A datasource references a dependency that isn't declared
    UnresolvedDependency {
        /// The datasource that has the unresolved dependency
        datasource: String,
        /// The dependency that couldn't be resolved
        missing_dependency: String,
    },
    /// The same datasource id is declared more than once
    DuplicateDatasource {
        datasource: String,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::CyclicDependency { cycle } => {
                write!(f, "Cyclic dependency detected: {}", cycle.join(" -> "))
            }
            ValidationError::UnresolvedDependency {
                datasource,
                missing_dependency,
            } => {
                write!(
                    f,
                    "Datasource '{}' depends on '{}' which is not declared",
                    datasource, missing_dependency
                )
            }
            ValidationError::DuplicateDatasource { datasource } => {
                write!(f, "Duplicate datasource id: '{}'", datasource)
            }
        }
    }
}

impl std::error::Error for ValidationError {}
