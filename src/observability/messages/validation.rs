// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for dependency graph validation.
//!
//! This module contains message types for logging events related to:
//! * Cyclic dependency detection (at validation and at resolution time)
//! * Unresolved dependency detection
//! * Duplicate datasource detection

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// Cyclic dependency detected.
///
/// # Log Level
/// `error!` - Failure requiring attention
///
/// # Example
/// ```
/// use bigtempo::observability::messages::validation::CyclicDependencyDetected;
///
/// let cycle = vec!["a", "b", "a"];
/// let msg = CyclicDependencyDetected { cycle: &cycle };
///
/// assert_eq!(msg.to_string(), "Cyclic dependency detected: a -> b -> a");
/// ```
pub struct CyclicDependencyDetected<'a> {
    pub cycle: &'a [&'a str],
}

impl Display for CyclicDependencyDetected<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Cyclic dependency detected: {}", self.cycle.join(" -> "))
    }
}

impl StructuredLog for CyclicDependencyDetected<'_> {
    fn log(&self) {
        tracing::error!(
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            cycle = self.cycle.join(" -> "),
            cycle_length = self.cycle.len(),
        )
    }
}

/// Unresolved dependency detected.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct UnresolvedDependency<'a> {
    pub datasource: &'a str,
    pub missing_dependency: &'a str,
}

impl Display for UnresolvedDependency<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Datasource '{}' depends on missing datasource '{}'",
            self.datasource, self.missing_dependency
        )
    }
}

impl StructuredLog for UnresolvedDependency<'_> {
    fn log(&self) {
        tracing::error!(
            datasource = self.datasource,
            missing_dependency = self.missing_dependency,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            datasource = self.datasource,
            missing_dependency = self.missing_dependency,
        )
    }
}

/// Duplicate datasource id detected.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct DuplicateDatasource<'a> {
    pub datasource: &'a str,
}

impl Display for DuplicateDatasource<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Duplicate datasource id: '{}'", self.datasource)
    }
}

impl StructuredLog for DuplicateDatasource<'_> {
    fn log(&self) {
        tracing::error!(datasource = self.datasource, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::span!(
            tracing::Level::ERROR,
            "span_name",
            name = name,
            datasource = self.datasource,
        )
    }
}

/// Validation finished.
///
/// # Log Level
/// `debug!` on success, `error!` when errors were found
pub struct ValidationCompleted {
    pub datasource_count: usize,
    pub error_count: usize,
}

impl Display for ValidationCompleted {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.error_count == 0 {
            write!(f, "Validated {} datasources: no errors", self.datasource_count)
        } else {
            write!(
                f,
                "Validated {} datasources: {} errors",
                self.datasource_count, self.error_count
            )
        }
    }
}

impl StructuredLog for ValidationCompleted {
    fn log(&self) {
        if self.error_count == 0 {
            tracing::debug!(datasource_count = self.datasource_count, "{}", self);
        } else {
            tracing::error!(
                datasource_count = self.datasource_count,
                error_count = self.error_count,
                "{}", self
            );
        }
    }

    fn span(&self, name: &str) -> Span {
        tracing::info_span!(
            "validation",
            name = name,
            datasource_count = self.datasource_count,
            error_count = self.error_count,
        )
    }
}
