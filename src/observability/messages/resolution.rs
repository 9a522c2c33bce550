// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for processing task resolution.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A processing task is being assembled for a datasource.
///
/// # Log Level
/// `trace!` - Per-node detail, mostly useful as a span
pub struct ResolutionStarted<'a> {
    pub reference: &'a str,
    pub depth: usize,
}

impl Display for ResolutionStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Resolving datasource '{}' at depth {}", self.reference, self.depth)
    }
}

impl StructuredLog for ResolutionStarted<'_> {
    fn log(&self) {
        tracing::trace!(reference = self.reference, depth = self.depth, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::trace_span!("resolve", name = name, reference = self.reference, depth = self.depth)
    }
}

/// A processing task was assembled.
///
/// # Log Level
/// `debug!` - Routine resolution event
pub struct TaskResolved<'a> {
    pub reference: &'a str,
    pub dependency_count: usize,
    pub lookback: u32,
}

impl Display for TaskResolved<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Resolved datasource '{}': {} dependencies, lookback={}",
            self.reference, self.dependency_count, self.lookback
        )
    }
}

impl StructuredLog for TaskResolved<'_> {
    fn log(&self) {
        tracing::debug!(
            reference = self.reference,
            dependency_count = self.dependency_count,
            lookback = self.lookback,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "task_resolved",
            name = name,
            reference = self.reference,
            dependency_count = self.dependency_count,
        )
    }
}
