// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for the combination trigger engine.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// An observer mapping was stored and caught up with the current index.
///
/// # Log Level
/// `debug!` - Routine registration event
pub struct MappingRegistered {
    pub mapping: usize,
    pub selection_count: usize,
    pub fired: usize,
    pub synchronized: bool,
}

impl Display for MappingRegistered {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Observer #{} registered over {} selections{}: {} combinations fired on catch-up",
            self.mapping,
            self.selection_count,
            if self.synchronized { " (synchronized)" } else { "" },
            self.fired
        )
    }
}

impl StructuredLog for MappingRegistered {
    fn log(&self) {
        tracing::debug!(
            mapping = self.mapping,
            selection_count = self.selection_count,
            fired = self.fired,
            synchronized = self.synchronized,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "mapping_registered",
            name = name,
            mapping = self.mapping,
            selection_count = self.selection_count,
        )
    }
}

/// A newly declared reference was evaluated against every stored mapping.
///
/// # Log Level
/// `debug!` - Routine trigger event
pub struct CandidateEvaluated<'a> {
    pub reference: &'a str,
    pub mapping_count: usize,
    pub fired: usize,
}

impl Display for CandidateEvaluated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Evaluated '{}' against {} observers: {} combinations fired",
            self.reference, self.mapping_count, self.fired
        )
    }
}

impl StructuredLog for CandidateEvaluated<'_> {
    fn log(&self) {
        tracing::debug!(
            reference = self.reference,
            mapping_count = self.mapping_count,
            fired = self.fired,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "candidate_evaluated",
            name = name,
            reference = self.reference,
            mapping_count = self.mapping_count,
        )
    }
}

/// An observer returned an error; the notification batch is aborted.
///
/// # Log Level
/// `error!` - Failure requiring attention
pub struct ObserverFailed<'a> {
    pub mapping: usize,
    pub combination: &'a [&'a str],
    pub error: &'a dyn std::fmt::Display,
}

impl Display for ObserverFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Observer #{} failed on ({}): {}",
            self.mapping,
            self.combination.join(", "),
            self.error
        )
    }
}

impl StructuredLog for ObserverFailed<'_> {
    fn log(&self) {
        tracing::error!(
            mapping = self.mapping,
            combination = self.combination.join(", "),
            error = %self.error,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::error_span!(
            "observer_failed",
            name = name,
            mapping = self.mapping,
            combination = self.combination.join(", "),
        )
    }
}

/// Observers queued derived declarations for processing.
///
/// # Log Level
/// `debug!` - Routine trigger event
pub struct DerivedDeclarationsQueued<'a> {
    pub trigger: &'a str,
    pub count: usize,
}

impl Display for DerivedDeclarationsQueued<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Observers queued {} derived declarations while handling '{}'",
            self.count, self.trigger
        )
    }
}

impl StructuredLog for DerivedDeclarationsQueued<'_> {
    fn log(&self) {
        tracing::debug!(trigger = self.trigger, count = self.count, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("derived_declarations", name = name, trigger = self.trigger, count = self.count)
    }
}
