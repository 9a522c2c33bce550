// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Errors surfaced by engine operations.
//!
//! Every error is returned to the immediate caller. The only input the engine
//! swallows is malformed tags under the lenient tag policy.

use crate::registry::Reference;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    /// The reference was never declared.
    #[error("datasource '{reference}' is not registered")]
    NotFound { reference: Reference },

    /// Resolution reached a reference already on the resolution path.
    #[error("cyclic dependency detected: {}", join(.cycle, " -> "))]
    Cycle { cycle: Vec<Reference> },

    /// A malformed tag was rejected under the strict tag policy.
    #[error("invalid tag '{tag}' for datasource '{reference}': {reason}")]
    InvalidTag {
        reference: Reference,
        tag: String,
        reason: String,
    },

    #[error("invalid selector '{expression}': {reason}")]
    InvalidSelector { expression: String, reason: String },

    /// The reference was declared twice while duplicates are rejected.
    #[error("datasource '{reference}' is already registered")]
    DuplicateRegistration { reference: Reference },

    /// The builder strategy failed to construct an instance.
    #[error("failed to build datasource '{reference}': {source}")]
    Build {
        reference: Reference,
        #[source]
        source: anyhow::Error,
    },

    /// An observer returned an error while being notified.
    #[error("observer #{mapping} failed on ({}): {source}", join(.combination, ", "))]
    Observer {
        mapping: usize,
        combination: Vec<Reference>,
        #[source]
        source: anyhow::Error,
    },
}

impl EngineError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            EngineError::NotFound { .. } => "not_found",
            EngineError::Cycle { .. } => "cycle",
            EngineError::InvalidTag { .. } => "invalid_tag",
            EngineError::InvalidSelector { .. } => "invalid_selector",
            EngineError::DuplicateRegistration { .. } => "duplicate_registration",
            EngineError::Build { .. } => "build_failed",
            EngineError::Observer { .. } => "observer_failed",
        }
    }
}

fn join(references: &[Reference], separator: &str) -> String {
    references
        .iter()
        .map(Reference::as_str)
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let cycle = EngineError::Cycle {
            cycle: vec![Reference::from("a"), Reference::from("b"), Reference::from("a")],
        };
        assert_eq!(cycle.to_string(), "cyclic dependency detected: a -> b -> a");
        assert_eq!(cycle.as_label(), "cycle");

        let not_found = EngineError::NotFound {
            reference: Reference::from("y"),
        };
        assert_eq!(not_found.to_string(), "datasource 'y' is not registered");
    }
}
