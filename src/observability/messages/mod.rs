// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Centralized message types for structured logging.
//!
//! * `registry` - declaration, tag coercion and instance lifecycle events
//! * `resolution` - processing task assembly events
//! * `trigger` - observer mapping and combination events
//! * `validation` - dependency graph validation failures

use tracing::Span;

pub mod registry;
pub mod resolution;
pub mod trigger;
pub mod validation;

/// A message that knows its own level and structured fields.
pub trait StructuredLog {
    /// Emits the message as a `tracing` event at its level.
    fn log(&self);

    /// Opens a span carrying the message's fields.
    fn span(&self, name: &str) -> Span;
}
