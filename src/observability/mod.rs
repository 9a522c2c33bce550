// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Observability module for structured logging and tracing.
//!
//! Message types follow a struct-based pattern with a `Display`
//! implementation, so every log line the engine emits is defined in one place
//! and carries the same structured fields wherever it is raised.
//!
//! # Architecture
//!
//! Messages are organized by subsystem:
//! * `messages::registry` - declarations, tag handling and instance building
//! * `messages::resolution` - processing task assembly
//! * `messages::trigger` - observer registration and combination firing
//! * `messages::validation` - dependency graph validation failures
//!
//! # Usage
//!
//! ```rust
//! use bigtempo::observability::messages::registry::DatasourceRegistered;
//! use bigtempo::observability::messages::StructuredLog;
//!
//! let msg = DatasourceRegistered {
//!     reference: "prices",
//!     tags: &["daily"],
//!     overwritten: false,
//! };
//!
//! msg.log();
//! ```

pub mod messages;
