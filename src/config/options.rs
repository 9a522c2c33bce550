// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::tags::TagPolicy;
use serde::Deserialize;

/// What happens when a reference is declared a second time.
///
/// # Variants
/// * `Overwrite` - The new declaration replaces the old one (last write wins)
/// * `Reject` - The declaration fails with `DuplicateRegistration`
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    #[default]
    Overwrite,
    Reject,
}

/// Engine behaviour knobs.
///
/// # Example
/// ```yaml
/// options:
///   tag_policy: strict
///   on_duplicate: reject
/// ```
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
pub struct EngineOptions {
    #[serde(default)]
    pub tag_policy: TagPolicy,
    #[serde(default)]
    pub on_duplicate: DuplicatePolicy,
}

impl EngineOptions {
    pub fn strict() -> Self {
        Self {
            tag_policy: TagPolicy::Strict,
            on_duplicate: DuplicatePolicy::Reject,
        }
    }
}
