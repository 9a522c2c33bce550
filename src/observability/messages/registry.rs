// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for datasource declaration events.

use crate::observability::messages::StructuredLog;
use std::fmt::{Display, Formatter};
use tracing::Span;

/// A datasource declaration was stored and its tags indexed.
///
/// # Log Level
/// `debug!` - Routine registry event
pub struct DatasourceRegistered<'a> {
    pub reference: &'a str,
    pub tags: &'a [&'a str],
    pub overwritten: bool,
}

impl Display for DatasourceRegistered<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        if self.overwritten {
            write!(f, "Datasource '{}' re-registered with tags [{}]", self.reference, self.tags.join(", "))
        } else {
            write!(f, "Datasource '{}' registered with tags [{}]", self.reference, self.tags.join(", "))
        }
    }
}

impl StructuredLog for DatasourceRegistered<'_> {
    fn log(&self) {
        tracing::debug!(
            reference = self.reference,
            tag_count = self.tags.len(),
            overwritten = self.overwritten,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!(
            "datasource_registered",
            name = name,
            reference = self.reference,
            overwritten = self.overwritten,
        )
    }
}

/// Malformed tag input was replaced by an empty tag set.
///
/// # Log Level
/// `warn!` - Input was silently altered
pub struct TagsCoerced<'a> {
    pub reference: &'a str,
    pub tag: &'a str,
    pub reason: &'a str,
}

impl Display for TagsCoerced<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Ignoring tags of datasource '{}': '{}' {}",
            self.reference, self.tag, self.reason
        )
    }
}

impl StructuredLog for TagsCoerced<'_> {
    fn log(&self) {
        tracing::warn!(
            reference = self.reference,
            tag = self.tag,
            reason = self.reason,
            "{}", self
        );
    }

    fn span(&self, name: &str) -> Span {
        tracing::warn_span!(
            "tags_coerced",
            name = name,
            reference = self.reference,
            tag = self.tag,
        )
    }
}

/// The builder produced a datasource instance.
///
/// # Log Level
/// `debug!` - Routine lifecycle event
pub struct InstanceBuilt<'a> {
    pub reference: &'a str,
}

impl Display for InstanceBuilt<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Built instance for datasource '{}'", self.reference)
    }
}

impl StructuredLog for InstanceBuilt<'_> {
    fn log(&self) {
        tracing::debug!(reference = self.reference, "{}", self);
    }

    fn span(&self, name: &str) -> Span {
        tracing::debug_span!("instance_built", name = name, reference = self.reference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let registered = DatasourceRegistered {
            reference: "prices",
            tags: &["daily", "raw"],
            overwritten: false,
        };
        assert_eq!(registered.to_string(), "Datasource 'prices' registered with tags [daily, raw]");

        let coerced = TagsCoerced {
            reference: "prices",
            tag: "",
            reason: "tag is empty",
        };
        assert_eq!(coerced.to_string(), "Ignoring tags of datasource 'prices': '' tag is empty");
    }
}
