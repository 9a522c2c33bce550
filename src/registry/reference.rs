// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

/// Unique name of a declared datasource.
///
/// References are the primary key of the registry, the tag index and every
/// combination handed to an observer.
///
/// # Examples
/// ```
/// use bigtempo::registry::Reference;
///
/// let reference = Reference::from("prices");
/// assert_eq!(reference.as_str(), "prices");
/// assert_eq!(reference.to_string(), "prices");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(pub String);

impl Reference {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Reference {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Reference {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl From<&Reference> for Reference {
    fn from(reference: &Reference) -> Self {
        reference.clone()
    }
}

impl Borrow<str> for Reference {
    fn borrow(&self) -> &str {
        &self.0
    }
}
