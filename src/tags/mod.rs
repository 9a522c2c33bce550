// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tags, tag sets and the tag selection index.
//!
//! A datasource's tag set is the union of the tags it declares and the tags
//! inferred for it by the configured [`TagDeclarator`](crate::traits::TagDeclarator).
//! Raw tags are checked before they reach the index; how malformed input is
//! treated depends on the [`TagPolicy`].

mod selector;

pub use selector::{Selection, Selector, TagSelector};

use crate::config::consts::NEGATION_PREFIX;
use crate::errors::EngineError;
use crate::observability::messages::registry::TagsCoerced;
use crate::observability::messages::StructuredLog;
use crate::registry::Reference;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;

/// A label attached to a datasource for later selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tag(pub String);

impl Borrow<str> for Tag {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Tag {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks a raw tag, returning the reason it is malformed.
    pub fn check(raw: &str) -> Result<(), &'static str> {
        if raw.is_empty() {
            return Err("tag is empty");
        }
        if raw.chars().any(char::is_whitespace) {
            return Err("tag contains whitespace");
        }
        if raw.starts_with(NEGATION_PREFIX) {
            return Err("tag starts with the negation prefix");
        }
        Ok(())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Tag {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

/// How malformed tag input is handled.
///
/// `Lenient` replaces the whole offending tag collection with an empty set
/// and logs a warning. `Strict` fails with [`EngineError::InvalidTag`].
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TagPolicy {
    #[default]
    Lenient,
    Strict,
}

/// Raw, unchecked tag input.
///
/// `Malformed` stands for input that is not a collection of strings at all
/// (for instance a YAML mapping given where a list was expected).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawTags {
    List(Vec<String>),
    Malformed(String),
}

impl RawTags {
    pub fn none() -> Self {
        RawTags::List(Vec::new())
    }
}

impl<S: Into<String>> FromIterator<S> for RawTags {
    fn from_iter<It: IntoIterator<Item = S>>(iter: It) -> Self {
        RawTags::List(iter.into_iter().map(Into::into).collect())
    }
}

/// Ordered set of tags with duplicates collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSet(BTreeSet<Tag>);

impl TagSet {
    pub fn new() -> Self {
        Self(BTreeSet::new())
    }

    /// Builds a tag set from raw input, applying `policy` to malformed input.
    ///
    /// Under [`TagPolicy::Lenient`] any malformed entry coerces the entire
    /// collection to the empty set.
    pub fn from_raw(
        reference: &Reference,
        raw: RawTags,
        policy: TagPolicy,
    ) -> Result<TagSet, EngineError> {
        let problem = match &raw {
            RawTags::Malformed(shape) => Some((shape.clone(), "not a list of tags")),
            RawTags::List(tags) => tags
                .iter()
                .find_map(|tag| Tag::check(tag).err().map(|reason| (tag.clone(), reason))),
        };

        match (problem, policy) {
            (None, _) => match raw {
                RawTags::List(tags) => Ok(tags.into_iter().map(Tag).collect()),
                RawTags::Malformed(_) => Ok(TagSet::new()),
            },
            (Some((tag, reason)), TagPolicy::Lenient) => {
                TagsCoerced {
                    reference: reference.as_str(),
                    tag: &tag,
                    reason,
                }
                .log();
                Ok(TagSet::new())
            }
            (Some((tag, reason)), TagPolicy::Strict) => Err(EngineError::InvalidTag {
                reference: reference.clone(),
                tag,
                reason: reason.to_string(),
            }),
        }
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn insert(&mut self, tag: Tag) -> bool {
        self.0.insert(tag)
    }

    pub fn extend(&mut self, other: &TagSet) {
        self.0.extend(other.0.iter().cloned());
    }

    pub fn union(mut self, other: TagSet) -> TagSet {
        self.0.extend(other.0);
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Tag> {
        self.0.iter()
    }

    /// Tag names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(Tag::as_str).collect()
    }
}

impl FromIterator<Tag> for TagSet {
    fn from_iter<It: IntoIterator<Item = Tag>>(iter: It) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a TagSet {
    type Item = &'a Tag;
    type IntoIter = btree_set::Iter<'a, Tag>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> Reference {
        Reference::from("prices")
    }

    #[test]
    fn test_tag_check_table_driven() {
        let cases = vec![
            ("daily", true),
            ("", false),
            ("two words", false),
            ("-negated", false),
            ("a-b", true),
        ];

        for (raw, valid) in cases {
            assert_eq!(Tag::check(raw).is_ok(), valid, "tag '{}'", raw);
        }
    }

    #[test]
    fn test_from_raw_collapses_duplicates() {
        let raw: RawTags = ["x", "y", "x"].into_iter().collect();
        let tags = TagSet::from_raw(&reference(), raw, TagPolicy::Strict).unwrap();

        assert_eq!(tags.names(), vec!["x", "y"]);
    }

    #[test]
    fn test_lenient_policy_coerces_to_empty() {
        let raw: RawTags = ["x", ""].into_iter().collect();
        let tags = TagSet::from_raw(&reference(), raw, TagPolicy::Lenient).unwrap();
        assert!(tags.is_empty());

        let malformed = RawTags::Malformed("mapping".to_string());
        let tags = TagSet::from_raw(&reference(), malformed, TagPolicy::Lenient).unwrap();
        assert!(tags.is_empty());
    }

    #[test]
    fn test_strict_policy_rejects_malformed() {
        let raw: RawTags = ["ok", "not ok"].into_iter().collect();
        let err = TagSet::from_raw(&reference(), raw, TagPolicy::Strict).unwrap_err();

        match err {
            EngineError::InvalidTag { reference, tag, .. } => {
                assert_eq!(reference.as_str(), "prices");
                assert_eq!(tag, "not ok");
            }
            other => panic!("expected InvalidTag, got {other:?}"),
        }

        let malformed = RawTags::Malformed("mapping".to_string());
        assert!(TagSet::from_raw(&reference(), malformed, TagPolicy::Strict).is_err());
    }

    #[test]
    fn test_union() {
        let a: TagSet = [Tag::from("x"), Tag::from("y")].into_iter().collect();
        let b: TagSet = [Tag::from("y"), Tag::from("z")].into_iter().collect();

        assert_eq!(a.union(b).names(), vec!["x", "y", "z"]);
    }

    #[test]
    fn test_contains_looks_up_by_name() {
        let tags: TagSet = [Tag::from("daily"), Tag::from("raw")].into_iter().collect();

        assert!(tags.contains("daily"));
        assert!(tags.contains("raw"));
        assert!(!tags.contains("dail"));
        assert!(!tags.contains("-raw"));
    }
}
