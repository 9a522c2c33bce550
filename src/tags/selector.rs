// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Tag index and selector expressions.
//!
//! # Selector grammar
//!
//! A selector expression is a whitespace-separated list of tokens:
//! - `tag` - the reference must carry `tag`
//! - `-tag` - the reference must not carry `tag`
//!
//! The empty expression matches every registered reference.
//!
//! ```
//! use bigtempo::tags::{Selector, TagSelector, TagSet, Tag};
//! use bigtempo::registry::Reference;
//!
//! let mut index = TagSelector::new();
//! index.register(Reference::from("a"), [Tag::from("daily")].into_iter().collect());
//! index.register(Reference::from("b"), [Tag::from("daily"), Tag::from("raw")].into_iter().collect());
//!
//! let selection = Selector::parse("daily -raw").unwrap().into_selection();
//! assert_eq!(selection.matching(&index), vec![Reference::from("a")]);
//! ```

use crate::config::consts::NEGATION_PREFIX;
use crate::errors::EngineError;
use crate::registry::Reference;
use crate::tags::{Tag, TagSet};
use std::collections::{BTreeMap, BTreeSet};

/// Index of reference to tag associations.
#[derive(Debug, Default)]
pub struct TagSelector {
    tags: BTreeMap<Reference, TagSet>,
}

impl TagSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Associates `tags` with `reference`, replacing any previous association.
    pub fn register(&mut self, reference: Reference, tags: TagSet) {
        self.tags.insert(reference, tags);
    }

    pub fn tags_of(&self, reference: &Reference) -> Option<&TagSet> {
        self.tags.get(reference)
    }

    /// Every tag carried by any registered reference.
    pub fn all_tags(&self) -> TagSet {
        let mut all = TagSet::new();
        for tags in self.tags.values() {
            all.extend(tags);
        }
        all
    }

    pub fn contains(&self, reference: &Reference) -> bool {
        self.tags.contains_key(reference)
    }

    pub fn references(&self) -> impl Iterator<Item = &Reference> {
        self.tags.keys()
    }

    /// Union of the references matched by each of `selectors`.
    pub fn query(&self, selectors: &[Selector]) -> BTreeSet<Reference> {
        self.tags
            .iter()
            .filter(|(_, tags)| selectors.iter().any(|selector| selector.matches(tags)))
            .map(|(reference, _)| reference.clone())
            .collect()
    }
}

/// A parsed selector expression.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    required: BTreeSet<Tag>,
    forbidden: BTreeSet<Tag>,
}

impl Selector {
    pub fn parse(expression: &str) -> Result<Selector, EngineError> {
        let mut selector = Selector::default();

        for token in expression.split_whitespace() {
            let (negated, name) = match token.strip_prefix(NEGATION_PREFIX) {
                Some(name) => (true, name),
                None => (false, token),
            };

            if let Err(reason) = Tag::check(name) {
                return Err(EngineError::InvalidSelector {
                    expression: expression.to_string(),
                    reason: format!("token '{}': {}", token, reason),
                });
            }

            if negated {
                selector.forbidden.insert(Tag::from(name));
            } else {
                selector.required.insert(Tag::from(name));
            }
        }

        Ok(selector)
    }

    pub fn matches(&self, tags: &TagSet) -> bool {
        self.required.iter().all(|tag| tags.contains(tag.as_str()))
            && !self.forbidden.iter().any(|tag| tags.contains(tag.as_str()))
    }

    pub fn into_selection(self) -> Selection {
        Selection { selector: self }
    }
}

/// A live predicate over the tag index.
///
/// A selection holds no references of its own; every query is answered
/// against the index as it stands at the time of the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    selector: Selector,
}

impl Selection {
    /// References currently matching, in sorted order.
    pub fn matching(&self, index: &TagSelector) -> Vec<Reference> {
        index
            .tags
            .iter()
            .filter(|(_, tags)| self.selector.matches(tags))
            .map(|(reference, _)| reference.clone())
            .collect()
    }

    /// Whether `reference` is matched by this selection. Does not mutate the index.
    pub fn is_eligible(&self, index: &TagSelector, reference: &Reference) -> bool {
        index
            .tags_of(reference)
            .is_some_and(|tags| self.selector.matches(tags))
    }

    pub fn selector(&self) -> &Selector {
        &self.selector
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> TagSet {
        names.iter().map(|name| Tag::from(*name)).collect()
    }

    fn index() -> TagSelector {
        let mut index = TagSelector::new();
        index.register(Reference::from("a"), tags(&["x"]));
        index.register(Reference::from("b"), tags(&["x", "y"]));
        index.register(Reference::from("c"), tags(&["y"]));
        index.register(Reference::from("d"), tags(&[]));
        index
    }

    #[test]
    fn test_selection_matching_table_driven() {
        struct TestCase {
            name: &'static str,
            expression: &'static str,
            expected: Vec<&'static str>,
        }

        let test_cases = vec![
            TestCase { name: "single tag", expression: "x", expected: vec!["a", "b"] },
            TestCase { name: "conjunction", expression: "x y", expected: vec!["b"] },
            TestCase { name: "negation", expression: "y -x", expected: vec!["c"] },
            TestCase { name: "empty matches all", expression: "", expected: vec!["a", "b", "c", "d"] },
            TestCase { name: "unmatched", expression: "nothing", expected: vec![] },
        ];

        let index = index();
        for test_case in test_cases {
            let selection = Selector::parse(test_case.expression).unwrap().into_selection();
            let matched: Vec<Reference> = test_case.expected.iter().map(|r| Reference::from(*r)).collect();
            assert_eq!(
                selection.matching(&index),
                matched,
                "Test case '{}'",
                test_case.name
            );
        }
    }

    #[test]
    fn test_is_eligible() {
        let index = index();
        let selection = Selector::parse("x").unwrap().into_selection();

        assert!(selection.is_eligible(&index, &Reference::from("a")));
        assert!(!selection.is_eligible(&index, &Reference::from("c")));
        assert!(!selection.is_eligible(&index, &Reference::from("unknown")));
    }

    #[test]
    fn test_selection_is_live() {
        let mut index = index();
        let selection = Selector::parse("z").unwrap().into_selection();
        assert!(selection.matching(&index).is_empty());

        index.register(Reference::from("e"), tags(&["z"]));
        assert_eq!(selection.matching(&index), vec![Reference::from("e")]);
    }

    #[test]
    fn test_query_unions_selectors() {
        let index = index();
        let selectors = vec![Selector::parse("x -y").unwrap(), Selector::parse("y -x").unwrap()];

        let matched: Vec<String> = index.query(&selectors).into_iter().map(|r| r.0).collect();
        assert_eq!(matched, vec!["a", "c"]);
    }

    #[test]
    fn test_parse_rejects_bare_negation() {
        let err = Selector::parse("x -").unwrap_err();
        assert!(matches!(err, EngineError::InvalidSelector { .. }));
    }

    #[test]
    fn test_reregister_replaces_tags() {
        let mut index = index();
        index.register(Reference::from("a"), tags(&["y"]));

        assert_eq!(index.tags_of(&Reference::from("a")).unwrap().names(), vec!["y"]);
    }
}
