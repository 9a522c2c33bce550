// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Incremental combination trigger engine.
//!
//! A mapping binds an [`Observer`] to an ordered list of [`Selection`]s. The
//! observer is fired once for every combination holding one matching
//! reference per selection, whatever order the references were declared in.
//!
//! # Algorithm
//!
//! Registering a mapping fires the full Cartesian product of the selections'
//! current matches. After that, each newly declared reference `r` only ever
//! produces combinations that contain `r`. For every selection position `i`
//! that `r` is eligible for, the engine takes the product of
//!
//! - positions `j < i`: current matches of selection `j`, excluding `r`
//! - position `i`: exactly `[r]`
//! - positions `j > i`: current matches of selection `j`, including `r`
//!
//! Every combination containing `r` is produced by exactly one `i`, the first
//! position holding `r`. Combinations without `r` were fired earlier. No
//! record of fired combinations is kept.
//!
//! Exactly-once holds per declaration. Overwriting a reference re-announces
//! it, so combinations containing it are delivered again.

use crate::errors::EngineError;
use crate::observability::messages::trigger::{CandidateEvaluated, MappingRegistered, ObserverFailed};
use crate::observability::messages::StructuredLog;
use crate::registry::Reference;
use crate::tags::{Selection, TagSelector};
use crate::traits::{Observer, ObserverContext};
use itertools::Itertools;

/// Handle of a stored observer mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MappingId(pub usize);

struct Mapping<C> {
    observer: Box<dyn Observer<C>>,
    selections: Vec<Selection>,
    synchronized: bool,
}

/// Ordered list of observer mappings.
pub struct TriggerEngine<C> {
    mappings: Vec<Mapping<C>>,
}

impl<C> TriggerEngine<C> {
    pub fn new() -> Self {
        Self { mappings: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Stores a mapping and fires every combination already available.
    ///
    /// Returns `None` without storing anything when `selections` is empty.
    /// The mapping stays registered even if the observer fails during
    /// catch-up.
    pub fn register(
        &mut self,
        observer: Box<dyn Observer<C>>,
        selections: Vec<Selection>,
        index: &TagSelector,
        context: &mut ObserverContext<C>,
    ) -> Result<Option<MappingId>, EngineError> {
        self.store(observer, selections, index, context, false)
    }

    /// Synchronized registration: a nested fan-out where every reference of
    /// the first selection is paired with each combination of the remaining
    /// selections.
    ///
    /// This delivers the same combinations as [`register`](Self::register),
    /// grouped by the reference in the first position, and they are kept up
    /// to date the same way.
    pub fn register_synched(
        &mut self,
        observer: Box<dyn Observer<C>>,
        selections: Vec<Selection>,
        index: &TagSelector,
        context: &mut ObserverContext<C>,
    ) -> Result<Option<MappingId>, EngineError> {
        let synchronized = selections.len() > 1;
        self.store(observer, selections, index, context, synchronized)
    }

    fn store(
        &mut self,
        observer: Box<dyn Observer<C>>,
        selections: Vec<Selection>,
        index: &TagSelector,
        context: &mut ObserverContext<C>,
        synchronized: bool,
    ) -> Result<Option<MappingId>, EngineError> {
        if selections.is_empty() {
            return Ok(None);
        }

        let id = MappingId(self.mappings.len());
        self.mappings.push(Mapping {
            observer,
            selections,
            synchronized,
        });

        let Mapping {
            observer,
            selections,
            synchronized,
        } = &mut self.mappings[id.0];

        let candidates: Vec<Vec<Reference>> = selections
            .iter()
            .map(|selection| selection.matching(index))
            .collect();

        let mut fired = 0;
        for combination in product(&candidates) {
            fire(id, observer.as_mut(), context, &combination)?;
            fired += 1;
        }

        MappingRegistered {
            mapping: id.0,
            selection_count: selections.len(),
            fired,
            synchronized: *synchronized,
        }
        .log();

        Ok(Some(id))
    }

    /// Fires every combination completed by the arrival of `reference`.
    ///
    /// `reference` must already be indexed. Returns the number of
    /// combinations fired. The first observer error aborts the remaining
    /// notifications.
    pub fn evaluate_new_candidate(
        &mut self,
        index: &TagSelector,
        reference: &Reference,
        context: &mut ObserverContext<C>,
    ) -> Result<usize, EngineError> {
        let mut fired = 0;

        for (position, mapping) in self.mappings.iter_mut().enumerate() {
            let id = MappingId(position);
            let Mapping {
                observer,
                selections,
                ..
            } = mapping;

            let eligible: Vec<usize> = selections
                .iter()
                .enumerate()
                .filter(|(_, selection)| selection.is_eligible(index, reference))
                .map(|(slot, _)| slot)
                .collect();

            if eligible.is_empty() {
                continue;
            }

            let current: Vec<Vec<Reference>> = selections
                .iter()
                .map(|selection| selection.matching(index))
                .collect();

            for pinned in eligible {
                let candidates = pin(&current, pinned, reference);
                for combination in product(&candidates) {
                    fire(id, observer.as_mut(), context, &combination)?;
                    fired += 1;
                }
            }
        }

        CandidateEvaluated {
            reference: reference.as_str(),
            mapping_count: self.mappings.len(),
            fired,
        }
        .log();

        Ok(fired)
    }
}

impl<C> Default for TriggerEngine<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Every combination of one reference per candidate list; the last list
/// varies fastest. Callers never pass an empty `candidates`.
fn product(candidates: &[Vec<Reference>]) -> impl Iterator<Item = Vec<Reference>> + '_ {
    candidates
        .iter()
        .map(|matches| matches.iter().cloned())
        .multi_cartesian_product()
}

/// Candidate lists with `reference` pinned at `pinned`.
fn pin(current: &[Vec<Reference>], pinned: usize, reference: &Reference) -> Vec<Vec<Reference>> {
    current
        .iter()
        .enumerate()
        .map(|(slot, matches)| match slot.cmp(&pinned) {
            std::cmp::Ordering::Less => matches.iter().filter(|r| *r != reference).cloned().collect(),
            std::cmp::Ordering::Equal => vec![reference.clone()],
            std::cmp::Ordering::Greater => matches.clone(),
        })
        .collect()
}

fn fire<C>(
    id: MappingId,
    observer: &mut dyn Observer<C>,
    context: &mut ObserverContext<C>,
    combination: &[Reference],
) -> Result<(), EngineError> {
    observer.notify(context, combination).map_err(|source| {
        let names: Vec<&str> = combination.iter().map(Reference::as_str).collect();
        ObserverFailed {
            mapping: id.0,
            combination: &names,
            error: &source,
        }
        .log();
        EngineError::Observer {
            mapping: id.0,
            combination: combination.to_vec(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tags::{Selector, Tag, TagSet};
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::rc::Rc;

    type Calls = Rc<RefCell<Vec<Vec<String>>>>;

    fn recorder() -> (Calls, Box<dyn Observer<()>>) {
        let calls: Calls = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&calls);
        let observer = move |_: &mut ObserverContext<()>, combination: &[Reference]| -> anyhow::Result<()> {
            sink.borrow_mut()
                .push(combination.iter().map(|r| r.to_string()).collect());
            Ok(())
        };
        (calls, Box::new(observer))
    }

    fn selection(expression: &str) -> Selection {
        Selector::parse(expression).unwrap().into_selection()
    }

    fn add(index: &mut TagSelector, trigger: &mut TriggerEngine<()>, reference: &str, tags: &[&str]) -> usize {
        let reference = Reference::from(reference);
        let tags: TagSet = tags.iter().map(|t| Tag::from(*t)).collect();
        index.register(reference.clone(), tags);
        trigger
            .evaluate_new_candidate(index, &reference, &mut ObserverContext::new())
            .unwrap()
    }

    fn combos(calls: &Calls) -> Vec<Vec<String>> {
        calls.borrow().clone()
    }

    fn pair(a: &str, b: &str) -> Vec<String> {
        vec![a.to_string(), b.to_string()]
    }

    #[test]
    fn test_empty_selections_is_noop() {
        let mut trigger = TriggerEngine::new();
        let (_, observer) = recorder();

        let id = trigger
            .register(observer, vec![], &TagSelector::new(), &mut ObserverContext::new())
            .unwrap();

        assert!(id.is_none());
        assert!(trigger.is_empty());
    }

    #[test]
    fn test_catch_up_fires_current_product() {
        let mut index = TagSelector::new();
        let mut trigger = TriggerEngine::new();
        add(&mut index, &mut trigger, "a", &["x"]);
        add(&mut index, &mut trigger, "b", &["x"]);
        add(&mut index, &mut trigger, "c", &["y"]);

        let (calls, observer) = recorder();
        let id = trigger
            .register(observer, vec![selection("x"), selection("y")], &index, &mut ObserverContext::new())
            .unwrap();

        assert_eq!(id, Some(MappingId(0)));
        assert_eq!(combos(&calls), vec![pair("a", "c"), pair("b", "c")]);
    }

    #[test]
    fn test_catch_up_varies_last_selection_fastest() {
        let mut index = TagSelector::new();
        let mut trigger = TriggerEngine::new();
        for (reference, tag) in [("a", "x"), ("b", "x"), ("c", "y"), ("d", "y")] {
            add(&mut index, &mut trigger, reference, &[tag]);
        }

        let (calls, observer) = recorder();
        trigger
            .register(observer, vec![selection("x"), selection("y")], &index, &mut ObserverContext::new())
            .unwrap();

        assert_eq!(
            combos(&calls),
            vec![pair("a", "c"), pair("a", "d"), pair("b", "c"), pair("b", "d")]
        );
    }

    #[test]
    fn test_unmatched_selection_fires_nothing() {
        let mut index = TagSelector::new();
        let mut trigger = TriggerEngine::new();
        add(&mut index, &mut trigger, "a", &["x"]);

        let (calls, observer) = recorder();
        trigger
            .register(observer, vec![selection("x"), selection("y")], &index, &mut ObserverContext::new())
            .unwrap();
        assert_eq!(add(&mut index, &mut trigger, "b", &["x"]), 0);

        assert!(combos(&calls).is_empty());
    }

    #[test]
    fn test_incremental_fires_only_new_combinations() {
        let mut index = TagSelector::new();
        let mut trigger = TriggerEngine::new();
        let (calls, observer) = recorder();
        trigger
            .register(observer, vec![selection("x"), selection("y")], &index, &mut ObserverContext::new())
            .unwrap();

        assert_eq!(add(&mut index, &mut trigger, "b", &["x"]), 0);
        assert_eq!(add(&mut index, &mut trigger, "d", &["y"]), 1);
        assert_eq!(add(&mut index, &mut trigger, "e", &["y"]), 1);
        assert_eq!(add(&mut index, &mut trigger, "f", &["x"]), 2);

        assert_eq!(
            combos(&calls),
            vec![pair("b", "d"), pair("b", "e"), pair("f", "d"), pair("f", "e")]
        );
    }

    #[test]
    fn test_reference_eligible_in_several_slots() {
        let mut index = TagSelector::new();
        let mut trigger = TriggerEngine::new();
        let (calls, observer) = recorder();
        trigger
            .register(observer, vec![selection("x"), selection("x")], &index, &mut ObserverContext::new())
            .unwrap();

        add(&mut index, &mut trigger, "a", &["x"]);
        add(&mut index, &mut trigger, "b", &["x"]);

        let mut fired = combos(&calls);
        fired.sort();
        assert_eq!(
            fired,
            vec![pair("a", "a"), pair("a", "b"), pair("b", "a"), pair("b", "b")]
        );
    }

    #[test]
    fn test_every_order_yields_same_combinations_once() {
        let entities: Vec<(&str, Vec<&str>)> = vec![
            ("a", vec!["x"]),
            ("b", vec!["x", "y"]),
            ("c", vec!["y", "z"]),
            ("d", vec!["z", "x"]),
        ];
        let orders: Vec<Vec<usize>> = vec![
            vec![0, 1, 2, 3],
            vec![3, 2, 1, 0],
            vec![1, 3, 0, 2],
            vec![2, 0, 3, 1],
        ];

        let mut expected: Option<HashSet<Vec<String>>> = None;
        for order in orders {
            let mut index = TagSelector::new();
            let mut trigger = TriggerEngine::new();
            let (calls, observer) = recorder();

            // Register the observer after the first entity to mix catch-up and incremental paths
            let (first, rest) = order.split_first().unwrap();
            add(&mut index, &mut trigger, entities[*first].0, &entities[*first].1);
            trigger
                .register(
                    observer,
                    vec![selection("x"), selection("y"), selection("z")],
                    &index,
                    &mut ObserverContext::new(),
                )
                .unwrap();
            for position in rest {
                add(&mut index, &mut trigger, entities[*position].0, &entities[*position].1);
            }

            let fired = combos(&calls);
            let unique: HashSet<Vec<String>> = fired.iter().cloned().collect();
            assert_eq!(unique.len(), fired.len(), "duplicates fired for order {:?}", order);

            // x: a, b, d; y: b, c; z: c, d
            assert_eq!(unique.len(), 3 * 2 * 2);
            match &expected {
                Some(previous) => assert_eq!(previous, &unique),
                None => expected = Some(unique),
            }
        }
    }

    #[test]
    fn test_observer_error_aborts_batch() {
        let mut index = TagSelector::new();
        let mut trigger: TriggerEngine<()> = TriggerEngine::new();
        let failing = |_: &mut ObserverContext<()>, _: &[Reference]| -> anyhow::Result<()> {
            anyhow::bail!("boom")
        };
        let (calls, observer) = recorder();
        trigger
            .register(Box::new(failing), vec![selection("x")], &index, &mut ObserverContext::new())
            .unwrap();
        trigger
            .register(observer, vec![selection("x")], &index, &mut ObserverContext::new())
            .unwrap();

        index.register(Reference::from("a"), [Tag::from("x")].into_iter().collect());
        let err = trigger
            .evaluate_new_candidate(&index, &Reference::from("a"), &mut ObserverContext::new())
            .unwrap_err();

        match err {
            EngineError::Observer { mapping, combination, .. } => {
                assert_eq!(mapping, 0);
                assert_eq!(combination, vec![Reference::from("a")]);
            }
            other => panic!("expected observer error, got {other:?}"),
        }
        assert!(combos(&calls).is_empty());
    }

    #[test]
    fn test_synched_delivers_nested_fan_out() {
        let mut index = TagSelector::new();
        let mut trigger = TriggerEngine::new();
        add(&mut index, &mut trigger, "a", &["x"]);
        add(&mut index, &mut trigger, "b", &["x"]);
        add(&mut index, &mut trigger, "c", &["y"]);
        add(&mut index, &mut trigger, "d", &["y"]);

        let (calls, observer) = recorder();
        trigger
            .register_synched(observer, vec![selection("x"), selection("y")], &index, &mut ObserverContext::new())
            .unwrap();

        assert_eq!(
            combos(&calls),
            vec![pair("a", "c"), pair("a", "d"), pair("b", "c"), pair("b", "d")]
        );

        add(&mut index, &mut trigger, "e", &["x"]);
        assert_eq!(combos(&calls)[4..], [pair("e", "c"), pair("e", "d")]);
    }
}
