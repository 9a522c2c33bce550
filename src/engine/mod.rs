// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The datasource engine.
//!
//! [`DatasourceEngine`] ties together the registry and instance cache, the
//! tag index, the combination trigger engine and the injected strategies.
//!
//! Declaring a datasource stores its registration, indexes its tags
//! (declared plus inferred) and then lets every observer mapping react to
//! the new reference. Resolving a datasource lazily builds its instance and
//! recursively assembles a fresh processing task tree; it never touches the
//! trigger engine.
//!
//! The engine is a plain single-threaded structure. Every operation runs to
//! completion on the caller's thread; sharing one engine between threads
//! needs an external lock.
//!
//! # Example
//!
//! ```
//! use bigtempo::engine::DatasourceEngine;
//! use bigtempo::registry::{DatasourceDeclaration, Reference};
//! use bigtempo::traits::ObserverContext;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let mut engine = DatasourceEngine::<String>::with_defaults();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//!
//! let x = engine.select("x").unwrap();
//! engine
//!     .declare_observer(vec![x], move |_: &mut ObserverContext<String>, combination: &[Reference]| -> anyhow::Result<()> {
//!         sink.borrow_mut().push(combination[0].to_string());
//!         Ok(())
//!     })
//!     .unwrap();
//!
//! engine.declare(DatasourceDeclaration::new("a", "SourceA".to_string())).unwrap();
//! engine.declare(DatasourceDeclaration::new("b", "SourceB".to_string()).tags(["x"])).unwrap();
//!
//! assert_eq!(*seen.borrow(), vec!["b".to_string()]);
//! assert_eq!(*engine.resolve("b").unwrap().instance, "SourceB");
//! ```

mod builder;
mod resolver;
mod trigger;


pub use builder::EngineBuilder;
pub use trigger::{MappingId, TriggerEngine};

use crate::config::{validate_graph, DependencyGraph, DuplicatePolicy, EngineOptions};
use crate::errors::{EngineError, ValidationError};
use crate::observability::messages::registry::DatasourceRegistered;
use crate::observability::messages::trigger::DerivedDeclarationsQueued;
use crate::observability::messages::StructuredLog;
use crate::registry::{DatasourceDeclaration, Reference, Registration, Registry};
use crate::strategies::ProcessingTask;
use crate::tags::{RawTags, Selection, Selector, TagSelector, TagSet};
use crate::traits::{Builder, Observer, ObserverContext, TagDeclarator, TaskFactory};
use resolver::Resolver;
use std::collections::{BTreeSet, VecDeque};
use std::sync::Arc;

/// Registry of datasources with lazy instantiation, dependency resolution
/// and tag-driven observers.
///
/// * `C` - constructor type stored per declaration
/// * `I` - instance type produced by the builder
/// * `T` - processing task type produced by the task factory
pub struct DatasourceEngine<C, I = C, T = ProcessingTask<I>> {
    registry: Registry<C, I>,
    tags: TagSelector,
    trigger: TriggerEngine<C>,
    builder: Box<dyn Builder<C, I>>,
    task_factory: Box<dyn TaskFactory<I, T>>,
    tag_declarator: Box<dyn TagDeclarator<C>>,
    options: EngineOptions,
}

impl<C: Clone> DatasourceEngine<C, C, ProcessingTask<C>> {
    /// Engine with the default strategies and options.
    pub fn with_defaults() -> Self {
        EngineBuilder::with_defaults().build()
    }
}

impl<C, I, T> DatasourceEngine<C, I, T> {
    pub(crate) fn from_parts(
        builder: Box<dyn Builder<C, I>>,
        task_factory: Box<dyn TaskFactory<I, T>>,
        tag_declarator: Box<dyn TagDeclarator<C>>,
        options: EngineOptions,
    ) -> Self {
        Self {
            registry: Registry::new(),
            tags: TagSelector::new(),
            trigger: TriggerEngine::new(),
            builder,
            task_factory,
            tag_declarator,
            options,
        }
    }

    pub fn options(&self) -> EngineOptions {
        self.options
    }

    /// Declares a datasource.
    ///
    /// Derived declarations queued by observers while handling it are
    /// declared afterwards, in order. The first failure stops processing and
    /// discards whatever is still queued.
    pub fn declare(&mut self, declaration: DatasourceDeclaration<C>) -> Result<(), EngineError> {
        self.drain(vec![declaration])
    }

    /// Registers `observer` over `selections` and fires it for every
    /// combination currently available.
    ///
    /// Returns `None` when `selections` is empty, in which case nothing is
    /// stored.
    pub fn declare_observer(
        &mut self,
        selections: Vec<Selection>,
        observer: impl Observer<C> + 'static,
    ) -> Result<Option<MappingId>, EngineError> {
        let mut context = ObserverContext::new();
        let id = self
            .trigger
            .register(Box::new(observer), selections, &self.tags, &mut context)?;
        self.drain(context.into_pending())?;
        Ok(id)
    }

    /// Synchronized variant of [`declare_observer`](Self::declare_observer);
    /// see [`TriggerEngine::register_synched`].
    pub fn declare_synchronized_observer(
        &mut self,
        selections: Vec<Selection>,
        observer: impl Observer<C> + 'static,
    ) -> Result<Option<MappingId>, EngineError> {
        let mut context = ObserverContext::new();
        let id = self
            .trigger
            .register_synched(Box::new(observer), selections, &self.tags, &mut context)?;
        self.drain(context.into_pending())?;
        Ok(id)
    }

    fn drain(&mut self, pending: Vec<DatasourceDeclaration<C>>) -> Result<(), EngineError> {
        let mut queue = VecDeque::from(pending);
        while let Some(declaration) = queue.pop_front() {
            let reference = declaration.reference.clone();
            let derived = self.register(declaration)?;
            if !derived.is_empty() {
                DerivedDeclarationsQueued {
                    trigger: reference.as_str(),
                    count: derived.len(),
                }
                .log();
                queue.extend(derived);
            }
        }
        Ok(())
    }

    /// Stores one declaration, indexes its tags and notifies the trigger
    /// engine. Returns the declarations observers queued meanwhile.
    fn register(&mut self, declaration: DatasourceDeclaration<C>) -> Result<Vec<DatasourceDeclaration<C>>, EngineError> {
        let (reference, registration, raw_tags) = declaration.into_parts();

        if self.options.on_duplicate == DuplicatePolicy::Reject && self.registry.contains(&reference) {
            return Err(EngineError::DuplicateRegistration { reference });
        }

        let declared = TagSet::from_raw(&reference, raw_tags, self.options.tag_policy)?;

        let previous = self.registry.register(reference.clone(), registration);
        let overwritten = previous.is_overwrite();
        let raw_inferred = self
            .tag_declarator
            .declare(&reference, self.registry.registrations());
        let inferred = match TagSet::from_raw(&reference, RawTags::List(raw_inferred), self.options.tag_policy) {
            Ok(inferred) => inferred,
            Err(err) => {
                self.registry.restore(&reference, previous);
                return Err(err);
            }
        };

        let tags = declared.union(inferred);
        DatasourceRegistered {
            reference: reference.as_str(),
            tags: &tags.names(),
            overwritten,
        }
        .log();
        self.tags.register(reference.clone(), tags);

        let mut context = ObserverContext::new();
        self.trigger
            .evaluate_new_candidate(&self.tags, &reference, &mut context)?;
        Ok(context.into_pending())
    }

    /// Parses a selector expression into a live selection.
    pub fn select(&self, expression: &str) -> Result<Selection, EngineError> {
        Ok(Selector::parse(expression)?.into_selection())
    }

    /// References currently matched by `selection`, in sorted order.
    pub fn matching(&self, selection: &Selection) -> Vec<Reference> {
        selection.matching(&self.tags)
    }

    /// References matched by any of `expressions`.
    pub fn select_all(&self, expressions: &[&str]) -> Result<BTreeSet<Reference>, EngineError> {
        let selectors = expressions
            .iter()
            .map(|expression| Selector::parse(expression))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.tags.query(&selectors))
    }

    /// Union of the tags of `references`; every known tag when none are given.
    pub fn tags_of<R: Into<Reference>>(&self, references: impl IntoIterator<Item = R>) -> Result<TagSet, EngineError> {
        let mut references = references.into_iter().map(Into::into).peekable();
        if references.peek().is_none() {
            return Ok(self.tags.all_tags());
        }

        let mut union = TagSet::new();
        for reference in references {
            let tags = self
                .tags
                .tags_of(&reference)
                .ok_or(EngineError::NotFound { reference: reference.clone() })?;
            union.extend(tags);
        }
        Ok(union)
    }

    /// Builds a fresh processing task tree for `reference`.
    ///
    /// Instances are built once and shared between trees; tasks are not.
    pub fn resolve(&mut self, reference: impl Into<Reference>) -> Result<T, EngineError> {
        let reference = reference.into();
        Resolver::new(&mut self.registry, self.builder.as_ref(), self.task_factory.as_ref()).resolve(&reference)
    }

    /// Returns the instance for `reference`, building it on first access.
    pub fn lazyload(&mut self, reference: impl Into<Reference>) -> Result<Arc<I>, EngineError> {
        let reference = reference.into();
        self.registry.lazyload(&reference, self.builder.as_ref())
    }

    /// Checks the whole registration table for unresolved dependencies and cycles.
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        validate_graph(&DependencyGraph::from(self.registry.registrations()))
    }

    /// Declared references in sorted order.
    pub fn references(&self) -> Vec<&Reference> {
        let mut references: Vec<&Reference> = self.registry.registrations().iter().map(|(r, _)| r).collect();
        references.sort();
        references
    }

    pub fn registration(&self, reference: &str) -> Option<&Registration<C>> {
        self.registry.registrations().0.get(reference)
    }

    pub fn is_instantiated(&self, reference: &str) -> bool {
        self.registry.is_instantiated(&Reference::from(reference))
    }

    pub fn mapping_count(&self) -> usize {
        self.trigger.len()
    }
}
