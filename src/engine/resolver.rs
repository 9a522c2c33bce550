// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::errors::EngineError;
use crate::observability::messages::resolution::{ResolutionStarted, TaskResolved};
use crate::observability::messages::validation::CyclicDependencyDetected;
use crate::observability::messages::StructuredLog;
use crate::registry::{Reference, Registry};
use crate::traits::{Builder, TaskFactory};
use std::collections::HashMap;

/// Assembles one processing task tree.
///
/// A resolver lives for a single resolution request. `path` holds the
/// references currently being resolved, so revisiting one of them fails with
/// [`EngineError::Cycle`] instead of recursing forever. Recursion depth is
/// the length of the longest dependency chain.
pub(crate) struct Resolver<'a, C, I, T> {
    registry: &'a mut Registry<C, I>,
    builder: &'a dyn Builder<C, I>,
    task_factory: &'a dyn TaskFactory<I, T>,
    path: Vec<Reference>,
}

impl<'a, C, I, T> Resolver<'a, C, I, T> {
    pub(crate) fn new(
        registry: &'a mut Registry<C, I>,
        builder: &'a dyn Builder<C, I>,
        task_factory: &'a dyn TaskFactory<I, T>,
    ) -> Self {
        Self {
            registry,
            builder,
            task_factory,
            path: Vec::new(),
        }
    }

    pub(crate) fn resolve(&mut self, reference: &Reference) -> Result<T, EngineError> {
        if let Some(start) = self.path.iter().position(|r| r == reference) {
            let mut cycle = self.path[start..].to_vec();
            cycle.push(reference.clone());

            let names: Vec<&str> = cycle.iter().map(Reference::as_str).collect();
            CyclicDependencyDetected { cycle: &names }.log();
            return Err(EngineError::Cycle { cycle });
        }

        let span = ResolutionStarted {
            reference: reference.as_str(),
            depth: self.path.len(),
        }
        .span("resolve");
        let _entered = span.enter();

        let instance = self.registry.lazyload(reference, self.builder)?;
        let registration = self.registry.registration(reference)?;
        let dependencies = registration.dependencies.clone();
        let lookback = registration.lookback;

        self.path.push(reference.clone());
        let mut resolved = HashMap::with_capacity(dependencies.len());
        for dependency in dependencies {
            let task = self.resolve(&dependency)?;
            resolved.insert(dependency, task);
        }
        self.path.pop();

        TaskResolved {
            reference: reference.as_str(),
            dependency_count: resolved.len(),
            lookback,
        }
        .log();

        Ok(self.task_factory.create(instance, resolved, lookback))
    }
}
