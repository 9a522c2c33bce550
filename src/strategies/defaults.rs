// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::registry::{Reference, Registrations};
use crate::traits::{Builder, TagDeclarator, TaskFactory};
use std::collections::HashMap;
use std::sync::Arc;

/// Uses the declared constructor itself as the instance.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityBuilder;

impl<C: Clone> Builder<C, C> for IdentityBuilder {
    fn build(&self, _reference: &Reference, constructor: &C) -> anyhow::Result<C> {
        Ok(constructor.clone())
    }
}

/// Runnable unit for one resolution request.
///
/// Built fresh on every resolution; only `instance` is shared between trees.
#[derive(Debug)]
pub struct ProcessingTask<I> {
    pub instance: Arc<I>,
    pub dependencies: HashMap<Reference, ProcessingTask<I>>,
    pub lookback: u32,
}

impl<I> ProcessingTask<I> {
    pub fn dependency(&self, reference: &str) -> Option<&ProcessingTask<I>> {
        self.dependencies.get(reference)
    }

    /// Number of tasks in the tree rooted here.
    pub fn size(&self) -> usize {
        1 + self.dependencies.values().map(ProcessingTask::size).sum::<usize>()
    }
}

/// Packs its inputs into a [`ProcessingTask`].
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTaskFactory;

impl<I> TaskFactory<I, ProcessingTask<I>> for PlainTaskFactory {
    fn create(
        &self,
        instance: Arc<I>,
        dependencies: HashMap<Reference, ProcessingTask<I>>,
        lookback: u32,
    ) -> ProcessingTask<I> {
        ProcessingTask {
            instance,
            dependencies,
            lookback,
        }
    }
}

/// Infers nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInferredTags;

impl<C> TagDeclarator<C> for NoInferredTags {
    fn declare(&self, _reference: &Reference, _registrations: &Registrations<C>) -> Vec<String> {
        Vec::new()
    }
}

/// Tags every datasource with the names of its dependencies.
///
/// With this declarator `select("prices")` finds everything computed
/// directly from `prices`.
#[derive(Debug, Clone, Copy, Default)]
pub struct DependencyTags;

impl<C> TagDeclarator<C> for DependencyTags {
    fn declare(&self, reference: &Reference, registrations: &Registrations<C>) -> Vec<String> {
        registrations
            .get(reference)
            .map(|registration| {
                registration
                    .dependencies
                    .iter()
                    .map(|dependency| dependency.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}
