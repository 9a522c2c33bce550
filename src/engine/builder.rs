// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::config::EngineOptions;
use crate::engine::DatasourceEngine;
use crate::strategies::{IdentityBuilder, NoInferredTags, PlainTaskFactory, ProcessingTask};
use crate::traits::{Builder, TagDeclarator, TaskFactory};

/// Engine builder - collects strategies and options for a [`DatasourceEngine`].
///
/// # Examples
///
/// ```
/// use bigtempo::config::EngineOptions;
/// use bigtempo::engine::EngineBuilder;
/// use bigtempo::strategies::DependencyTags;
///
/// let engine = EngineBuilder::<String, _, _>::with_defaults()
///     .tag_declarator(DependencyTags)
///     .options(EngineOptions::strict())
///     .build();
///
/// assert_eq!(engine.options(), EngineOptions::strict());
/// ```
pub struct EngineBuilder<C, I, T> {
    builder: Box<dyn Builder<C, I>>,
    task_factory: Box<dyn TaskFactory<I, T>>,
    tag_declarator: Box<dyn TagDeclarator<C>>,
    options: EngineOptions,
}

impl<C, I, T> EngineBuilder<C, I, T> {
    /// Starts from the given builder and task factory, inferring no tags.
    pub fn new(
        builder: impl Builder<C, I> + 'static,
        task_factory: impl TaskFactory<I, T> + 'static,
    ) -> Self {
        Self {
            builder: Box::new(builder),
            task_factory: Box::new(task_factory),
            tag_declarator: Box::new(NoInferredTags),
            options: EngineOptions::default(),
        }
    }

    pub fn builder(mut self, builder: impl Builder<C, I> + 'static) -> Self {
        self.builder = Box::new(builder);
        self
    }

    pub fn task_factory(mut self, task_factory: impl TaskFactory<I, T> + 'static) -> Self {
        self.task_factory = Box::new(task_factory);
        self
    }

    pub fn tag_declarator(mut self, tag_declarator: impl TagDeclarator<C> + 'static) -> Self {
        self.tag_declarator = Box::new(tag_declarator);
        self
    }

    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    pub fn build(self) -> DatasourceEngine<C, I, T> {
        DatasourceEngine::from_parts(self.builder, self.task_factory, self.tag_declarator, self.options)
    }
}

impl<C: Clone> EngineBuilder<C, C, ProcessingTask<C>> {
    /// Identity construction, plain processing tasks and no inferred tags.
    pub fn with_defaults() -> Self {
        Self::new(IdentityBuilder, PlainTaskFactory)
    }
}
