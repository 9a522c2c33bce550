// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Strategy interfaces injected into the engine at construction.
//!
//! Every strategy has a blanket implementation for plain closures of the
//! matching shape, so simple strategies need no named type.

use crate::registry::{Reference, Registrations};
use std::collections::HashMap;
use std::sync::Arc;

/// Builds a datasource instance from its declared constructor.
pub trait Builder<C, I> {
    fn build(&self, reference: &Reference, constructor: &C) -> anyhow::Result<I>;
}

impl<C, I, F> Builder<C, I> for F
where
    F: Fn(&Reference, &C) -> anyhow::Result<I>,
{
    fn build(&self, reference: &Reference, constructor: &C) -> anyhow::Result<I> {
        self(reference, constructor)
    }
}

/// Assembles a processing task from an instance and its resolved dependencies.
pub trait TaskFactory<I, T> {
    fn create(&self, instance: Arc<I>, dependencies: HashMap<Reference, T>, lookback: u32) -> T;
}

impl<I, T, F> TaskFactory<I, T> for F
where
    F: Fn(Arc<I>, HashMap<Reference, T>, u32) -> T,
{
    fn create(&self, instance: Arc<I>, dependencies: HashMap<Reference, T>, lookback: u32) -> T {
        self(instance, dependencies, lookback)
    }
}

/// Infers implicit tags for a datasource being declared.
///
/// `registrations` already contains the declaration of `reference`. The
/// returned tags are raw and go through the engine's tag policy.
pub trait TagDeclarator<C> {
    fn declare(&self, reference: &Reference, registrations: &Registrations<C>) -> Vec<String>;
}

impl<C, F> TagDeclarator<C> for F
where
    F: Fn(&Reference, &Registrations<C>) -> Vec<String>,
{
    fn declare(&self, reference: &Reference, registrations: &Registrations<C>) -> Vec<String> {
        self(reference, registrations)
    }
}
