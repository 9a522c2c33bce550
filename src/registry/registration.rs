// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::registry::Reference;
use crate::tags::RawTags;
use std::collections::{BTreeSet, HashMap};

/// Stored metadata for one declared datasource.
#[derive(Debug, Clone, PartialEq)]
pub struct Registration<C> {
    pub constructor: C,
    pub lookback: u32,
    pub dependencies: BTreeSet<Reference>,
}

/// The registration table, keyed by reference.
///
/// Handed to [`TagDeclarator`](crate::traits::TagDeclarator)s so inferred tags
/// can be derived from any registered datasource, including the dependencies
/// of the one being declared.
#[derive(Debug, Clone)]
pub struct Registrations<C>(pub HashMap<Reference, Registration<C>>);

impl<C> Registrations<C> {
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    pub fn get(&self, reference: &Reference) -> Option<&Registration<C>> {
        self.0.get(reference)
    }

    pub fn contains(&self, reference: &Reference) -> bool {
        self.0.contains_key(reference)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Reference, &Registration<C>)> {
        self.0.iter()
    }

    /// Inserts `registration`, returning the one it replaced.
    pub fn insert(
        &mut self,
        reference: Reference,
        registration: Registration<C>,
    ) -> Option<Registration<C>> {
        self.0.insert(reference, registration)
    }
}

impl<C> Default for Registrations<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// A datasource declaration, as handed to
/// [`DatasourceEngine::declare`](crate::engine::DatasourceEngine::declare).
///
/// # Examples
/// ```
/// use bigtempo::registry::DatasourceDeclaration;
///
/// let declaration = DatasourceDeclaration::new("moving_average", "MovingAverage")
///     .depends_on(["prices"])
///     .lookback(20)
///     .tags(["indicator"]);
///
/// assert_eq!(declaration.lookback, 20);
/// assert_eq!(declaration.dependencies.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct DatasourceDeclaration<C> {
    pub reference: Reference,
    pub constructor: C,
    pub dependencies: BTreeSet<Reference>,
    pub lookback: u32,
    pub tags: RawTags,
}

impl<C> DatasourceDeclaration<C> {
    pub fn new(reference: impl Into<Reference>, constructor: C) -> Self {
        Self {
            reference: reference.into(),
            constructor,
            dependencies: BTreeSet::new(),
            lookback: 0,
            tags: RawTags::none(),
        }
    }

    pub fn depends_on<R: Into<Reference>>(mut self, dependencies: impl IntoIterator<Item = R>) -> Self {
        self.dependencies.extend(dependencies.into_iter().map(Into::into));
        self
    }

    pub fn lookback(mut self, lookback: u32) -> Self {
        self.lookback = lookback;
        self
    }

    pub fn tags<S: Into<String>>(mut self, tags: impl IntoIterator<Item = S>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    pub fn raw_tags(mut self, tags: RawTags) -> Self {
        self.tags = tags;
        self
    }

    pub(crate) fn into_parts(self) -> (Reference, Registration<C>, RawTags) {
        let registration = Registration {
            constructor: self.constructor,
            lookback: self.lookback,
            dependencies: self.dependencies,
        };
        (self.reference, registration, self.tags)
    }
}
