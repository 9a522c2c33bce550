// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Registration table and lazily built instance cache.
//!
//! Each reference has at most one [`Registration`] and at most one cached
//! instance. Instances are built on first access through the configured
//! [`Builder`] and shared through `Arc` from then on.

mod reference;
mod registration;

pub use reference::Reference;
pub use registration::{DatasourceDeclaration, Registration, Registrations};

use crate::errors::EngineError;
use crate::observability::messages::registry::InstanceBuilt;
use crate::observability::messages::StructuredLog;
use crate::traits::Builder;
use std::collections::HashMap;
use std::sync::Arc;

/// Registration and cached instance displaced by [`Registry::register`].
#[derive(Debug)]
pub struct Replaced<C, I> {
    pub registration: Option<Registration<C>>,
    pub instance: Option<Arc<I>>,
}

impl<C, I> Replaced<C, I> {
    pub fn is_overwrite(&self) -> bool {
        self.registration.is_some()
    }
}

/// Registration metadata plus the singleton instance per reference.
#[derive(Debug)]
pub struct Registry<C, I> {
    registrations: Registrations<C>,
    instances: HashMap<Reference, Arc<I>>,
}

impl<C, I> Registry<C, I> {
    pub fn new() -> Self {
        Self {
            registrations: Registrations::new(),
            instances: HashMap::new(),
        }
    }

    /// Stores `registration`, dropping any instance cached for a replaced one.
    ///
    /// Returns what was replaced so the call can be undone with
    /// [`restore`](Self::restore).
    pub fn register(&mut self, reference: Reference, registration: Registration<C>) -> Replaced<C, I> {
        let instance = self.instances.remove(&reference);
        let registration = self.registrations.insert(reference, registration);
        Replaced { registration, instance }
    }

    /// Undoes a [`register`](Self::register) call, putting back the replaced
    /// registration and its cached instance.
    pub fn restore(&mut self, reference: &Reference, previous: Replaced<C, I>) {
        self.instances.remove(reference);
        match previous.registration {
            Some(registration) => {
                self.registrations.insert(reference.clone(), registration);
                if let Some(instance) = previous.instance {
                    self.instances.insert(reference.clone(), instance);
                }
            }
            None => {
                self.registrations.0.remove(reference);
            }
        }
    }

    pub fn registrations(&self) -> &Registrations<C> {
        &self.registrations
    }

    pub fn registration(&self, reference: &Reference) -> Result<&Registration<C>, EngineError> {
        self.registrations
            .get(reference)
            .ok_or_else(|| EngineError::NotFound {
                reference: reference.clone(),
            })
    }

    pub fn contains(&self, reference: &Reference) -> bool {
        self.registrations.contains(reference)
    }

    pub fn is_instantiated(&self, reference: &Reference) -> bool {
        self.instances.contains_key(reference)
    }

    /// Returns the cached instance for `reference`, building it on first access.
    pub fn lazyload<B>(&mut self, reference: &Reference, builder: &B) -> Result<Arc<I>, EngineError>
    where
        B: Builder<C, I> + ?Sized,
    {
        if let Some(instance) = self.instances.get(reference) {
            return Ok(Arc::clone(instance));
        }

        let registration = self.registration(reference)?;
        let instance = builder
            .build(reference, &registration.constructor)
            .map_err(|source| EngineError::Build {
                reference: reference.clone(),
                source,
            })?;

        InstanceBuilt {
            reference: reference.as_str(),
        }
        .log();

        let instance = Arc::new(instance);
        self.instances.insert(reference.clone(), Arc::clone(&instance));
        Ok(instance)
    }
}

impl<C, I> Default for Registry<C, I> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn registration(constructor: &str) -> Registration<String> {
        Registration {
            constructor: constructor.to_string(),
            lookback: 0,
            dependencies: Default::default(),
        }
    }

    #[test]
    fn test_lazyload_builds_once() {
        let calls = Cell::new(0);
        let builder = |_: &Reference, constructor: &String| -> anyhow::Result<String> {
            calls.set(calls.get() + 1);
            Ok(constructor.to_uppercase())
        };

        let mut registry: Registry<String, String> = Registry::new();
        let reference = Reference::from("prices");
        registry.register(reference.clone(), registration("prices_source"));

        let first = registry.lazyload(&reference, &builder).unwrap();
        let second = registry.lazyload(&reference, &builder).unwrap();

        assert_eq!(first.as_str(), "PRICES_SOURCE");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_lazyload_unknown_reference() {
        let builder = |_: &Reference, constructor: &String| -> anyhow::Result<String> { Ok(constructor.clone()) };
        let mut registry: Registry<String, String> = Registry::new();

        let err = registry.lazyload(&Reference::from("missing"), &builder).unwrap_err();
        assert!(matches!(err, EngineError::NotFound { .. }));
    }

    #[test]
    fn test_lazyload_propagates_builder_failure() {
        let builder = |_: &Reference, _: &String| -> anyhow::Result<String> { anyhow::bail!("no data feed") };
        let mut registry: Registry<String, String> = Registry::new();
        let reference = Reference::from("prices");
        registry.register(reference.clone(), registration("prices_source"));

        let err = registry.lazyload(&reference, &builder).unwrap_err();
        assert!(matches!(err, EngineError::Build { .. }));
        assert!(!registry.is_instantiated(&reference));
    }

    #[test]
    fn test_overwrite_drops_cached_instance() {
        let builder = |_: &Reference, constructor: &String| -> anyhow::Result<String> { Ok(constructor.clone()) };
        let mut registry: Registry<String, String> = Registry::new();
        let reference = Reference::from("prices");

        assert!(!registry.register(reference.clone(), registration("first")).is_overwrite());
        registry.lazyload(&reference, &builder).unwrap();

        let previous = registry.register(reference.clone(), registration("second"));
        assert_eq!(previous.registration.unwrap().constructor, "first");
        assert_eq!(previous.instance.unwrap().as_str(), "first");
        assert!(!registry.is_instantiated(&reference));
        assert_eq!(registry.lazyload(&reference, &builder).unwrap().as_str(), "second");
    }

    #[test]
    fn test_restore() {
        let mut registry: Registry<String, String> = Registry::new();
        let reference = Reference::from("prices");

        let previous = registry.register(reference.clone(), registration("first"));
        registry.restore(&reference, previous);
        assert!(!registry.contains(&reference));

        registry.register(reference.clone(), registration("first"));
        let previous = registry.register(reference.clone(), registration("second"));
        registry.restore(&reference, previous);
        assert_eq!(registry.registration(&reference).unwrap().constructor, "first");
    }

    #[test]
    fn test_restore_keeps_cached_instance() {
        let calls = Cell::new(0);
        let builder = |_: &Reference, constructor: &String| -> anyhow::Result<String> {
            calls.set(calls.get() + 1);
            Ok(constructor.clone())
        };
        let mut registry: Registry<String, String> = Registry::new();
        let reference = Reference::from("prices");

        registry.register(reference.clone(), registration("first"));
        let first = registry.lazyload(&reference, &builder).unwrap();

        let previous = registry.register(reference.clone(), registration("second"));
        assert!(!registry.is_instantiated(&reference));
        registry.restore(&reference, previous);

        assert!(registry.is_instantiated(&reference));
        let again = registry.lazyload(&reference, &builder).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
        assert_eq!(calls.get(), 1);
    }
}
