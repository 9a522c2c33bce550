// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::registry::{DatasourceDeclaration, Reference};

/// Callback fired once per distinct combination of matching references.
///
/// The combination holds one reference per selection, in the order the
/// selections were given at registration. Returning an error aborts the
/// notification batch in progress and surfaces as
/// [`EngineError::Observer`](crate::errors::EngineError::Observer).
pub trait Observer<C> {
    fn notify(&mut self, context: &mut ObserverContext<C>, combination: &[Reference]) -> anyhow::Result<()>;
}

impl<C, F> Observer<C> for F
where
    F: FnMut(&mut ObserverContext<C>, &[Reference]) -> anyhow::Result<()>,
{
    fn notify(&mut self, context: &mut ObserverContext<C>, combination: &[Reference]) -> anyhow::Result<()> {
        self(context, combination)
    }
}

/// Handle passed to observers while they are notified.
///
/// Declarations queued here are applied after the current notification batch
/// finishes, in the order they were queued.
pub struct ObserverContext<C> {
    pending: Vec<DatasourceDeclaration<C>>,
}

impl<C> ObserverContext<C> {
    pub(crate) fn new() -> Self {
        Self { pending: Vec::new() }
    }

    /// Queues a derived datasource declaration.
    pub fn declare(&mut self, declaration: DatasourceDeclaration<C>) {
        self.pending.push(declaration);
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub(crate) fn into_pending(self) -> Vec<DatasourceDeclaration<C>> {
        self.pending
    }
}
