// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Stock strategy implementations.

pub mod defaults;

pub use defaults::{DependencyTags, IdentityBuilder, NoInferredTags, PlainTaskFactory, ProcessingTask};
