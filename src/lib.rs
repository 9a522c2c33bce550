// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod config;     // declaration files + options
pub mod engine;     // engine facade, resolver, trigger engine
pub mod errors;     // error handling
pub mod observability;
pub mod registry;   // registrations + instance cache
pub mod strategies; // default strategy implementations
pub mod tags;       // tags + selection index
pub mod traits;     // strategy and observer abstractions
