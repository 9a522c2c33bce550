// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use bigtempo::config::load_and_validate_config;
use bigtempo::engine::{DatasourceEngine, EngineBuilder};
use bigtempo::strategies::ProcessingTask;
use serde_json::{json, Map, Value};
use std::env;
use tracing_subscriber::EnvFilter;

/// Render a processing task tree with dependencies keyed by reference
fn task_to_json(task: &ProcessingTask<String>) -> Value {
    let mut dependencies = Map::new();
    let mut references: Vec<_> = task.dependencies.keys().collect();
    references.sort();
    for reference in references {
        dependencies.insert(reference.to_string(), task_to_json(&task.dependencies[reference]));
    }

    json!({
        "constructor": task.instance.as_str(),
        "lookback": task.lookback,
        "dependencies": dependencies,
    })
}

fn run(config_file: &str, requested: &[String]) -> anyhow::Result<()> {
    let cfg = load_and_validate_config(config_file)?;

    let mut engine: DatasourceEngine<String> = EngineBuilder::with_defaults().options(cfg.options).build();
    cfg.declare_into(&mut engine)?;

    let references: Vec<String> = if requested.is_empty() {
        engine.references().into_iter().map(|r| r.to_string()).collect()
    } else {
        requested.to_vec()
    };

    println!("📋 Loaded {} datasources from {}", engine.references().len(), config_file);

    for reference in &references {
        let tags = engine.tags_of([reference.as_str()])?;
        let task = engine.resolve(reference.as_str())?;
        let output = json!({
            "reference": reference,
            "tags": tags.names(),
            "task": task_to_json(&task),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    Ok(())
}

/// Covers loading, declaring and resolving
fn failure_message(config_file: &str, error: &anyhow::Error) -> String {
    format!("❌ Failed to process {}: {}", config_file, error)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <config.yaml> [reference ...]", args[0]);
        eprintln!("Example: {} configs/market-datasources.yaml correlation", args[0]);
        std::process::exit(1);
    }

    if let Err(e) = run(&args[1], &args[2..]) {
        eprintln!("{}", failure_message(&args[1], &e));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_resolves_requested_references() {
        let requested = vec!["correlation".to_string()];
        assert!(run("configs/market-datasources.yaml", &requested).is_ok());
    }

    #[test]
    fn test_resolution_failure_is_reported_as_processing() {
        let requested = vec!["missing".to_string()];
        let err = run("configs/market-datasources.yaml", &requested).unwrap_err();

        assert_eq!(
            failure_message("configs/market-datasources.yaml", &err),
            "❌ Failed to process configs/market-datasources.yaml: datasource 'missing' is not registered"
        );
    }
}
