//! Dependency graph validation.
//!
//! Declared datasources are checked in three stages:
//!
//! 1. **Uniqueness Validation**: Ensures all datasource ids are unique
//! 2. **Reference Validation**: Verifies all dependencies point to declared datasources
//! 3. **Cycle Detection**: Uses DFS to detect circular dependencies
//!
//! Cycle detection requires a structurally valid graph, so it only runs once
//! the first two stages pass.
//!
//! # Cycle Detection Algorithm
//! **Depth-First Search (DFS) with recursion stack**:
//! - **Time Complexity**: O(V + E) where V = datasources, E = dependencies
//! - **Space Complexity**: O(V) for visited set and recursion stack
//! - **Advantage**: Provides the actual cycle path for debugging
//!
//! The engine runs the same graph checks over its live registration table in
//! [`DatasourceEngine::validate`](crate::engine::DatasourceEngine::validate).
//!
//! # Example
//! ```rust
//! use bigtempo::config::{validate_graph, DependencyGraph};
//! use bigtempo::errors::ValidationError;
//! use std::collections::HashMap;
//!
//! let graph = DependencyGraph::from(HashMap::from([
//!     ("a".to_string(), vec!["b".to_string()]),
//!     ("b".to_string(), vec!["a".to_string()]),
//! ]));
//!
//! let errors = validate_graph(&graph).unwrap_err();
//! assert!(matches!(errors[0], ValidationError::CyclicDependency { .. }));
//! ```

use crate::config::{Config, DependencyGraph};
use crate::errors::ValidationError;
use crate::observability::messages::validation::{
    CyclicDependencyDetected, DuplicateDatasource, UnresolvedDependency, ValidationCompleted,
};
use crate::observability::messages::StructuredLog;
use std::collections::{HashMap, HashSet};

/// Validates a configuration's datasources for structural integrity.
///
/// # Returns
///
/// * `Ok(())` - Configuration is valid and can be declared
/// * `Err(Vec<ValidationError>)` - List of all validation errors found
///
/// Duplicate ids and unresolved dependencies are accumulated so all of them
/// are reported at once; cycle detection is skipped while either is present.
pub fn validate_dependency_graph(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(duplicate_errors) = validate_unique_datasource_ids(config) {
        errors.extend(duplicate_errors);
    }

    let known: HashSet<&String> = config.datasources.iter().map(|d| &d.id).collect();
    let entries = config.datasources.iter().map(|d| (&d.id, &d.depends_on));
    if let Err(unresolved_errors) = validate_dependency_references(entries, &known) {
        errors.extend(unresolved_errors);
    }

    // Check for cycles (only on a structurally valid graph)
    if errors.is_empty() {
        let graph = DependencyGraph::from(
            config
                .datasources
                .iter()
                .map(|d| (d.id.clone(), d.depends_on.clone()))
                .collect::<HashMap<_, _>>(),
        );
        if let Err(cycle_errors) = validate_acyclic_graph(&graph) {
            errors.extend(cycle_errors);
        }
    }

    ValidationCompleted {
        datasource_count: config.datasources.len(),
        error_count: errors.len(),
    }
    .log();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates that every dependency is declared and the graph is acyclic.
pub fn validate_graph(graph: &DependencyGraph) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let keys = graph.sorted_keys();
    let known: HashSet<&String> = keys.iter().copied().collect();
    let entries = keys
        .iter()
        .filter_map(|key| graph.get_dependencies(key).map(|dependencies| (*key, dependencies)));
    if let Err(unresolved_errors) = validate_dependency_references(entries, &known) {
        errors.extend(unresolved_errors);
    }

    if errors.is_empty() {
        if let Err(cycle_errors) = validate_acyclic_graph(graph) {
            errors.extend(cycle_errors);
        }
    }

    ValidationCompleted {
        datasource_count: graph.len(),
        error_count: errors.len(),
    }
    .log();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates that all datasource ids are unique within the configuration.
///
/// **Time Complexity**: O(n) where n = number of datasources
fn validate_unique_datasource_ids(config: &Config) -> Result<(), Vec<ValidationError>> {
    let mut seen_ids = HashSet::new();
    let mut errors = Vec::new();

    for datasource in &config.datasources {
        if !seen_ids.insert(&datasource.id) {
            DuplicateDatasource {
                datasource: &datasource.id,
            }
            .log();
            errors.push(ValidationError::DuplicateDatasource {
                datasource: datasource.id.clone(),
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates that all dependency references point to declared datasources.
///
/// **Time Complexity**: O(n + d) where n = datasources, d = total dependencies
fn validate_dependency_references<'a>(
    entries: impl Iterator<Item = (&'a String, &'a Vec<String>)>,
    known: &HashSet<&String>,
) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    for (datasource, dependencies) in entries {
        for dependency in dependencies {
            if !known.contains(dependency) {
                UnresolvedDependency {
                    datasource,
                    missing_dependency: dependency,
                }
                .log();
                errors.push(ValidationError::UnresolvedDependency {
                    datasource: datasource.clone(),
                    missing_dependency: dependency.clone(),
                });
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates that the dependency graph is acyclic using DFS-based cycle detection.
///
/// Uses the **"Three Colors" DFS approach**:
/// - **White (unvisited)**: Node not yet explored
/// - **Gray (in recursion stack)**: Node currently being explored
/// - **Black (visited)**: Node fully explored
///
/// Reaching a gray node means a cycle; the reported path runs from the gray
/// node along the current DFS path and back to it.
fn validate_acyclic_graph(graph: &DependencyGraph) -> Result<(), Vec<ValidationError>> {
    let mut visited = HashSet::new();
    let mut rec_stack = HashSet::new();
    let mut path = Vec::new();

    for datasource in graph.sorted_keys() {
        if !visited.contains(datasource.as_str()) {
            if let Some(cycle) =
                dfs_cycle_detection(datasource, graph, &mut visited, &mut rec_stack, &mut path)
            {
                let names: Vec<&str> = cycle.iter().map(String::as_str).collect();
                CyclicDependencyDetected { cycle: &names }.log();
                return Err(vec![ValidationError::CyclicDependency { cycle }]);
            }
        }
    }

    Ok(())
}

/// Performs depth-first search with cycle detection and path tracking.
///
/// ## Example Execution
/// For graph A → B → C → A:
/// 1. Start DFS at A: path = [A], rec_stack = {A}
/// 2. Visit B: path = [A, B], rec_stack = {A, B}
/// 3. Visit C: path = [A, B, C], rec_stack = {A, B, C}
/// 4. Try to visit A: A is in rec_stack → cycle detected!
/// 5. Cycle = [A, B, C, A]
fn dfs_cycle_detection(
    node: &str,
    graph: &DependencyGraph,
    visited: &mut HashSet<String>,
    rec_stack: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> Option<Vec<String>> {
    visited.insert(node.to_string());
    rec_stack.insert(node.to_string());
    path.push(node.to_string());

    if let Some(neighbors) = graph.get_dependencies(node) {
        for neighbor in neighbors {
            if !visited.contains(neighbor) {
                if let Some(cycle) = dfs_cycle_detection(neighbor, graph, visited, rec_stack, path) {
                    return Some(cycle);
                }
            } else if rec_stack.contains(neighbor) {
                // Found a cycle - extract the cycle path
                let cycle_start = path.iter().position(|x| x == neighbor).unwrap_or(0);
                let mut cycle = path[cycle_start..].to_vec();
                cycle.push(neighbor.clone());
                return Some(cycle);
            }
        }
    }

    rec_stack.remove(node);
    path.pop();
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DatasourceConfig, EngineOptions};

    fn create_test_datasource(id: &str, depends_on: Vec<&str>) -> DatasourceConfig {
        DatasourceConfig {
            id: id.to_string(),
            constructor: None,
            depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
            lookback: 0,
            tags: serde_yaml::Value::Null,
        }
    }

    fn config(datasources: Vec<DatasourceConfig>) -> Config {
        Config {
            options: EngineOptions::default(),
            datasources,
        }
    }

    #[test]
    fn test_valid_empty_config() {
        assert!(validate_dependency_graph(&config(vec![])).is_ok());
    }

    #[test]
    fn test_valid_linear_chain() {
        let config = config(vec![
            create_test_datasource("a", vec![]),
            create_test_datasource("b", vec!["a"]),
            create_test_datasource("c", vec!["b"]),
        ]);

        assert!(validate_dependency_graph(&config).is_ok());
    }

    #[test]
    fn test_valid_diamond_dependency() {
        let config = config(vec![
            create_test_datasource("a", vec![]),
            create_test_datasource("b", vec!["a"]),
            create_test_datasource("c", vec!["a"]),
            create_test_datasource("d", vec!["b", "c"]),
        ]);

        assert!(validate_dependency_graph(&config).is_ok());
    }

    #[test]
    fn test_duplicate_datasource_ids() {
        let config = config(vec![
            create_test_datasource("a", vec![]),
            create_test_datasource("a", vec![]),
        ]);

        let errors = validate_dependency_graph(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::DuplicateDatasource { .. }));
    }

    #[test]
    fn test_unresolved_dependency() {
        let config = config(vec![
            create_test_datasource("a", vec![]),
            create_test_datasource("b", vec!["nonexistent"]),
        ]);

        let errors = validate_dependency_graph(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnresolvedDependency {
                datasource: "b".to_string(),
                missing_dependency: "nonexistent".to_string(),
            }]
        );
    }

    #[test]
    fn test_self_dependency_cycle() {
        let config = config(vec![create_test_datasource("a", vec!["a"])]);

        let errors = validate_dependency_graph(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::CyclicDependency {
                cycle: vec!["a".to_string(), "a".to_string()],
            }]
        );
    }

    #[test]
    fn test_complex_cycle() {
        let config = config(vec![
            create_test_datasource("a", vec!["b"]),
            create_test_datasource("b", vec!["c"]),
            create_test_datasource("c", vec!["d"]),
            create_test_datasource("d", vec!["b"]),
        ]);

        let errors = validate_dependency_graph(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::CyclicDependency {
                cycle: vec!["b", "c", "d", "b"].into_iter().map(String::from).collect(),
            }]
        );
    }

    #[test]
    fn test_multiple_errors() {
        let config = config(vec![
            create_test_datasource("a", vec!["nonexistent"]),
            create_test_datasource("a", vec![]),
            create_test_datasource("b", vec!["missing"]),
        ]);

        let errors = validate_dependency_graph(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(matches!(errors[0], ValidationError::DuplicateDatasource { .. }));
    }
}
