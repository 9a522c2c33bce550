use crate::registry::Registrations;
use std::collections::HashMap;

/// Newtype wrapper mapping each datasource to the datasources it depends on
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph(pub HashMap<String, Vec<String>>);

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Add a datasource with its dependencies
    pub fn add_dependencies(&mut self, datasource: String, dependencies: Vec<String>) {
        self.0.insert(datasource, dependencies);
    }

    /// Get dependencies for a datasource
    pub fn get_dependencies(&self, datasource: &str) -> Option<&Vec<String>> {
        self.0.get(datasource)
    }

    pub fn contains(&self, datasource: &str) -> bool {
        self.0.contains_key(datasource)
    }

    /// Get all datasource ids in sorted order
    pub fn sorted_keys(&self) -> Vec<&String> {
        let mut keys: Vec<&String> = self.0.keys().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<C> From<&Registrations<C>> for DependencyGraph {
    fn from(registrations: &Registrations<C>) -> Self {
        Self(
            registrations
                .iter()
                .map(|(reference, registration)| {
                    (
                        reference.to_string(),
                        registration.dependencies.iter().map(|d| d.to_string()).collect(),
                    )
                })
                .collect(),
        )
    }
}

impl From<HashMap<String, Vec<String>>> for DependencyGraph {
    fn from(graph: HashMap<String, Vec<String>>) -> Self {
        Self(graph)
    }
}
