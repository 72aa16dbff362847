//! Experiment Store - in-memory collection of loaded experiments
//!
//! An input document may hold several experiments (a multi-document YAML
//! stream, or a `kind: List` as produced by listing a cluster). The store
//! indexes them by `namespace/name` so one can be selected for reporting.

use std::collections::HashMap;

use tracing::debug;

use super::Experiment;
use crate::{Error, Result};

/// How to pick one experiment out of a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// The store must hold exactly one experiment.
    Only,
    /// Select by name and namespace.
    Named {
        /// Experiment name
        name: String,
        /// Experiment namespace
        namespace: String,
    },
    /// Select the experiment with the latest creation timestamp.
    Latest,
}

/// In-memory store of experiments.
///
/// ## Design
///
/// Experiments live in a vector in load order; a hash map from
/// `namespace/name` to position gives O(1) lookups. A later experiment with
/// the same key replaces the earlier one.
#[derive(Debug, Default)]
pub struct ExperimentStore {
    experiments: Vec<Experiment>,
    index: HashMap<String, usize>,
}

fn key(namespace: &str, name: &str) -> String {
    format!("{namespace}/{name}")
}

impl ExperimentStore {
    /// Create a new empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding the given experiments.
    #[must_use]
    pub fn from_experiments(experiments: impl IntoIterator<Item = Experiment>) -> Self {
        let mut store = Self::new();
        for experiment in experiments {
            store.add(experiment);
        }
        store
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.experiments.is_empty()
    }

    /// Get the number of experiments in the store.
    #[must_use]
    pub fn len(&self) -> usize {
        self.experiments.len()
    }

    /// Add an experiment, replacing any with the same namespace and name.
    pub fn add(&mut self, experiment: Experiment) {
        let key = key(experiment.namespace(), experiment.name());
        if let Some(&slot) = self.index.get(&key) {
            debug!(%key, "replacing experiment");
            self.experiments[slot] = experiment;
        } else {
            self.index.insert(key, self.experiments.len());
            self.experiments.push(experiment);
        }
    }

    /// Get an experiment by namespace and name.
    #[must_use]
    pub fn get(&self, namespace: &str, name: &str) -> Option<&Experiment> {
        self.index
            .get(&key(namespace, name))
            .map(|&slot| &self.experiments[slot])
    }

    /// Get the experiment with the latest creation timestamp.
    ///
    /// Experiments without a timestamp sort before all timestamped ones; among
    /// equals, the one loaded last wins.
    #[must_use]
    pub fn latest(&self) -> Option<&Experiment> {
        self.experiments
            .iter()
            .max_by_key(|e| e.metadata().creation_timestamp())
    }

    /// Select one experiment.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExperimentNotFound`] if nothing matches, or
    /// [`Error::AmbiguousInput`] if [`Selector::Only`] is used on a store
    /// holding more than one experiment.
    pub fn select(&self, selector: &Selector) -> Result<&Experiment> {
        let selected = match selector {
            Selector::Only => match self.experiments.as_slice() {
                [only] => Ok(only),
                [] => Err(Error::ExperimentNotFound("input holds no experiments".to_string())),
                many => Err(Error::AmbiguousInput(many.len())),
            },
            Selector::Named { name, namespace } => self
                .get(namespace, name)
                .ok_or_else(|| Error::ExperimentNotFound(key(namespace, name))),
            Selector::Latest => self
                .latest()
                .ok_or_else(|| Error::ExperimentNotFound("input holds no experiments".to_string())),
        }?;
        debug!(
            name = selected.name(),
            namespace = selected.namespace(),
            "selected experiment"
        );
        Ok(selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn experiment(name: &str, namespace: &str, created: Option<&str>) -> Experiment {
        let created = created.map_or_else(String::new, |c| format!("\n  creationTimestamp: {c}"));
        Experiment::from_yaml(&format!(
            "metadata:\n  name: {name}\n  namespace: {namespace}{created}\n"
        ))
        .expect("valid experiment")
    }

    #[test]
    fn test_store_default() {
        let store = ExperimentStore::new();
        assert!(store.is_empty());
        assert_eq!(store.len(), 0);
        assert!(store.latest().is_none());
    }

    #[test]
    fn test_store_add_and_get() {
        let store = ExperimentStore::from_experiments([
            experiment("a", "ns1", None),
            experiment("a", "ns2", None),
        ]);
        assert_eq!(store.len(), 2);
        assert!(store.get("ns1", "a").is_some());
        assert!(store.get("ns2", "a").is_some());
        assert!(store.get("ns3", "a").is_none());
    }

    #[test]
    fn test_store_replaces_same_key() {
        let mut store = ExperimentStore::new();
        store.add(experiment("a", "ns", None));
        store.add(experiment("a", "ns", Some("2021-01-01T00:00:00Z")));
        assert_eq!(store.len(), 1);
        let stored = store.get("ns", "a").expect("present");
        assert!(stored.metadata().creation_timestamp().is_some());
    }

    #[test]
    fn test_latest_ordering() {
        let store = ExperimentStore::from_experiments([
            experiment("old", "ns", Some("2021-01-01T00:00:00Z")),
            experiment("new", "ns", Some("2021-06-01T00:00:00Z")),
            experiment("undated", "ns", None),
        ]);
        assert_eq!(store.latest().map(Experiment::name), Some("new"));
    }

    #[test]
    fn test_select_only() {
        let empty = ExperimentStore::new();
        assert!(matches!(empty.select(&Selector::Only), Err(Error::ExperimentNotFound(_))));

        let two = ExperimentStore::from_experiments([
            experiment("a", "ns", None),
            experiment("b", "ns", None),
        ]);
        assert!(matches!(two.select(&Selector::Only), Err(Error::AmbiguousInput(2))));

        let named = Selector::Named {
            name: "b".to_string(),
            namespace: "ns".to_string(),
        };
        assert_eq!(two.select(&named).map(Experiment::name).ok(), Some("b"));
    }
}
