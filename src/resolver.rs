use crate::graph::{FormNode, GraphModel};
use ahash::AHashSet;
use indexmap::IndexSet;
use itertools::Itertools;
use std::collections::VecDeque;
use tracing::debug;

/// The forms a given form may read from, split by how they are reached.
///
/// `direct` and `transitive` are disjoint, each node appears at most once
/// across both, and the owning form is never included.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencySets {
    pub direct: Vec<FormNode>,
    pub transitive: Vec<FormNode>,
}

impl DependencySets {
    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.transitive.is_empty()
    }

    /// All dependencies, direct ones first.
    pub fn iter(&self) -> impl Iterator<Item = &FormNode> {
        self.direct.iter().chain(self.transitive.iter())
    }
}

/// Computes dependency sets for a form. Implemented by `GraphModel`; data
/// source providers receive it as a capability so it can be substituted.
pub trait DependencyLookup {
    fn dependencies(&self, form_id: &str) -> DependencySets;
}

impl DependencyLookup for GraphModel {
    fn dependencies(&self, form_id: &str) -> DependencySets {
        let Some(form) = self.node(form_id) else {
            return DependencySets::default();
        };
        if form.prerequisites.is_empty() {
            return DependencySets::default();
        }

        let direct_ids: AHashSet<&str> = form.prerequisites.iter().map(String::as_str).collect();
        let mut visited: AHashSet<&str> = AHashSet::new();
        visited.insert(form_id);

        let mut transitive_ids: IndexSet<&str> = IndexSet::new();
        let mut queue: VecDeque<&str> = form.prerequisites.iter().map(String::as_str).collect();

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current) {
                continue;
            }
            let Some(node) = self.node(current) else {
                continue;
            };
            for dep in &node.prerequisites {
                let dep = dep.as_str();
                if !visited.contains(dep) && !direct_ids.contains(dep) {
                    transitive_ids.insert(dep);
                    queue.push_back(dep);
                }
            }
        }

        let direct: Vec<FormNode> = form
            .prerequisites
            .iter()
            .map(String::as_str)
            .unique()
            .filter(|id| *id != form_id)
            .filter_map(|id| self.node(id).cloned())
            .collect();
        let transitive: Vec<FormNode> = transitive_ids
            .into_iter()
            .filter_map(|id| self.node(id).cloned())
            .collect();

        debug!(
            form_id,
            direct = direct.len(),
            transitive = transitive.len(),
            "resolved form dependencies"
        );
        DependencySets { direct, transitive }
    }
}
