//! Class hierarchy backed by a petgraph directed graph.
//!
//! Every entity is a node; an edge `child -> parent` exists for each entry
//! in `parent_classes`. Subsumption questions become reachability queries.

use crate::entity::{Entity, EntityId};
use crate::error::{CoreError, CoreResult};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::Dfs;
use std::collections::{BTreeSet, HashMap};

/// Transitive `is-a` index over entity parent classes.
#[derive(Debug, Clone, Default)]
pub struct ClassHierarchy {
    graph: DiGraph<EntityId, ()>,
    index: HashMap<EntityId, NodeIndex>,
}

impl ClassHierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the hierarchy from a set of entities and their parent edges.
    pub fn from_entities<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> Self {
        let mut hierarchy = Self::new();
        for entity in entities {
            hierarchy.add(entity);
        }
        hierarchy
    }

    /// Add one entity and its direct parent edges.
    pub fn add(&mut self, entity: &Entity) {
        let child = self.node(&entity.id);
        for parent in &entity.parent_classes {
            let parent = self.node(parent);
            if self.graph.find_edge(child, parent).is_none() {
                self.graph.add_edge(child, parent, ());
            }
        }
    }

    fn node(&mut self, id: &EntityId) -> NodeIndex {
        if let Some(&idx) = self.index.get(id) {
            return idx;
        }
        let idx = self.graph.add_node(id.clone());
        self.index.insert(id.clone(), idx);
        idx
    }

    /// Whether `entity` is `class` or a (transitive) subclass of it.
    pub fn is_a(&self, entity: &EntityId, class: &EntityId) -> bool {
        if entity == class {
            return true;
        }
        let (Some(&from), Some(&to)) = (self.index.get(entity), self.index.get(class)) else {
            return false;
        };
        petgraph::algo::has_path_connecting(&self.graph, from, to, None)
    }

    /// All transitive superclasses of `entity`, excluding itself.
    pub fn ancestors(&self, entity: &EntityId) -> BTreeSet<EntityId> {
        let mut result = BTreeSet::new();
        let Some(&start) = self.index.get(entity) else {
            return result;
        };
        let mut dfs = Dfs::new(&self.graph, start);
        while let Some(idx) = dfs.next(&self.graph) {
            if idx != start {
                result.insert(self.graph[idx].clone());
            }
        }
        result
    }

    /// Fail if any class is its own ancestor.
    pub fn check_acyclic(&self) -> CoreResult<()> {
        petgraph::algo::toposort(&self.graph, None)
            .map(|_| ())
            .map_err(|cycle| CoreError::CyclicHierarchy(self.graph[cycle.node_id()].clone()))
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(s: &str) -> EntityId {
        EntityId::new(s)
    }

    #[test]
    fn is_a_is_transitive() {
        let entities = vec![
            Entity::new("Influenza", "Influenza").with_parent("ViralInfection"),
            Entity::new("ViralInfection", "Viral infection").with_parent("Disease"),
        ];
        let h = ClassHierarchy::from_entities(&entities);

        assert!(h.is_a(&id("Influenza"), &id("Disease")));
        assert!(h.is_a(&id("Influenza"), &id("Influenza")));
        assert!(!h.is_a(&id("Disease"), &id("Influenza")));
        assert!(!h.is_a(&id("Unknown"), &id("Disease")));
    }

    #[test]
    fn ancestors_exclude_self() {
        let entities = vec![
            Entity::new("A", "A").with_parent("B").with_parent("C"),
            Entity::new("B", "B").with_parent("D"),
        ];
        let h = ClassHierarchy::from_entities(&entities);
        let ancestors = h.ancestors(&id("A"));
        assert_eq!(ancestors, [id("B"), id("C"), id("D")].into_iter().collect());
    }

    #[test]
    fn cycle_is_rejected() {
        let entities = vec![
            Entity::new("A", "A").with_parent("B"),
            Entity::new("B", "B").with_parent("A"),
        ];
        let h = ClassHierarchy::from_entities(&entities);
        assert!(matches!(h.check_acyclic(), Err(CoreError::CyclicHierarchy(_))));
    }
}
