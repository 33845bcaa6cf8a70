//! Restricted views over a contact graph
//!
//! A [`GraphView`] borrows a [`ContactGraph`] and exposes only a subset of its
//! vertices. The graph itself is never touched, so any number of views can
//! exist at once (one per trial, possibly on different threads) and dropping
//! a view is all it takes to lift the restriction.
//!
//! Neighbors outside the view are invisible: iterating the neighbors of a
//! member yields only other members.

use std::collections::HashMap;

use crate::error::GraphError;
use crate::graph::{ContactGraph, ContactNetwork, VertexId};

/// A vertex-restricted window onto a [`ContactGraph`]
#[derive(Debug, Clone)]
pub struct GraphView<'g> {
    graph: &'g ContactGraph,
    /// Members in insertion order; a member's position is its slot
    members: Vec<VertexId>,
    slots: HashMap<VertexId, usize>,
}

impl<'g> GraphView<'g> {
    /// Restrict `graph` to `members`
    ///
    /// Duplicates are dropped, keeping the first occurrence, so slot order
    /// follows the order of `members`.
    pub fn from_members(
        graph: &'g ContactGraph,
        members: impl IntoIterator<Item = VertexId>,
    ) -> Result<Self, GraphError> {
        let mut view = Self {
            graph,
            members: Vec::new(),
            slots: HashMap::new(),
        };
        for vertex in members {
            graph.check_vertex(vertex)?;
            view.insert(vertex);
        }
        Ok(view)
    }

    fn insert(&mut self, vertex: VertexId) {
        if let std::collections::hash_map::Entry::Vacant(e) = self.slots.entry(vertex) {
            e.insert(self.members.len());
            self.members.push(vertex);
        }
    }

    /// The underlying, unrestricted graph
    pub fn graph(&self) -> &'g ContactGraph {
        self.graph
    }

    /// Members in slot order
    pub fn members(&self) -> &[VertexId] {
        &self.members
    }

    /// Slot of `vertex` in per-view arrays, if it is a member
    pub fn slot(&self, vertex: VertexId) -> Option<usize> {
        self.slots.get(&vertex).copied()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Slots of the visible neighbors of the member at `slot`
    pub fn neighbor_slots(&self, slot: usize) -> impl Iterator<Item = usize> + '_ {
        let neighbors = match self.members.get(slot) {
            Some(vertex) => self.graph.neighbor_slice(*vertex),
            None => &[],
        };
        neighbors.iter().filter_map(move |n| self.slot(*n))
    }

    /// Drop the restriction and hand back the full graph
    pub fn release(self) -> &'g ContactGraph {
        self.graph
    }
}

impl ContactNetwork for GraphView<'_> {
    fn vertex_count(&self) -> usize {
        self.members.len()
    }

    fn contains(&self, vertex: VertexId) -> bool {
        self.slots.contains_key(&vertex)
    }

    fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.members.iter().copied()
    }

    fn neighbors(&self, vertex: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        let neighbors = if self.contains(vertex) {
            self.graph.neighbor_slice(vertex)
        } else {
            &[]
        };
        neighbors.iter().copied().filter(move |n| self.contains(*n))
    }

    fn is_restricted(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path5() -> ContactGraph {
        ContactGraph::from_edges(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]).unwrap()
    }

    #[test]
    fn test_out_of_view_neighbors_are_invisible() {
        let graph = path5();
        let view =
            GraphView::from_members(&graph, [VertexId(1), VertexId(2), VertexId(3)]).unwrap();

        let n1: Vec<VertexId> = view.neighbors(VertexId(1)).collect();
        assert_eq!(n1, vec![VertexId(2)]);
        assert_eq!(view.degree(VertexId(3)), 1);
        assert_eq!(view.degree(VertexId(0)), 0);
        assert!(view.is_restricted());
    }

    #[test]
    fn test_slots_follow_member_order() {
        let graph = path5();
        let view =
            GraphView::from_members(&graph, [VertexId(3), VertexId(1), VertexId(3), VertexId(2)])
                .unwrap();
        assert_eq!(view.len(), 3);
        assert_eq!(view.slot(VertexId(3)), Some(0));
        assert_eq!(view.slot(VertexId(1)), Some(1));
        assert_eq!(view.slot(VertexId(2)), Some(2));
        assert_eq!(view.slot(VertexId(0)), None);

        let mut around_two: Vec<usize> = view.neighbor_slots(2).collect();
        around_two.sort();
        assert_eq!(around_two, vec![0, 1]);
    }

    #[test]
    fn test_unknown_member_rejected() {
        let graph = path5();
        assert!(GraphView::from_members(&graph, [VertexId(5)]).is_err());
    }

    #[test]
    fn test_release_leaves_graph_untouched() {
        let graph = path5();
        let before = graph.clone();
        let view = GraphView::from_members(&graph, [VertexId(0)]).unwrap();
        let full = view.release();
        assert_eq!(full.vertex_count(), 5);
        assert!(!full.is_restricted());
        assert_eq!(*full, before);
    }
}
