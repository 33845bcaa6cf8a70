//! Contact network representation
//!
//! [`ContactGraph`] is an undirected, unweighted adjacency-list graph whose
//! vertices are the integers `0..N`. It is built once per run and shared
//! read-only by every trial. Restricting it to a vertex subset never mutates
//! it: see [`GraphView`](crate::view::GraphView).

use derive_more::Display;
use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// Identifier of a vertex (a person in the contact network)
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct VertexId(pub usize);

impl VertexId {
    /// Position of this vertex in per-vertex arrays
    pub fn index(self) -> usize {
        self.0
    }
}

/// Read access shared by the full graph and its restricted views
///
/// Routines that only enumerate vertices and walk adjacency are written
/// against this trait so the same code runs on a [`ContactGraph`] or on a
/// pruned [`GraphView`](crate::view::GraphView).
pub trait ContactNetwork {
    /// Number of visible vertices
    fn vertex_count(&self) -> usize;

    /// Whether `vertex` is visible through this network
    fn contains(&self, vertex: VertexId) -> bool;

    /// All visible vertices
    fn vertices(&self) -> impl Iterator<Item = VertexId> + '_;

    /// Visible neighbors of `vertex`; empty if `vertex` itself is not visible
    fn neighbors(&self, vertex: VertexId) -> impl Iterator<Item = VertexId> + '_;

    /// Number of visible neighbors
    fn degree(&self, vertex: VertexId) -> usize {
        self.neighbors(vertex).count()
    }

    /// Whether a vertex restriction is in effect
    fn is_restricted(&self) -> bool {
        false
    }
}

/// An undirected contact network
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactGraph {
    adjacency: Vec<Vec<VertexId>>,
    edge_count: usize,
}

impl ContactGraph {
    /// Create a graph with `vertex_count` isolated vertices
    pub fn new(vertex_count: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); vertex_count],
            edge_count: 0,
        }
    }

    /// Create a graph with exactly `vertex_count` vertices from an edge list
    ///
    /// Self-loops and repeated edges are ignored. An endpoint outside
    /// `0..vertex_count` is an error.
    pub fn from_edges(vertex_count: usize, edges: &[(usize, usize)]) -> Result<Self, GraphError> {
        let mut graph = Self::new(vertex_count);
        for &(a, b) in edges {
            for v in [a, b] {
                if v >= vertex_count {
                    return Err(GraphError::VertexOutOfRange { vertex: v, vertex_count });
                }
            }
            graph.connect(VertexId(a), VertexId(b));
        }
        Ok(graph)
    }

    /// Append an isolated vertex and return its id
    pub fn add_vertex(&mut self) -> VertexId {
        self.adjacency.push(Vec::new());
        VertexId(self.adjacency.len() - 1)
    }

    /// Add an undirected edge, growing the vertex set to include both ends
    ///
    /// Returns `false` for self-loops and edges that already exist.
    pub fn connect(&mut self, a: VertexId, b: VertexId) -> bool {
        if a == b {
            return false;
        }

        let needed = a.index().max(b.index()) + 1;
        if self.adjacency.len() < needed {
            self.adjacency.resize_with(needed, Vec::new);
        }

        if self.adjacency[a.index()].contains(&b) {
            return false;
        }

        self.adjacency[a.index()].push(b);
        self.adjacency[b.index()].push(a);
        self.edge_count += 1;
        true
    }

    /// Neighbors of `vertex` as stored; empty for unknown vertices
    pub fn neighbor_slice(&self, vertex: VertexId) -> &[VertexId] {
        self.adjacency
            .get(vertex.index())
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Check if two vertices are directly connected
    pub fn are_connected(&self, a: VertexId, b: VertexId) -> bool {
        self.neighbor_slice(a).contains(&b)
    }

    /// Get number of edges
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Fail unless `vertex` belongs to this graph
    pub fn check_vertex(&self, vertex: VertexId) -> Result<(), GraphError> {
        if vertex.index() < self.adjacency.len() {
            Ok(())
        } else {
            Err(GraphError::VertexOutOfRange {
                vertex: vertex.index(),
                vertex_count: self.adjacency.len(),
            })
        }
    }

    /// Vertices with no neighbors
    pub fn isolated_count(&self) -> usize {
        self.adjacency.iter().filter(|n| n.is_empty()).count()
    }

    /// Largest degree in the graph (0 for an empty graph)
    pub fn max_degree(&self) -> usize {
        self.adjacency.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Mean degree (0 for an empty graph)
    pub fn mean_degree(&self) -> f64 {
        if self.adjacency.is_empty() {
            return 0.0;
        }
        (2 * self.edge_count) as f64 / self.adjacency.len() as f64
    }

    /// Print a short description, with the adjacency list for small graphs
    pub fn describe(&self) -> String {
        let mut output = String::new();
        output.push_str("Contact Network:\n");
        output.push_str(&format!("  Vertices: {}\n", self.vertex_count()));
        output.push_str(&format!("  Edges: {}\n", self.edge_count));
        output.push_str(&format!(
            "  Degree: mean {:.2}, max {}\n",
            self.mean_degree(),
            self.max_degree()
        ));
        output.push_str(&format!("  Isolated: {}\n", self.isolated_count()));

        if self.vertex_count() <= 32 {
            output.push('\n');
            for (v, neighbors) in self.adjacency.iter().enumerate() {
                let neighbor_str: Vec<String> = neighbors.iter().map(|n| n.to_string()).collect();
                output.push_str(&format!("  {} -> [{}]\n", v, neighbor_str.join(", ")));
            }
        }
        output
    }
}

impl ContactNetwork for ContactGraph {
    fn vertex_count(&self) -> usize {
        self.adjacency.len()
    }

    fn contains(&self, vertex: VertexId) -> bool {
        vertex.index() < self.adjacency.len()
    }

    fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.adjacency.len()).map(VertexId)
    }

    fn neighbors(&self, vertex: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.neighbor_slice(vertex).iter().copied()
    }

    fn degree(&self, vertex: VertexId) -> usize {
        self.neighbor_slice(vertex).len()
    }
}
