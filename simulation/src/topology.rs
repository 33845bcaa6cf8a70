//! Contact network construction
//!
//! Provides fixture topologies and an edge-list loader:
//! - Line: 0 - 1 - 2 - ... - (n-1)
//! - Ring: a line whose ends are joined
//! - Star: vertex 0 connected to all others
//! - Complete: everyone connected to everyone
//! - Random: each pair connected independently with a fixed probability
//! - Custom: built from an edge list in memory or on disk

use std::path::Path;

use rand::Rng;
use tracing::debug;

use epinet_core::{ContactGraph, ContactNetwork, GraphError, VertexId};

/// Builder for creating fixture topologies
pub struct TopologyBuilder {
    vertex_count: usize,
}

impl TopologyBuilder {
    /// Create a builder for a graph with vertices `0..vertex_count`
    pub fn new(vertex_count: usize) -> Self {
        Self { vertex_count }
    }

    /// Build a line topology: 0 - 1 - 2 - ...
    pub fn line(self) -> ContactGraph {
        let mut graph = ContactGraph::new(self.vertex_count);
        for i in 1..self.vertex_count {
            graph.connect(VertexId(i - 1), VertexId(i));
        }
        graph
    }

    /// Build a ring topology where each vertex is connected to its neighbors
    pub fn ring(self) -> ContactGraph {
        let n = self.vertex_count;
        let mut graph = Self::new(n).line();
        if n > 2 {
            graph.connect(VertexId(n - 1), VertexId(0));
        }
        graph
    }

    /// Build a star topology: 0 in the center, connected to all others
    pub fn star(self) -> ContactGraph {
        let mut graph = ContactGraph::new(self.vertex_count);
        for i in 1..self.vertex_count {
            graph.connect(VertexId(0), VertexId(i));
        }
        graph
    }

    /// Build a complete graph where every vertex is connected to every other
    pub fn complete(self) -> ContactGraph {
        let mut graph = ContactGraph::new(self.vertex_count);
        for i in 0..self.vertex_count {
            for j in (i + 1)..self.vertex_count {
                graph.connect(VertexId(i), VertexId(j));
            }
        }
        graph
    }

    /// Build a random graph where each pair is connected with `edge_probability`
    ///
    /// Isolated vertices are kept; they are a legitimate input for estimation.
    pub fn random<R: Rng + ?Sized>(
        self,
        edge_probability: f64,
        rng: &mut R,
    ) -> Result<ContactGraph, GraphError> {
        if !(0.0..=1.0).contains(&edge_probability) {
            return Err(GraphError::InvalidEdgeProbability(edge_probability));
        }

        let mut graph = ContactGraph::new(self.vertex_count);
        for i in 0..self.vertex_count {
            for j in (i + 1)..self.vertex_count {
                if rng.random_bool(edge_probability) {
                    graph.connect(VertexId(i), VertexId(j));
                }
            }
        }
        Ok(graph)
    }
}

/// Create a graph from an edge list, sized to the largest vertex id
pub fn from_edges(edges: &[(usize, usize)]) -> ContactGraph {
    let mut graph = ContactGraph::default();
    for &(a, b) in edges {
        graph.connect(VertexId(a), VertexId(b));
    }
    graph
}

/// Largest vertex id accepted from an edge list
///
/// Ids size the adjacency table directly, so a stray huge id in a file must
/// be an error rather than an allocation of that size.
pub const MAX_EDGE_LIST_VERTEX: usize = (1 << 24) - 1;

/// Parse a whitespace-separated edge list
///
/// One edge per line as two vertex ids. Blank lines and lines starting with
/// `#` are skipped; anything after the second id is ignored. The graph has
/// `max id + 1` vertices, or `min_vertices` if that is larger, so trailing
/// isolated vertices can be declared. Ids above [`MAX_EDGE_LIST_VERTEX`] are
/// rejected.
pub fn parse_edge_list(text: &str, min_vertices: usize) -> Result<ContactGraph, GraphError> {
    let mut edges = Vec::new();
    let mut vertex_count = min_vertices;

    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut fields = line.split_whitespace();
        let mut endpoint = |name: &str| -> Result<usize, GraphError> {
            let field = fields.next().ok_or_else(|| GraphError::MalformedEdge {
                line: idx + 1,
                reason: format!("missing {} vertex", name),
            })?;
            let id = field.parse::<usize>().map_err(|e| GraphError::MalformedEdge {
                line: idx + 1,
                reason: format!("bad {} vertex {:?}: {}", name, field, e),
            })?;
            if id > MAX_EDGE_LIST_VERTEX {
                return Err(GraphError::MalformedEdge {
                    line: idx + 1,
                    reason: format!(
                        "{} vertex {} exceeds the limit of {}",
                        name, id, MAX_EDGE_LIST_VERTEX
                    ),
                });
            }
            Ok(id)
        };

        let a = endpoint("first")?;
        let b = endpoint("second")?;
        vertex_count = vertex_count.max(a.max(b) + 1);
        if a == b {
            debug!(line = idx + 1, vertex = a, "Skipping self-loop");
            continue;
        }
        edges.push((a, b));
    }

    ContactGraph::from_edges(vertex_count, &edges)
}

/// Load an edge list from disk (see [`parse_edge_list`])
pub fn load_edge_list(
    path: impl AsRef<Path>,
    min_vertices: usize,
) -> Result<ContactGraph, GraphError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let graph = parse_edge_list(&text, min_vertices)?;
    debug!(
        path = %path.as_ref().display(),
        vertices = graph.vertex_count(),
        edges = graph.edge_count(),
        "Loaded edge list"
    );
    Ok(graph)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_line_topology() {
        let graph = TopologyBuilder::new(5).line();
        assert_eq!(graph.vertex_count(), 5);
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.are_connected(VertexId(1), VertexId(2)));
        assert!(!graph.are_connected(VertexId(0), VertexId(4)));
    }

    #[test]
    fn test_ring_topology() {
        let graph = TopologyBuilder::new(4).ring();
        assert_eq!(graph.edge_count(), 4);
        assert!(graph.are_connected(VertexId(3), VertexId(0))); // Wrap around
        assert!(!graph.are_connected(VertexId(0), VertexId(2))); // Not direct
    }

    #[test]
    fn test_tiny_topologies() {
        assert_eq!(TopologyBuilder::new(0).line().vertex_count(), 0);
        assert_eq!(TopologyBuilder::new(1).ring().edge_count(), 0);
        assert_eq!(TopologyBuilder::new(2).ring().edge_count(), 1);
    }

    #[test]
    fn test_star_and_complete() {
        let star = TopologyBuilder::new(6).star();
        assert_eq!(star.degree(VertexId(0)), 5);
        assert_eq!(star.degree(VertexId(3)), 1);

        let complete = TopologyBuilder::new(5).complete();
        assert_eq!(complete.edge_count(), 10); // C(5,2)
    }

    #[test]
    fn test_random_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        let empty = TopologyBuilder::new(10).random(0.0, &mut rng).unwrap();
        assert_eq!(empty.edge_count(), 0);
        assert_eq!(empty.isolated_count(), 10);

        let full = TopologyBuilder::new(10).random(1.0, &mut rng).unwrap();
        assert_eq!(full.edge_count(), 45);

        assert!(matches!(
            TopologyBuilder::new(10).random(1.5, &mut rng),
            Err(GraphError::InvalidEdgeProbability(_))
        ));
    }

    #[test]
    fn test_from_edges_infers_size() {
        let graph = from_edges(&[(0, 1), (1, 2), (2, 7)]);
        assert_eq!(graph.vertex_count(), 8);
        assert_eq!(graph.isolated_count(), 4);
    }

    #[test]
    fn test_parse_edge_list() {
        let text = "# contacts\n0 1\n\n1 2 0.5\n  2\t3\n";
        let graph = parse_edge_list(text, 6).unwrap();
        assert_eq!(graph.vertex_count(), 6);
        assert_eq!(graph.edge_count(), 3);
        assert!(graph.are_connected(VertexId(2), VertexId(3)));
    }

    #[test]
    fn test_parse_edge_list_reports_line() {
        let err = parse_edge_list("0 1\n1 x\n", 0).unwrap_err();
        match err {
            GraphError::MalformedEdge { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other}"),
        }

        let err = parse_edge_list("4\n", 0).unwrap_err();
        assert!(matches!(err, GraphError::MalformedEdge { line: 1, .. }));
    }

    #[test]
    fn test_parse_edge_list_rejects_huge_ids() {
        let err = parse_edge_list("0 1\n0 3000000000\n", 0).unwrap_err();
        assert!(matches!(err, GraphError::MalformedEdge { line: 2, .. }));

        let huge = format!("{} 1\n", usize::MAX);
        assert!(matches!(
            parse_edge_list(&huge, 0),
            Err(GraphError::MalformedEdge { line: 1, .. })
        ));

        let overflow = "0 99999999999999999999999\n";
        assert!(matches!(
            parse_edge_list(overflow, 0),
            Err(GraphError::MalformedEdge { line: 1, .. })
        ));
    }

    #[test]
    fn test_parse_edge_list_id_bound_and_self_loop() {
        let over = format!("0 {}\n", MAX_EDGE_LIST_VERTEX + 1);
        assert!(parse_edge_list(&over, 0).is_err());

        let graph = parse_edge_list("100000 0\n", 0).unwrap();
        assert_eq!(graph.vertex_count(), 100_001);
        assert_eq!(graph.edge_count(), 1);

        // A self-loop still declares its vertex
        let graph = parse_edge_list("0 1\n7 7\n", 0).unwrap();
        assert_eq!(graph.vertex_count(), 8);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_load_edge_list_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contacts.txt");
        std::fs::write(&path, "0 1\n1 2\n").unwrap();

        let graph = load_edge_list(&path, 0).unwrap();
        assert_eq!(graph.vertex_count(), 3);

        let missing = load_edge_list(dir.path().join("nope.txt"), 0);
        assert!(matches!(missing, Err(GraphError::Io(_))));
    }
}
