//! Neighborhood pruning
//!
//! A trial only needs the part of the network its outbreak can reach while
//! patient zero is still infectious. [`prune`] restricts the graph to the ball
//! of a given radius around patient zero, which bounds per-trial cost by the
//! outbreak's reach instead of the population size. [`unprune`] lifts the
//! restriction again.

use std::collections::HashSet;

use epinet_core::{ContactGraph, GraphError, GraphView, VertexId};
use tracing::trace;

/// Radius of the neighborhood simulated for a seed infectious for `infection_time` steps
///
/// Influence spreads at most one hop per step, from patient zero's side and
/// from a responder's side, so half the infectious period plus the first
/// ring of contacts is enough.
pub fn pruning_radius(infection_time: u64) -> u64 {
    1 + infection_time / 2
}

/// Restrict `graph` to the vertices within `radius` hops of `root` (inclusive)
///
/// Expansion works frontier by frontier and stops early once no new vertex
/// is found, so a radius larger than the component costs nothing extra. The
/// returned view lists members in discovery order, `root` first.
pub fn prune(
    graph: &ContactGraph,
    root: VertexId,
    radius: u64,
) -> Result<GraphView<'_>, GraphError> {
    graph.check_vertex(root)?;

    // Grows with the ball, not the graph
    let mut seen = HashSet::from([root]);
    let mut members = vec![root];
    let mut frontier_start = 0;
    let mut hops = 0;

    while hops < radius && frontier_start < members.len() {
        let frontier_end = members.len();
        for i in frontier_start..frontier_end {
            for &neighbor in graph.neighbor_slice(members[i]) {
                if seen.insert(neighbor) {
                    members.push(neighbor);
                }
            }
        }
        frontier_start = frontier_end;
        hops += 1;
    }

    trace!(root = %root, radius, hops, size = members.len(), "Pruned neighborhood");
    GraphView::from_members(graph, members)
}

/// Lift the restriction, returning the full graph
pub fn unprune(view: GraphView<'_>) -> &ContactGraph {
    view.release()
}
