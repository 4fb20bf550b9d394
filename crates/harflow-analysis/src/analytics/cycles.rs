//! Cycle groups, reported with Tarjan's SCC. Depth is unaffected; this only
//! tells the consumer where the approximation applies.

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::graph::AdjacencyMatrix;

/// Strongly connected components with more than one node, or a single node
/// with a self-edge. Each group ascending; groups ordered by first member.
pub fn find_cycles(matrix: &AdjacencyMatrix) -> Vec<Vec<usize>> {
    let n = matrix.len();
    let mut graph: DiGraph<usize, ()> = DiGraph::with_capacity(n, matrix.edge_count());
    for i in 0..n {
        graph.add_node(i);
    }
    for (i, j) in matrix.edges() {
        graph.add_edge(NodeIndex::new(i), NodeIndex::new(j), ());
    }

    let mut groups: Vec<Vec<usize>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|scc| scc.len() > 1 || scc.iter().any(|&v| matrix.get(v.index(), v.index())))
        .map(|scc| {
            let mut members: Vec<usize> = scc.into_iter().map(|v| graph[v]).collect();
            members.sort_unstable();
            members
        })
        .collect();
    groups.sort_by_key(|g| g.first().copied());
    groups
}
