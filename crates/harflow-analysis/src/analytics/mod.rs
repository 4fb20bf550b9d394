//! Graph analytics over a finished adjacency matrix: depth, execution order,
//! critical path, redundancy, and cycle groups.

pub mod critical_path;
pub mod cycles;
pub mod depth;
pub mod redundancy;
pub mod topo;

use harflow_core::tracing::names;
use harflow_core::types::Transaction;

use crate::graph::AdjacencyMatrix;

pub use critical_path::critical_path;
pub use cycles::find_cycles;
pub use depth::compute_depths;
pub use redundancy::find_redundant;
pub use topo::topological_order;

/// Everything derived from the matrix in one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphAnalytics {
    pub depths: Vec<usize>,
    pub topological_order: Vec<usize>,
    pub critical_path: Vec<usize>,
    pub redundant: Vec<usize>,
    pub cycles: Vec<Vec<usize>>,
}

impl GraphAnalytics {
    pub fn compute(
        matrix: &AdjacencyMatrix,
        transactions: &[Transaction],
        detect_duplicates: bool,
    ) -> Self {
        let _span = tracing::info_span!(names::ANALYTICS, nodes = matrix.len()).entered();
        let depths = compute_depths(matrix);
        let topological_order = topological_order(matrix);
        let critical_path = critical_path(matrix, &depths);
        let redundant = find_redundant(transactions, matrix, &critical_path, detect_duplicates);
        let cycles = find_cycles(matrix);
        if !cycles.is_empty() {
            tracing::warn!(groups = cycles.len(), "dependency graph contains cycles");
        }
        Self {
            depths,
            topological_order,
            critical_path,
            redundant,
            cycles,
        }
    }

    pub fn max_depth(&self) -> usize {
        self.depths.iter().copied().max().unwrap_or(0)
    }
}
