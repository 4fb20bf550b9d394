//! Edge provenance: which inference passes put each bit in the matrix.

use harflow_core::config::InferencePass;
use harflow_core::types::collections::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::matrix::AdjacencyMatrix;

/// One inferred dependency and the passes that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DependencyEdge {
    pub dependent: usize,
    pub prerequisite: usize,
    /// Producing passes in the order they ran. At most one entry per pass.
    pub kinds: SmallVec<[InferencePass; 4]>,
}

/// Matrix under construction plus its provenance list. Bits only accumulate.
#[derive(Debug)]
pub struct EdgeSet {
    matrix: AdjacencyMatrix,
    edges: Vec<DependencyEdge>,
    slots: FxHashMap<(usize, usize), usize>,
}

impl EdgeSet {
    pub fn new(n: usize) -> Self {
        Self {
            matrix: AdjacencyMatrix::new(n),
            edges: Vec::new(),
            slots: FxHashMap::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.matrix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    /// Record `dependent → prerequisite` on behalf of `pass`.
    ///
    /// Returns true when the matrix bit is new. Self-edges and out-of-range
    /// indices are refused.
    pub fn link(&mut self, dependent: usize, prerequisite: usize, pass: InferencePass) -> bool {
        if dependent == prerequisite || dependent >= self.len() || prerequisite >= self.len() {
            return false;
        }
        let fresh = self.matrix.set(dependent, prerequisite);
        match self.slots.get(&(dependent, prerequisite)) {
            Some(&slot) => {
                let kinds = &mut self.edges[slot].kinds;
                if !kinds.contains(&pass) {
                    kinds.push(pass);
                }
            }
            None => {
                self.slots.insert((dependent, prerequisite), self.edges.len());
                let mut kinds = SmallVec::new();
                kinds.push(pass);
                self.edges.push(DependencyEdge {
                    dependent,
                    prerequisite,
                    kinds,
                });
            }
        }
        fresh
    }

    pub fn matrix(&self) -> &AdjacencyMatrix {
        &self.matrix
    }

    /// Finished matrix and edges sorted by `(dependent, prerequisite)`.
    pub fn finish(self) -> (AdjacencyMatrix, Vec<DependencyEdge>) {
        let mut edges = self.edges;
        edges.sort_by_key(|e| (e.dependent, e.prerequisite));
        (self.matrix, edges)
    }
}
