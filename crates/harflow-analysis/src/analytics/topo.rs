//! Execution order via Kahn's algorithm. `A[i][j]` means `j` runs before `i`.

use std::collections::VecDeque;

use crate::graph::AdjacencyMatrix;

/// Prerequisites first; ties broken by ascending index through a FIFO queue.
/// A cyclic graph falls back to the identity order.
pub fn topological_order(matrix: &AdjacencyMatrix) -> Vec<usize> {
    let n = matrix.len();
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut in_degree = vec![0usize; n];
    for (i, j) in matrix.edges() {
        successors[j].push(i);
        in_degree[i] += 1;
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(u) = queue.pop_front() {
        order.push(u);
        for &v in &successors[u] {
            in_degree[v] -= 1;
            if in_degree[v] == 0 {
                queue.push_back(v);
            }
        }
    }

    if order.len() != n {
        tracing::debug!(
            emitted = order.len(),
            nodes = n,
            "cycle blocks topological order, using identity"
        );
        return (0..n).collect();
    }
    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prerequisites_come_first() {
        let mut m = AdjacencyMatrix::new(4);
        m.set(0, 3);
        m.set(1, 0);
        m.set(2, 3);
        assert_eq!(topological_order(&m), vec![3, 0, 2, 1]);
    }

    #[test]
    fn cycle_falls_back_to_identity() {
        let mut m = AdjacencyMatrix::new(3);
        m.set(0, 1);
        m.set(1, 0);
        assert_eq!(topological_order(&m), vec![0, 1, 2]);
    }

    #[test]
    fn empty_matrix_has_empty_order() {
        assert!(topological_order(&AdjacencyMatrix::new(0)).is_empty());
    }
}
