//! Dependency depth: 0 for a node with no dependencies, else one more than its
//! deepest dependency.
//!
//! Walks with an explicit stack so long chains cannot overflow. A node is
//! marked visited on entry; a dependency reached again while still open
//! contributes whatever depth it holds at that moment, so nodes on a cycle
//! settle on the value seen when the cycle was entered.

use crate::graph::AdjacencyMatrix;

/// Open node: its id, the next column to inspect, and the best depth so far.
struct Frame {
    node: usize,
    cursor: usize,
    best: usize,
}

pub fn compute_depths(matrix: &AdjacencyMatrix) -> Vec<usize> {
    let n = matrix.len();
    let mut depths = vec![0usize; n];
    let mut visited = vec![false; n];
    let mut stack: Vec<Frame> = Vec::new();

    for root in 0..n {
        if visited[root] {
            continue;
        }
        visited[root] = true;
        stack.push(Frame {
            node: root,
            cursor: 0,
            best: 0,
        });

        while let Some(frame) = stack.last_mut() {
            let row = matrix.row(frame.node);
            let mut descend = None;
            while frame.cursor < n {
                let j = frame.cursor;
                frame.cursor += 1;
                if row[j] != 1 {
                    continue;
                }
                if visited[j] {
                    frame.best = frame.best.max(depths[j] + 1);
                } else {
                    visited[j] = true;
                    descend = Some(j);
                    break;
                }
            }

            if let Some(j) = descend {
                stack.push(Frame {
                    node: j,
                    cursor: 0,
                    best: 0,
                });
                continue;
            }

            let Some(done) = stack.pop() else { break };
            depths[done.node] = done.best;
            if let Some(parent) = stack.last_mut() {
                parent.best = parent.best.max(done.best + 1);
            }
        }
    }
    depths
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix(n: usize, edges: &[(usize, usize)]) -> AdjacencyMatrix {
        let mut m = AdjacencyMatrix::new(n);
        for &(i, j) in edges {
            m.set(i, j);
        }
        m
    }

    #[test]
    fn chain_depths() {
        let m = matrix(4, &[(1, 0), (2, 1), (3, 2)]);
        assert_eq!(compute_depths(&m), vec![0, 1, 2, 3]);
    }

    #[test]
    fn diamond_takes_longest_branch() {
        let m = matrix(5, &[(1, 0), (2, 1), (3, 0), (4, 2), (4, 3)]);
        assert_eq!(compute_depths(&m), vec![0, 1, 2, 1, 3]);
    }

    #[test]
    fn cycle_terminates_with_finite_depths() {
        // 0 -> 1 -> 2 -> 0
        let m = matrix(3, &[(0, 1), (1, 2), (2, 0)]);
        assert_eq!(compute_depths(&m), vec![3, 2, 1]);
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let n = 5_000;
        let edges: Vec<_> = (1..n).map(|i| (i, i - 1)).collect();
        let depths = compute_depths(&matrix(n, &edges));
        assert_eq!(depths[n - 1], n - 1);
    }
}
