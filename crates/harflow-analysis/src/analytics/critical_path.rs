//! Critical path: the deepest dependency chain, traced backward from the
//! deepest node.

use crate::graph::AdjacencyMatrix;

/// Ordered from the chain's root to its deepest node.
///
/// The terminal node is the first one holding the maximum depth. Each step
/// back takes the deepest unvisited dependency whose depth is strictly lower
/// than the current node's; on equal depth the higher index wins. With no
/// dependencies anywhere the path is just the first transaction.
pub fn critical_path(matrix: &AdjacencyMatrix, depths: &[usize]) -> Vec<usize> {
    let n = matrix.len().min(depths.len());
    if n == 0 {
        return Vec::new();
    }

    let mut terminal = 0;
    for i in 1..n {
        if depths[i] > depths[terminal] {
            terminal = i;
        }
    }
    if depths[terminal] == 0 {
        return vec![0];
    }

    let mut path = vec![terminal];
    let mut visited = vec![false; n];
    let mut current = terminal;
    while depths[current] > 0 && !visited[current] {
        visited[current] = true;
        let mut next: Option<usize> = None;
        for j in matrix.dependencies(current) {
            if j >= n || visited[j] || depths[j] >= depths[current] {
                continue;
            }
            if next.map_or(true, |k| depths[j] >= depths[k]) {
                next = Some(j);
            }
        }
        match next {
            Some(j) => {
                path.push(j);
                current = j;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::depth::compute_depths;

    fn path_of(n: usize, edges: &[(usize, usize)]) -> Vec<usize> {
        let mut m = AdjacencyMatrix::new(n);
        for &(i, j) in edges {
            m.set(i, j);
        }
        critical_path(&m, &compute_depths(&m))
    }

    #[test]
    fn follows_the_longest_chain() {
        assert_eq!(path_of(5, &[(1, 0), (2, 1), (3, 0), (4, 2), (4, 3)]), vec![0, 1, 2, 4]);
    }

    #[test]
    fn equal_depth_prefers_higher_index() {
        assert_eq!(path_of(3, &[(2, 0), (2, 1)]), vec![1, 2]);
    }

    #[test]
    fn first_deepest_node_is_terminal() {
        assert_eq!(path_of(4, &[(1, 0), (3, 2)]), vec![0, 1]);
    }

    #[test]
    fn flat_batch_is_first_transaction() {
        assert_eq!(path_of(3, &[]), vec![0]);
        assert!(path_of(0, &[]).is_empty());
    }

    #[test]
    fn cycles_terminate() {
        let path = path_of(3, &[(0, 1), (1, 2), (2, 0)]);
        assert_eq!(path, vec![2, 1, 0]);
    }
}
