//! Flat N×N dependency relation. `get(i, j)` means `i` depends on `j`.

use serde::{Deserialize, Serialize};

/// Square 0/1 matrix stored row-major in a single buffer.
///
/// Serializes as a list of rows so consumers see the familiar nested shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct AdjacencyMatrix {
    n: usize,
    cells: Vec<u8>,
}

impl AdjacencyMatrix {
    /// An `n`×`n` matrix with no edges.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            cells: vec![0; n * n],
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Record that `dependent` depends on `prerequisite`. Returns true if the
    /// bit was newly set. Out-of-range indices are ignored.
    pub fn set(&mut self, dependent: usize, prerequisite: usize) -> bool {
        if dependent >= self.n || prerequisite >= self.n {
            return false;
        }
        let cell = &mut self.cells[dependent * self.n + prerequisite];
        let fresh = *cell == 0;
        *cell = 1;
        fresh
    }

    pub fn get(&self, dependent: usize, prerequisite: usize) -> bool {
        dependent < self.n
            && prerequisite < self.n
            && self.cells[dependent * self.n + prerequisite] == 1
    }

    /// One row of raw cells.
    pub fn row(&self, i: usize) -> &[u8] {
        &self.cells[i * self.n..(i + 1) * self.n]
    }

    /// Indices `i` depends on, ascending.
    pub fn dependencies(&self, i: usize) -> impl Iterator<Item = usize> + '_ {
        self.row(i)
            .iter()
            .enumerate()
            .filter(|&(_, &cell)| cell == 1)
            .map(|(j, _)| j)
    }

    /// Indices that depend on `j`, ascending.
    pub fn dependents(&self, j: usize) -> impl Iterator<Item = usize> + '_ {
        (0..self.n).filter(move |&i| self.cells[i * self.n + j] == 1)
    }

    pub fn has_dependents(&self, j: usize) -> bool {
        self.dependents(j).next().is_some()
    }

    /// Every edge as `(dependent, prerequisite)`, row-major.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (0..self.n).flat_map(move |i| self.dependencies(i).map(move |j| (i, j)))
    }

    pub fn edge_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c == 1).count()
    }

    /// Nested rows, the serialized shape.
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        (0..self.n).map(|i| self.row(i).to_vec()).collect()
    }
}

impl From<AdjacencyMatrix> for Vec<Vec<u8>> {
    fn from(matrix: AdjacencyMatrix) -> Self {
        matrix.to_rows()
    }
}

impl TryFrom<Vec<Vec<u8>>> for AdjacencyMatrix {
    type Error = String;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        let n = rows.len();
        let mut cells = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            if row.len() != n {
                return Err(format!("row {i} has {} cells, expected {n}", row.len()));
            }
            if let Some(bad) = row.iter().find(|&&c| c > 1) {
                return Err(format!("row {i} holds non-binary cell {bad}"));
            }
            cells.extend(row);
        }
        Ok(Self { n, cells })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_is_idempotent_and_reports_fresh_bits() {
        let mut m = AdjacencyMatrix::new(3);
        assert!(m.set(2, 0));
        assert!(!m.set(2, 0));
        assert!(m.get(2, 0));
        assert!(!m.get(0, 2));
        assert_eq!(m.edge_count(), 1);
    }

    #[test]
    fn out_of_range_writes_are_ignored() {
        let mut m = AdjacencyMatrix::new(2);
        assert!(!m.set(5, 0));
        assert!(!m.get(5, 0));
        assert_eq!(m.edge_count(), 0);
    }

    #[test]
    fn neighbours_in_both_directions() {
        let mut m = AdjacencyMatrix::new(4);
        m.set(3, 1);
        m.set(3, 0);
        m.set(2, 1);
        assert_eq!(m.dependencies(3).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(m.dependents(1).collect::<Vec<_>>(), vec![2, 3]);
        assert!(!m.has_dependents(3));
        assert_eq!(m.edges().collect::<Vec<_>>(), vec![(2, 1), (3, 0), (3, 1)]);
    }

    #[test]
    fn serializes_as_rows() {
        let mut m = AdjacencyMatrix::new(2);
        m.set(1, 0);
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "[[0,0],[1,0]]");
        let back: AdjacencyMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let err = serde_json::from_str::<AdjacencyMatrix>("[[0,1],[0]]");
        assert!(err.is_err());
        let err = serde_json::from_str::<AdjacencyMatrix>("[[0,2],[0,0]]");
        assert!(err.is_err());
    }
}
