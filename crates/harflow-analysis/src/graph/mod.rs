//! Dependency graph construction: flat adjacency matrix, edge provenance,
//! the four inference passes, and the builder that runs them.

pub mod builder;
pub mod edge;
pub mod matrix;
pub mod passes;

pub use builder::{DependencyGraphBuilder, GraphBuild};
pub use edge::{DependencyEdge, EdgeSet};
pub use matrix::AdjacencyMatrix;
