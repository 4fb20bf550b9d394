//! harflow-analysis: request dependency engine
//!
//! - Tokens: credential-shaped value detection and provenance
//! - Graph: dependency matrix built by four inference passes
//! - Analytics: depth, topological order, critical path, redundancy, cycles
//! - Scoring: bounded per-request importance
//! - Stats: batch-level summary numbers
//! - Engine: orchestrates a full run into an `AnalysisResult`

pub mod analytics;
pub mod engine;
pub mod graph;
pub mod scoring;
pub mod stats;
pub mod tokens;

pub use engine::{AnalysisEngine, AnalysisResult};
pub use graph::{AdjacencyMatrix, DependencyEdge, DependencyGraphBuilder, GraphBuild};
pub use scoring::RequestAnalysis;
pub use stats::BatchStatistics;
pub use tokens::{Token, TokenFlowTracker, TokenKind, TokenRuleSet};
