//! Runs token tracking and the enabled inference passes over a batch.

use harflow_core::config::{HarflowConfig, InferencePass};
use harflow_core::errors::AnalysisError;
use harflow_core::tracing::names;
use harflow_core::types::{Diagnostics, Transaction};

use super::edge::{DependencyEdge, EdgeSet};
use super::matrix::AdjacencyMatrix;
use super::passes::{self, PassContext};
use crate::tokens::{Token, TokenFlowTracker, TokenRuleSet};

/// Stage name used for entry-level validation diagnostics.
const VALIDATION_STAGE: &str = "validation";

/// Output of a graph build. The matrix is final; nothing mutates it later.
#[derive(Debug, Clone, Default)]
pub struct GraphBuild {
    pub matrix: AdjacencyMatrix,
    pub tokens: Vec<Token>,
    pub edges: Vec<DependencyEdge>,
    pub diagnostics: Diagnostics,
}

#[derive(Debug, Clone)]
pub struct DependencyGraphBuilder<'r> {
    tracker: TokenFlowTracker<'r>,
    passes: Vec<InferencePass>,
}

impl<'r> DependencyGraphBuilder<'r> {
    /// All four passes, default tracker settings.
    pub fn new(rules: &'r TokenRuleSet) -> Self {
        Self {
            tracker: TokenFlowTracker::new(rules),
            passes: InferencePass::ALL.to_vec(),
        }
    }

    /// Passes and tracker settings taken from configuration.
    pub fn from_config(rules: &'r TokenRuleSet, config: &HarflowConfig) -> Self {
        Self {
            tracker: TokenFlowTracker::new(rules)
                .with_min_length(config.tokens.effective_min_length())
                .with_cookie_scan(config.tokens.effective_scan_cookies()),
            passes: config.analysis.effective_passes(),
        }
    }

    /// Restrict to the given passes. They still run in the canonical order.
    pub fn with_passes(mut self, passes: &[InferencePass]) -> Self {
        self.passes = InferencePass::ALL
            .into_iter()
            .filter(|p| passes.contains(p))
            .collect();
        self
    }

    pub fn build(&self, transactions: &[Transaction]) -> GraphBuild {
        let n = transactions.len();
        let _span = tracing::info_span!(names::GRAPH, transactions = n).entered();
        if n == 0 {
            return GraphBuild::default();
        }

        let mut diagnostics = validate_entries(transactions);
        let tokens = self.tracker.analyze(transactions);

        let mut edges = EdgeSet::new(n);
        let ctx = PassContext {
            transactions,
            tokens: &tokens,
        };
        for &pass in &self.passes {
            passes::run(pass, ctx, &mut edges, &mut diagnostics);
        }

        let (matrix, edges) = edges.finish();
        tracing::debug!(
            transactions = n,
            edges = edges.len(),
            tokens = tokens.len(),
            issues = diagnostics.len(),
            "dependency graph built"
        );
        GraphBuild {
            matrix,
            tokens,
            edges,
            diagnostics,
        }
    }
}

/// Per-entry checks. Problems are recorded and the entry stays in the batch;
/// node identity is always the position.
fn validate_entries(transactions: &[Transaction]) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    for (position, tx) in transactions.iter().enumerate() {
        if tx.sequence_index != position {
            tracing::warn!(
                position,
                sequence_index = tx.sequence_index,
                "sequence index does not match position"
            );
            diagnostics.record(
                VALIDATION_STAGE,
                &AnalysisError::IndexMismatch {
                    position,
                    sequence_index: tx.sequence_index,
                },
            );
        }
        if tx.request.url.is_empty() {
            tracing::warn!(index = position, "transaction has no request url");
            diagnostics.record(
                VALIDATION_STAGE,
                &AnalysisError::MissingField {
                    index: position,
                    field: "request.url",
                },
            );
        }
        if tx.request.method.is_empty() {
            diagnostics.record(
                VALIDATION_STAGE,
                &AnalysisError::MissingField {
                    index: position,
                    field: "request.method",
                },
            );
        }
    }
    diagnostics
}

#[cfg(test)]
mod tests {
    use harflow_core::types::BodyKind;

    use super::*;

    fn login_flow() -> Vec<Transaction> {
        vec![
            Transaction::new(0, "POST", "https://a.test/login")
                .with_response_cookie("session", "abc")
                .with_redirect("https://a.test/home"),
            Transaction::new(1, "GET", "https://a.test/home")
                .with_request_cookie("session", "abc")
                .with_response_header("x-csrf-token", "tok123456789"),
            Transaction::new(2, "POST", "https://a.test/api/save")
                .with_request_header("referer", "https://a.test/home")
                .with_request_body(BodyKind::Form, "csrf=tok123456789"),
        ]
    }

    #[test]
    fn empty_batch_builds_empty_graph() {
        let rules = TokenRuleSet::default_rules();
        let build = DependencyGraphBuilder::new(&rules).build(&[]);
        assert!(build.matrix.is_empty());
        assert!(build.tokens.is_empty());
        assert!(build.edges.is_empty());
        assert!(build.diagnostics.is_clean());
    }

    #[test]
    fn passes_accumulate_and_tag_provenance() {
        let rules = TokenRuleSet::default_rules();
        let build = DependencyGraphBuilder::new(&rules).build(&login_flow());
        assert!(build.matrix.get(1, 0));
        assert!(build.matrix.get(2, 1));
        assert_eq!(build.tokens.len(), 1);

        let home = build
            .edges
            .iter()
            .find(|e| e.dependent == 1 && e.prerequisite == 0)
            .unwrap();
        assert_eq!(
            home.kinds.as_slice(),
            &[InferencePass::Cookie, InferencePass::Redirect]
        );
        let save = build
            .edges
            .iter()
            .find(|e| e.dependent == 2 && e.prerequisite == 1)
            .unwrap();
        assert_eq!(
            save.kinds.as_slice(),
            &[InferencePass::Token, InferencePass::Referrer]
        );
    }

    #[test]
    fn disabled_passes_leave_no_edges() {
        let rules = TokenRuleSet::default_rules();
        let build = DependencyGraphBuilder::new(&rules)
            .with_passes(&[InferencePass::Referrer])
            .build(&login_flow());
        assert_eq!(build.matrix.edge_count(), 1);
        assert!(build.matrix.get(2, 1));
    }

    #[test]
    fn malformed_entries_are_diagnosed_not_fatal() {
        let rules = TokenRuleSet::default_rules();
        let txs = vec![
            Transaction::new(0, "GET", "https://a.test/").with_response_cookie("sid", "x"),
            Transaction::new(7, "GET", "").with_request_cookie("sid", "x"),
        ];
        let build = DependencyGraphBuilder::new(&rules).build(&txs);
        assert!(build.matrix.get(1, 0));
        assert_eq!(build.diagnostics.for_stage(VALIDATION_STAGE).count(), 2);
    }
}
