//! Analysis engine: runs tracking, graph construction, analytics, scoring, and
//! statistics over one batch and bundles the outcome.

use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use harflow_core::config::HarflowConfig;
use harflow_core::constants::SCHEMA_VERSION;
use harflow_core::errors::{AnalysisError, HarflowResult};
use harflow_core::tracing::names;
use harflow_core::types::collections::FxHashSet;
use harflow_core::types::{Diagnostics, Transaction};
use serde::{Deserialize, Serialize};

use crate::analytics::GraphAnalytics;
use crate::graph::{AdjacencyMatrix, DependencyEdge, DependencyGraphBuilder};
use crate::scoring::{analyze_requests, RequestAnalysis};
use crate::stats::BatchStatistics;
use crate::tokens::{Token, TokenRuleSet};

/// Stage name attached to whole-run failures.
const ENGINE_STAGE: &str = "engine";

/// Immutable outcome of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub schema_version: u32,
    /// `adjacency[i][j] == 1` means transaction `i` depends on `j`.
    pub adjacency: AdjacencyMatrix,
    pub depths: Vec<usize>,
    pub topological_order: Vec<usize>,
    pub critical_path: Vec<usize>,
    pub redundant_indices: Vec<usize>,
    pub tokens: Vec<Token>,
    pub scores: Vec<f64>,
    pub edges: Vec<DependencyEdge>,
    pub cycles: Vec<Vec<usize>>,
    pub requests: Vec<RequestAnalysis>,
    pub statistics: BatchStatistics,
    pub diagnostics: Diagnostics,
    pub duration_us: u64,
}

impl AnalysisResult {
    /// Zero-sized result, as produced for an empty batch.
    pub fn empty() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            adjacency: AdjacencyMatrix::default(),
            depths: Vec::new(),
            topological_order: Vec::new(),
            critical_path: Vec::new(),
            redundant_indices: Vec::new(),
            tokens: Vec::new(),
            scores: Vec::new(),
            edges: Vec::new(),
            cycles: Vec::new(),
            requests: Vec::new(),
            statistics: BatchStatistics::default(),
            diagnostics: Diagnostics::new(),
            duration_us: 0,
        }
    }

    /// Empty result whose diagnostics carry `error`.
    fn failed(error: &AnalysisError) -> Self {
        let mut result = Self::empty();
        result.diagnostics.record(ENGINE_STAGE, error);
        result
    }

    /// Number of analysed transactions.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    /// Selection a consumer starts from: the critical path.
    pub fn default_selection(&self) -> Vec<usize> {
        self.critical_path.clone()
    }

    /// Order a selection for replay. Out-of-range and repeated indices are
    /// dropped; the rest follow the topological order.
    pub fn execution_order_of(&self, selection: &[usize]) -> Vec<usize> {
        let n = self.len();
        let mut rank = vec![usize::MAX; n];
        for (position, &node) in self.topological_order.iter().enumerate() {
            if node < n {
                rank[node] = position;
            }
        }

        let mut seen = FxHashSet::default();
        let mut ordered: Vec<usize> = selection
            .iter()
            .copied()
            .filter(|&i| i < n && seen.insert(i))
            .collect();
        ordered.sort_by_key(|&i| (rank[i], i));
        ordered
    }

    pub fn request(&self, index: usize) -> Option<&RequestAnalysis> {
        self.requests.get(index)
    }

    pub fn max_depth(&self) -> usize {
        self.depths.iter().copied().max().unwrap_or(0)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Holds configuration and the compiled rule table; no per-run state, so one
/// engine can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct AnalysisEngine {
    config: HarflowConfig,
    rules: TokenRuleSet,
}

impl Default for AnalysisEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisEngine {
    /// Default configuration and the built-in rule table.
    pub fn new() -> Self {
        Self {
            config: HarflowConfig::default(),
            rules: TokenRuleSet::default_rules(),
        }
    }

    /// Validate `config` and compile its rule table.
    pub fn from_config(config: HarflowConfig) -> HarflowResult<Self> {
        HarflowConfig::validate(&config)?;
        let rules = TokenRuleSet::from_config(&config.tokens)?;
        Ok(Self { config, rules })
    }

    /// Replace the rule table.
    pub fn with_rules(mut self, rules: TokenRuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn config(&self) -> &HarflowConfig {
        &self.config
    }

    pub fn rules(&self) -> &TokenRuleSet {
        &self.rules
    }

    /// Analyze a batch. Never panics: a failure inside the run yields an
    /// empty result with the failure in its diagnostics.
    pub fn analyze(&self, transactions: &[Transaction]) -> AnalysisResult {
        match self.try_analyze(transactions) {
            Ok(result) => result,
            Err(e) => AnalysisResult::failed(&e),
        }
    }

    /// Like [`analyze`](Self::analyze) but hands a failed run back as an error.
    pub fn try_analyze(&self, transactions: &[Transaction]) -> Result<AnalysisResult, AnalysisError> {
        let _span =
            tracing::info_span!(names::ANALYSIS, transactions = transactions.len()).entered();
        let stage = Cell::new(ENGINE_STAGE);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.run(transactions, &stage)));
        outcome.map_err(|payload| {
            let message = panic_message(payload.as_ref());
            tracing::warn!(stage = stage.get(), %message, "analysis run panicked");
            AnalysisError::PassPanicked {
                pass: stage.get().to_string(),
                message,
            }
        })
    }

    fn run(&self, transactions: &[Transaction], stage: &Cell<&'static str>) -> AnalysisResult {
        let start = Instant::now();
        if transactions.is_empty() {
            tracing::info!("empty batch, nothing to analyze");
            return AnalysisResult::empty();
        }

        stage.set("graph");
        let build = DependencyGraphBuilder::from_config(&self.rules, &self.config).build(transactions);

        stage.set("analytics");
        let analytics = GraphAnalytics::compute(
            &build.matrix,
            transactions,
            self.config.analysis.effective_duplicate_requests(),
        );

        stage.set("scoring");
        let requests = analyze_requests(
            transactions,
            &analytics,
            &build.tokens,
            &self.config.scoring,
        );
        let scores = requests.iter().map(|r| r.score).collect();

        stage.set("statistics");
        let statistics = BatchStatistics::compute(transactions);

        let duration_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        tracing::info!(
            transactions = transactions.len(),
            edges = build.edges.len(),
            tokens = build.tokens.len(),
            max_depth = analytics.max_depth(),
            critical = analytics.critical_path.len(),
            redundant = analytics.redundant.len(),
            issues = build.diagnostics.len(),
            duration_us,
            "analysis complete"
        );

        AnalysisResult {
            schema_version: SCHEMA_VERSION,
            adjacency: build.matrix,
            depths: analytics.depths,
            topological_order: analytics.topological_order,
            critical_path: analytics.critical_path,
            redundant_indices: analytics.redundant,
            tokens: build.tokens,
            scores,
            edges: build.edges,
            cycles: analytics.cycles,
            requests,
            statistics,
            diagnostics: build.diagnostics,
            duration_us,
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn engine_is_shareable() {
        assert_send_sync::<AnalysisEngine>();
    }

    #[test]
    fn panic_payloads_become_messages() {
        let caught = panic::catch_unwind(|| panic!("boom {}", 1)).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "boom 1");
        let caught = panic::catch_unwind(|| panic!("static")).unwrap_err();
        assert_eq!(panic_message(caught.as_ref()), "static");
    }

    #[test]
    fn failed_result_is_empty_with_diagnostic() {
        let result = AnalysisResult::failed(&AnalysisError::PassPanicked {
            pass: "graph".into(),
            message: "boom".into(),
        });
        assert!(result.is_empty());
        assert_eq!(result.schema_version, SCHEMA_VERSION);
        assert_eq!(result.diagnostics.len(), 1);
    }

    #[test]
    fn execution_order_follows_topology() {
        let mut result = AnalysisResult::empty();
        let mut m = AdjacencyMatrix::new(4);
        m.set(0, 3);
        result.adjacency = m;
        result.topological_order = vec![1, 2, 3, 0];
        assert_eq!(result.execution_order_of(&[0, 3, 9, 3, 1]), vec![1, 3, 0]);
    }
}
