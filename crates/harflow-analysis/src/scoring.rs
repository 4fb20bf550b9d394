//! Per-request importance score and the per-request analysis view.
//!
//! The score is a ranking hint for consumers; nothing in the engine reads it.

use harflow_core::config::ScoringConfig;
use harflow_core::types::collections::FxHashSet;
use harflow_core::types::Transaction;
use serde::{Deserialize, Serialize};

use crate::analytics::GraphAnalytics;
use crate::graph::passes::token::request_carries;
use crate::tokens::Token;

/// Everything the engine concluded about one transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestAnalysis {
    pub index: usize,
    pub is_critical: bool,
    pub is_redundant: bool,
    /// In `[0, 1]`.
    pub score: f64,
    pub depth: usize,
    /// Detected token values this request sends.
    pub tokens: Vec<String>,
}

/// Combine the score components and clamp.
pub fn score(
    weights: &ScoringConfig,
    is_critical: bool,
    is_redundant: bool,
    carries_token: bool,
    is_post: bool,
) -> f64 {
    let mut score = weights.effective_base();
    if is_critical {
        score += weights.effective_critical_bonus();
    }
    if is_redundant {
        score -= weights.effective_redundant_penalty();
    }
    if carries_token {
        score += weights.effective_token_bonus();
    }
    if is_post {
        score += weights.effective_post_bonus();
    }
    score.clamp(0.0, 1.0)
}

/// One entry per transaction, in batch order.
pub fn analyze_requests(
    transactions: &[Transaction],
    analytics: &GraphAnalytics,
    tokens: &[Token],
    weights: &ScoringConfig,
) -> Vec<RequestAnalysis> {
    let critical: FxHashSet<usize> = analytics.critical_path.iter().copied().collect();
    let redundant: FxHashSet<usize> = analytics.redundant.iter().copied().collect();

    transactions
        .iter()
        .enumerate()
        .map(|(index, tx)| {
            let carried: Vec<String> = tokens
                .iter()
                .filter(|t| request_carries(&tx.request, &t.value))
                .map(|t| t.value.clone())
                .collect();
            let is_critical = critical.contains(&index);
            let is_redundant = redundant.contains(&index);
            RequestAnalysis {
                index,
                is_critical,
                is_redundant,
                score: score(
                    weights,
                    is_critical,
                    is_redundant,
                    !carried.is_empty(),
                    tx.request.is_post(),
                ),
                depth: analytics.depths.get(index).copied().unwrap_or(0),
                tokens: carried,
            }
        })
        .collect()
}
