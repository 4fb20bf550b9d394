//! Dependency inference configuration.

use serde::{Deserialize, Serialize};

/// The four edge-inference passes. Also used to tag which pass produced an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferencePass {
    Cookie,
    Token,
    Redirect,
    Referrer,
}

impl InferencePass {
    /// Every pass, in execution order.
    pub const ALL: [InferencePass; 4] = [Self::Cookie, Self::Token, Self::Redirect, Self::Referrer];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Cookie => "cookie",
            Self::Token => "token",
            Self::Redirect => "redirect",
            Self::Referrer => "referrer",
        }
    }
}

impl std::fmt::Display for InferencePass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Configuration for graph construction and redundancy classification.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Enabled passes. Empty means all of them.
    pub passes: Vec<InferencePass>,
    /// Treat a repeat of an earlier request (same URL, method, body) as
    /// redundant. Default: false.
    pub duplicate_requests: Option<bool>,
}

impl AnalysisConfig {
    /// Returns the passes to run, in execution order.
    pub fn effective_passes(&self) -> Vec<InferencePass> {
        if self.passes.is_empty() {
            return InferencePass::ALL.to_vec();
        }
        InferencePass::ALL
            .into_iter()
            .filter(|p| self.passes.contains(p))
            .collect()
    }

    /// Returns whether the duplicate-request rule is on, defaulting to false.
    pub fn effective_duplicate_requests(&self) -> bool {
        self.duplicate_requests.unwrap_or(false)
    }
}
