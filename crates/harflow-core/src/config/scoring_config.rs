//! Per-request scoring weights.

use serde::{Deserialize, Serialize};

use crate::constants::scoring;

/// Every weight is optional so config layers can tell "unset" from "set to
/// the default".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ScoringConfig {
    /// Starting score. Default: 0.5.
    pub base: Option<f64>,
    /// Added for critical-path members. Default: 0.3.
    pub critical_bonus: Option<f64>,
    /// Subtracted for redundant requests. Default: 0.3.
    pub redundant_penalty: Option<f64>,
    /// Added when the request sends a detected token. Default: 0.2.
    pub token_bonus: Option<f64>,
    /// Added for POST requests. Default: 0.1.
    pub post_bonus: Option<f64>,
}

impl ScoringConfig {
    pub fn effective_base(&self) -> f64 {
        self.base.unwrap_or(scoring::BASE)
    }

    pub fn effective_critical_bonus(&self) -> f64 {
        self.critical_bonus.unwrap_or(scoring::CRITICAL_BONUS)
    }

    pub fn effective_redundant_penalty(&self) -> f64 {
        self.redundant_penalty.unwrap_or(scoring::REDUNDANT_PENALTY)
    }

    pub fn effective_token_bonus(&self) -> f64 {
        self.token_bonus.unwrap_or(scoring::TOKEN_BONUS)
    }

    pub fn effective_post_bonus(&self) -> f64 {
        self.post_bonus.unwrap_or(scoring::POST_BONUS)
    }

    /// Field name and resolved value for every weight, for validation.
    pub fn weights(&self) -> [(&'static str, f64); 5] {
        [
            ("scoring.base", self.effective_base()),
            ("scoring.critical_bonus", self.effective_critical_bonus()),
            ("scoring.redundant_penalty", self.effective_redundant_penalty()),
            ("scoring.token_bonus", self.effective_token_bonus()),
            ("scoring.post_bonus", self.effective_post_bonus()),
        ]
    }
}
