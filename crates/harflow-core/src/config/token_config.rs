//! Token detection configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_MIN_TOKEN_LENGTH;

/// A user-supplied detection rule. Compiled by `harflow-analysis`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRuleSpec {
    /// Token kind name, e.g. "bearer", "csrf", or any custom label.
    pub kind: String,
    /// Regex in `regex` crate syntax.
    pub pattern: String,
    /// Capture group holding the value. 0 means the whole match.
    #[serde(default)]
    pub capture_group: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TokenConfig {
    /// Minimum value length. Default: 10.
    pub min_length: Option<usize>,
    /// Also scan cookie pairs as a surface. Default: false.
    pub scan_cookies: Option<bool>,
    /// Keep the built-in rule table. Default: true.
    pub include_default_rules: Option<bool>,
    /// Extra rules, appended after the built-in ones.
    pub custom_rules: Vec<TokenRuleSpec>,
}

impl TokenConfig {
    pub fn effective_min_length(&self) -> usize {
        self.min_length.unwrap_or(DEFAULT_MIN_TOKEN_LENGTH)
    }

    pub fn effective_scan_cookies(&self) -> bool {
        self.scan_cookies.unwrap_or(false)
    }

    pub fn effective_include_default_rules(&self) -> bool {
        self.include_default_rules.unwrap_or(true)
    }
}
