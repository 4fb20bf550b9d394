//! Non-fatal issues collected during an analysis run.

use serde::{Deserialize, Serialize};

use crate::errors::{AnalysisError, HarflowErrorCode};

/// One recorded issue. Serializable so it can travel with the result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Stable error code (see `errors::error_code`).
    pub code: String,
    /// Name of the stage that produced it ("cookie", "tracker", ...).
    pub stage: String,
    /// Affected transaction, when the issue is tied to one.
    pub index: Option<usize>,
    pub message: String,
}

/// Accumulates non-fatal errors so partial results can still be returned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error against a stage.
    pub fn record(&mut self, stage: &str, error: &AnalysisError) {
        let index = match error {
            AnalysisError::MissingField { index, .. } => Some(*index),
            AnalysisError::IndexMismatch { position, .. } => Some(*position),
            _ => None,
        };
        tracing::debug!(stage, code = error.error_code(), %error, "non-fatal analysis issue");
        self.entries.push(Diagnostic {
            code: error.error_code().to_string(),
            stage: stage.to_string(),
            index,
            message: error.to_string(),
        });
    }

    pub fn is_clean(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    /// Entries produced by a given stage.
    pub fn for_stage<'a>(&'a self, stage: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.entries.iter().filter(move |d| d.stage == stage)
    }
}
