//! Analysis errors.
//!
//! Most of these never escape the engine: per-entry problems are downgraded
//! to diagnostics and the run continues. Only rule compilation and
//! `try_analyze` hand them to the caller.

use super::error_code::{self, HarflowErrorCode};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalysisError {
    #[error("Invalid token rule {kind}: {message}")]
    InvalidRule { kind: String, message: String },

    #[error("Transaction {index} is missing {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("Transaction at position {position} carries sequence index {sequence_index}")]
    IndexMismatch {
        position: usize,
        sequence_index: usize,
    },

    #[error("Pass {pass} panicked: {message}")]
    PassPanicked { pass: String, message: String },
}

impl HarflowErrorCode for AnalysisError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRule { .. } => error_code::INVALID_RULE,
            Self::MissingField { .. } => error_code::MISSING_FIELD,
            Self::IndexMismatch { .. } => error_code::INDEX_MISMATCH,
            Self::PassPanicked { .. } => error_code::PASS_PANICKED,
        }
    }
}
