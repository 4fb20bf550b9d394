//! Error handling for harflow.
//! One error enum per subsystem, `thiserror` only.

pub mod analysis_error;
pub mod config_error;
pub mod error_code;

pub use analysis_error::AnalysisError;
pub use config_error::ConfigError;
pub use error_code::HarflowErrorCode;

/// Top-level error aggregating subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum HarflowError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),
}

impl HarflowErrorCode for HarflowError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Analysis(e) => e.error_code(),
        }
    }
}

/// Convenience alias used across the workspace.
pub type HarflowResult<T> = Result<T, HarflowError>;
