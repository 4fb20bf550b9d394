//! Configuration system for harflow.
//! TOML-based, layered resolution: env > project > user > defaults.

pub mod analysis_config;
pub mod harflow_config;
pub mod logging_config;
pub mod scoring_config;
pub mod token_config;

pub use analysis_config::{AnalysisConfig, InferencePass};
pub use harflow_config::HarflowConfig;
pub use logging_config::LoggingConfig;
pub use scoring_config::ScoringConfig;
pub use token_config::{TokenConfig, TokenRuleSpec};
