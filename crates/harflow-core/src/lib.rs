//! # harflow-core
//!
//! Foundation crate for the harflow request-dependency engine.
//! Defines the normalized transaction model, errors, configuration,
//! tracing setup, and constants. `harflow-analysis` depends on this.

pub mod config;
pub mod constants;
pub mod errors;
pub mod tracing;
pub mod types;

pub use config::HarflowConfig;
pub use errors::{AnalysisError, ConfigError, HarflowError, HarflowErrorCode};
pub use types::transaction::{
    BodyKind, Request, RequestBody, Response, ResponseBody, Transaction,
};
