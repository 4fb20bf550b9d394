//! Engine-wide constants and defaults.

/// Version tag carried by every serialized `AnalysisResult`.
pub const SCHEMA_VERSION: u32 = 1;

/// Token values shorter than this are treated as noise.
pub const DEFAULT_MIN_TOKEN_LENGTH: usize = 10;

/// Name of the project-level config file.
pub const CONFIG_FILE_NAME: &str = "harflow.toml";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "HARFLOW_";

/// Method of a CORS preflight probe.
pub const PREFLIGHT_METHOD: &str = "OPTIONS";

/// First status code counted as a failed exchange.
pub const FAILURE_STATUS: u16 = 400;

/// Scoring defaults.
pub mod scoring {
    pub const BASE: f64 = 0.5;
    pub const CRITICAL_BONUS: f64 = 0.3;
    pub const REDUNDANT_PENALTY: f64 = 0.3;
    pub const TOKEN_BONUS: f64 = 0.2;
    pub const POST_BONUS: f64 = 0.1;
}

/// Default log level when neither `RUST_LOG` nor config sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";
