//! Structured logging setup and span names.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! embedding application's call. `init_tracing` is provided for binaries and
//! tests that want the default fmt subscriber.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Span names as constants for programmatic filtering.
pub mod names {
    pub const ANALYSIS: &str = "harflow.analysis";
    pub const TOKENS: &str = "harflow.tokens";
    pub const GRAPH: &str = "harflow.graph";
    pub const ANALYTICS: &str = "harflow.analytics";
}

/// Install a fmt subscriber filtered by `RUST_LOG`, falling back to `level`.
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_tracing(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}

/// Install the subscriber using the configured level.
pub fn init_from_config(config: &LoggingConfig) -> bool {
    init_tracing(config.effective_level())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_install_is_rejected() {
        let _ = init_tracing("debug");
        assert!(!init_from_config(&LoggingConfig::default()));
    }
}
