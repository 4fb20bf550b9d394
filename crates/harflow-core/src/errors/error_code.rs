//! Stable string codes for every error variant.

pub const CONFIG_NOT_FOUND: &str = "CONFIG_NOT_FOUND";
pub const CONFIG_PARSE: &str = "CONFIG_PARSE";
pub const CONFIG_INVALID: &str = "CONFIG_INVALID";
pub const INVALID_RULE: &str = "INVALID_RULE";
pub const MISSING_FIELD: &str = "MISSING_FIELD";
pub const INDEX_MISMATCH: &str = "INDEX_MISMATCH";
pub const PASS_PANICKED: &str = "PASS_PANICKED";

/// Errors that expose a machine-readable code to consumers.
pub trait HarflowErrorCode {
    fn error_code(&self) -> &'static str;
}
