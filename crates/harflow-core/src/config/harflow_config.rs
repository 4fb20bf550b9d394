//! Top-level harflow configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::logging_config::VALID_LEVELS;
use super::{AnalysisConfig, InferencePass, LoggingConfig, ScoringConfig, TokenConfig};
use crate::constants::{CONFIG_FILE_NAME, ENV_PREFIX};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Environment variables (`HARFLOW_*`)
/// 2. Project config (`harflow.toml` in the given root)
/// 3. User config (`~/.harflow/config.toml`)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct HarflowConfig {
    pub analysis: AnalysisConfig,
    pub tokens: TokenConfig,
    pub scoring: ScoringConfig,
    pub logging: LoggingConfig,
}

impl HarflowConfig {
    /// Load configuration for a project root.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        Self::load_layers(Self::user_config_path().as_deref(), root)
    }

    /// Load with an explicit user config path instead of `~/.harflow`.
    pub fn load_layers(user_config: Option<&Path>, root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(user_config_path) = user_config {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        let project_config_path = root.join(CONFIG_FILE_NAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);
        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    /// Validate the configuration values.
    pub fn validate(config: &HarflowConfig) -> Result<(), ConfigError> {
        for (field, value) in config.scoring.weights() {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ValidationFailed {
                    field: field.to_string(),
                    message: "must be between 0.0 and 1.0".to_string(),
                });
            }
        }
        if config.tokens.min_length == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "tokens.min_length".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        for (i, rule) in config.tokens.custom_rules.iter().enumerate() {
            if rule.pattern.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: format!("tokens.custom_rules[{i}].pattern"),
                    message: "must not be empty".to_string(),
                });
            }
            if rule.kind.trim().is_empty() {
                return Err(ConfigError::ValidationFailed {
                    field: format!("tokens.custom_rules[{i}].kind"),
                    message: "must not be empty".to_string(),
                });
            }
        }
        if !config.tokens.effective_include_default_rules() && config.tokens.custom_rules.is_empty() {
            return Err(ConfigError::ValidationFailed {
                field: "tokens.include_default_rules".to_string(),
                message: "disabling default rules requires at least one custom rule".to_string(),
            });
        }
        let level = config.logging.effective_level();
        if !VALID_LEVELS.contains(&level) {
            return Err(ConfigError::ValidationFailed {
                field: "logging.level".to_string(),
                message: format!("must be one of {}", VALID_LEVELS.join(", ")),
            });
        }
        Ok(())
    }

    /// Returns the user config path: `~/.harflow/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".harflow").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are ignored.
    fn merge_toml_file(config: &mut HarflowConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: HarflowConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`. Optional values override only when set.
    fn merge(base: &mut HarflowConfig, other: &HarflowConfig) {
        // Analysis
        if !other.analysis.passes.is_empty() {
            base.analysis.passes = other.analysis.passes.clone();
        }
        if other.analysis.duplicate_requests.is_some() {
            base.analysis.duplicate_requests = other.analysis.duplicate_requests;
        }

        // Tokens
        if other.tokens.min_length.is_some() {
            base.tokens.min_length = other.tokens.min_length;
        }
        if other.tokens.scan_cookies.is_some() {
            base.tokens.scan_cookies = other.tokens.scan_cookies;
        }
        if other.tokens.include_default_rules.is_some() {
            base.tokens.include_default_rules = other.tokens.include_default_rules;
        }
        if !other.tokens.custom_rules.is_empty() {
            base.tokens.custom_rules = other.tokens.custom_rules.clone();
        }

        // Scoring
        if other.scoring.base.is_some() {
            base.scoring.base = other.scoring.base;
        }
        if other.scoring.critical_bonus.is_some() {
            base.scoring.critical_bonus = other.scoring.critical_bonus;
        }
        if other.scoring.redundant_penalty.is_some() {
            base.scoring.redundant_penalty = other.scoring.redundant_penalty;
        }
        if other.scoring.token_bonus.is_some() {
            base.scoring.token_bonus = other.scoring.token_bonus;
        }
        if other.scoring.post_bonus.is_some() {
            base.scoring.post_bonus = other.scoring.post_bonus;
        }

        // Logging
        if other.logging.level.is_some() {
            base.logging.level = other.logging.level.clone();
        }
    }

    /// Apply environment variable overrides.
    /// Pattern: `HARFLOW_TOKENS_MIN_LENGTH`, `HARFLOW_LOG_LEVEL`, etc.
    fn apply_env_overrides(config: &mut HarflowConfig) {
        let var = |suffix: &str| std::env::var(format!("{ENV_PREFIX}{suffix}")).ok();

        if let Some(v) = var("TOKENS_MIN_LENGTH").and_then(|v| v.parse::<usize>().ok()) {
            config.tokens.min_length = Some(v);
        }
        if let Some(v) = var("TOKENS_SCAN_COOKIES").and_then(|v| v.parse::<bool>().ok()) {
            config.tokens.scan_cookies = Some(v);
        }
        if let Some(v) = var("ANALYSIS_DUPLICATE_REQUESTS").and_then(|v| v.parse::<bool>().ok()) {
            config.analysis.duplicate_requests = Some(v);
        }
        if let Some(v) = var("ANALYSIS_PASSES") {
            let passes: Vec<InferencePass> = v
                .split(',')
                .filter_map(|name| {
                    InferencePass::ALL
                        .into_iter()
                        .find(|p| p.name() == name.trim().to_ascii_lowercase())
                })
                .collect();
            if !passes.is_empty() {
                config.analysis.passes = passes;
            }
        }
        if let Some(v) = var("LOG_LEVEL") {
            config.logging.level = Some(v.to_ascii_lowercase());
        }
    }
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
