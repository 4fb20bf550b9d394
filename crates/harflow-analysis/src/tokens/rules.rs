//! Token detection rules: an immutable, injectable table of
//! `{kind, pattern, capture group}` entries.

use std::sync::LazyLock;

use harflow_core::config::{TokenConfig, TokenRuleSpec};
use harflow_core::errors::AnalysisError;
use regex::Regex;

use super::types::TokenKind;

/// A compiled detection rule.
#[derive(Debug, Clone)]
pub struct TokenRule {
    pub name: String,
    pub kind: TokenKind,
    pub regex: Regex,
    /// Group holding the value; 0 is the whole match.
    pub capture_group: usize,
}

impl TokenRule {
    /// Compile a rule, checking that the capture group exists.
    pub fn new(
        name: impl Into<String>,
        kind: TokenKind,
        pattern: &str,
        capture_group: usize,
    ) -> Result<Self, AnalysisError> {
        let name = name.into();
        let regex = Regex::new(pattern).map_err(|e| AnalysisError::InvalidRule {
            kind: name.clone(),
            message: e.to_string(),
        })?;
        // captures_len counts the implicit whole-match group.
        if capture_group >= regex.captures_len() {
            return Err(AnalysisError::InvalidRule {
                kind: name,
                message: format!(
                    "capture group {capture_group} out of range ({} groups)",
                    regex.captures_len() - 1
                ),
            });
        }
        Ok(Self {
            name,
            kind,
            regex,
            capture_group,
        })
    }

    /// Every captured value in `text`, in match order.
    pub fn values<'t>(&'t self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        self.regex
            .captures_iter(text)
            .filter_map(move |caps| caps.get(self.capture_group).map(|m| m.as_str()))
    }
}

/// Built-in rules: (name, kind, pattern, capture group). Order matters: the
/// first rule to see a value decides its kind.
const DEFAULT_RULES: &[(&str, &str, &str, usize)] = &[
    (
        "bearer_jwt",
        "bearer",
        r"(?i)Bearer\s+([A-Za-z0-9\-_]+\.[A-Za-z0-9\-_]+\.[A-Za-z0-9\-_]+)",
        1,
    ),
    (
        "csrf_json_key",
        "csrf",
        r#"(?i)["'](csrf_token|xsrf_token|x-csrf-token)["']\s*:\s*["']([^"']+)["']"#,
        2,
    ),
    (
        "csrf_form_input",
        "csrf",
        r#"(?i)name=["'](_csrf|csrf-token)["'][^>]*value=["']([^"']+)["']"#,
        2,
    ),
    (
        "csrf_header",
        "csrf",
        r"(?i)\bx-(?:csrf|xsrf)-token:\s*([A-Za-z0-9\-_.+/=]+)",
        1,
    ),
    (
        "session_id",
        "session_id",
        r"(?i)(session_id|sid|jsessionid)=([A-Za-z0-9\-_]{16,})",
        2,
    ),
    (
        "api_key_json_key",
        "api_key",
        r#"(?i)["'](api_key|access_token)["']\s*:\s*["']([^"']+)["']"#,
        2,
    ),
    (
        "api_key_header",
        "api_key",
        r"(?i)(x-api-key|authorization):\s*([A-Za-z0-9\-_.]+)",
        2,
    ),
];

static DEFAULT_RULE_SET: LazyLock<Vec<TokenRule>> = LazyLock::new(|| {
    DEFAULT_RULES
        .iter()
        .filter_map(|&(name, kind, pattern, group)| {
            match TokenRule::new(name, TokenKind::from_name(kind), pattern, group) {
                Ok(rule) => Some(rule),
                Err(e) => {
                    tracing::warn!(rule = name, error = %e, "built-in token rule failed to compile");
                    None
                }
            }
        })
        .collect()
});

/// Ordered, immutable rule table shared by reference across runs.
#[derive(Debug, Clone)]
pub struct TokenRuleSet {
    rules: Vec<TokenRule>,
}

impl TokenRuleSet {
    /// The built-in table.
    pub fn default_rules() -> Self {
        Self {
            rules: DEFAULT_RULE_SET.clone(),
        }
    }

    /// A table made only of the given rules.
    pub fn from_rules(rules: Vec<TokenRule>) -> Self {
        Self { rules }
    }

    /// Compile rule specs. Fails on the first invalid one.
    pub fn from_specs(specs: &[TokenRuleSpec]) -> Result<Self, AnalysisError> {
        let rules = specs
            .iter()
            .map(|spec| {
                TokenRule::new(
                    spec.kind.clone(),
                    TokenKind::from_name(&spec.kind),
                    &spec.pattern,
                    spec.capture_group,
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    /// Built-in rules (unless disabled) followed by the configured custom rules.
    pub fn from_config(config: &TokenConfig) -> Result<Self, AnalysisError> {
        let custom = Self::from_specs(&config.custom_rules)?;
        let mut rules = if config.effective_include_default_rules() {
            DEFAULT_RULE_SET.clone()
        } else {
            Vec::new()
        };
        rules.extend(custom.rules);
        Ok(Self { rules })
    }

    pub fn iter(&self) -> impl Iterator<Item = &TokenRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for TokenRuleSet {
    fn default() -> Self {
        Self::default_rules()
    }
}
