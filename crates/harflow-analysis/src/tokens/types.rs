//! Token types: kinds, occurrences, and the emitted token view.

use serde::{Deserialize, Serialize};

/// Category of a detected credential-shaped value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    /// Bearer / JWT.
    Bearer,
    Csrf,
    SessionId,
    ApiKey,
    /// User-defined category from a custom rule.
    Custom(String),
}

impl TokenKind {
    /// Map a configured kind name onto a category. Unknown names become custom.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "bearer" | "jwt" => Self::Bearer,
            "csrf" | "xsrf" => Self::Csrf,
            "session" | "session_id" | "sessionid" => Self::SessionId,
            "api_key" | "apikey" => Self::ApiKey,
            _ => Self::Custom(name.trim().to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Bearer => "bearer",
            Self::Csrf => "csrf",
            Self::SessionId => "session_id",
            Self::ApiKey => "api_key",
            Self::Custom(name) => name,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Which half of the exchange carried a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Request,
    Response,
}

/// Where inside that half the value was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Area {
    Header,
    Body,
    Url,
    Cookie,
}

/// One sighting of a value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenOccurrence {
    /// Sequence index of the transaction.
    pub index: usize,
    pub side: Side,
    pub area: Area,
    /// Header or cookie name; "body" / "url" otherwise.
    pub context: String,
}

/// A detected value with its inferred origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    /// Transaction whose response first carried the value.
    pub definition_site: usize,
    pub definition_area: Area,
    /// Header or cookie name at the definition site.
    pub definition_context: String,
    /// Transactions whose request side carried the value, ascending.
    pub used_by: Vec<usize>,
}
