//! Normalized request/response exchange as produced by the ingestion step.
//!
//! Field names serialize in camelCase, matching the JSON the capture parser
//! emits. Header keys are expected lower-case; lookups lower-case the probe.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{FAILURE_STATUS, PREFLIGHT_METHOD};

/// Content classification of a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Form,
    Json,
    #[default]
    Text,
    Xml,
    Html,
    Binary,
    #[serde(other)]
    Other,
}

impl BodyKind {
    /// Binary bodies are accounted for by size only and never scanned.
    pub fn is_scannable(&self) -> bool {
        !matches!(self, Self::Binary)
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestBody {
    #[serde(alias = "contentType")]
    pub kind: BodyKind,
    #[serde(alias = "data")]
    pub text: String,
    pub size: u64,
}

/// Response body.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseBody {
    #[serde(alias = "contentType")]
    pub kind: BodyKind,
    #[serde(alias = "data")]
    pub text: String,
    pub size: u64,
    pub truncated: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub method: String,
    pub url: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<RequestBody>,
}

impl Request {
    /// Header value by name (case-insensitive probe against lower-case keys).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The `referer` header, falling back to the correctly spelled variant.
    pub fn referrer(&self) -> Option<&str> {
        self.header("referer").or_else(|| self.header("referrer"))
    }

    /// Body text, if present and not binary.
    pub fn body_text(&self) -> Option<&str> {
        self.body
            .as_ref()
            .filter(|b| b.kind.is_scannable())
            .map(|b| b.text.as_str())
    }

    pub fn body_size(&self) -> u64 {
        self.body.as_ref().map_or(0, |b| b.size)
    }

    pub fn is_preflight(&self) -> bool {
        self.method.eq_ignore_ascii_case(PREFLIGHT_METHOD)
    }

    pub fn is_post(&self) -> bool {
        self.method.eq_ignore_ascii_case("POST")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub status: u16,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub cookies: BTreeMap<String, String>,
    #[serde(default)]
    pub redirect_url: Option<String>,
    #[serde(default)]
    pub body: Option<ResponseBody>,
}

impl Response {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn body_text(&self) -> Option<&str> {
        self.body
            .as_ref()
            .filter(|b| b.kind.is_scannable())
            .map(|b| b.text.as_str())
    }

    pub fn body_size(&self) -> u64 {
        self.body.as_ref().map_or(0, |b| b.size)
    }

    /// Status 4xx or 5xx.
    pub fn is_failure(&self) -> bool {
        self.status >= FAILURE_STATUS
    }

    pub fn is_success(&self) -> bool {
        (200..FAILURE_STATUS).contains(&self.status)
    }
}

/// One captured request/response exchange.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(default, alias = "entryId")]
    pub id: String,
    #[serde(default)]
    pub sequence_index: usize,
    pub request: Request,
    pub response: Response,
    #[serde(default, alias = "duration")]
    pub duration_ms: f64,
}

impl Transaction {
    /// A bare `200` exchange at the given position.
    pub fn new(sequence_index: usize, method: &str, url: &str) -> Self {
        Self {
            id: format!("tx-{sequence_index}"),
            sequence_index,
            request: Request {
                method: method.to_string(),
                url: url.to_string(),
                ..Default::default()
            },
            response: Response {
                status: 200,
                ..Default::default()
            },
            duration_ms: 0.0,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.response.status = status;
        self
    }

    pub fn with_request_header(mut self, name: &str, value: &str) -> Self {
        self.request
            .headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn with_request_cookie(mut self, name: &str, value: &str) -> Self {
        self.request.cookies.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_request_body(mut self, kind: BodyKind, text: &str) -> Self {
        self.request.body = Some(RequestBody {
            kind,
            text: text.to_string(),
            size: text.len() as u64,
        });
        self
    }

    pub fn with_response_header(mut self, name: &str, value: &str) -> Self {
        self.response
            .headers
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn with_response_cookie(mut self, name: &str, value: &str) -> Self {
        self.response.cookies.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_response_body(mut self, kind: BodyKind, text: &str) -> Self {
        self.response.body = Some(ResponseBody {
            kind,
            text: text.to_string(),
            size: text.len() as u64,
            truncated: false,
        });
        self
    }

    pub fn with_redirect(mut self, target: &str) -> Self {
        self.response.redirect_url = Some(target.to_string());
        self
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms;
        self
    }
}
