//! Token flow tracking: find every credential-shaped value in the batch,
//! collapse repeats by literal value, and pin each value to the first
//! response that produced it.

use harflow_core::constants::DEFAULT_MIN_TOKEN_LENGTH;
use harflow_core::tracing::names;
use harflow_core::types::collections::FxHashMap;
use harflow_core::types::Transaction;

use super::rules::TokenRuleSet;
use super::types::{Area, Side, Token, TokenKind, TokenOccurrence};

/// Accumulated sightings of one literal value.
#[derive(Debug)]
struct TrackedToken {
    kind: TokenKind,
    value: String,
    occurrences: Vec<TokenOccurrence>,
}

/// Value-keyed accumulator. Keeps first-seen order so output is stable.
#[derive(Debug, Default)]
struct OccurrenceMap {
    tokens: Vec<TrackedToken>,
    by_value: FxHashMap<String, usize>,
}

impl OccurrenceMap {
    fn record(&mut self, kind: &TokenKind, value: &str, occurrence: TokenOccurrence) {
        match self.by_value.get(value) {
            Some(&slot) => self.tokens[slot].occurrences.push(occurrence),
            None => {
                self.by_value.insert(value.to_string(), self.tokens.len());
                self.tokens.push(TrackedToken {
                    kind: kind.clone(),
                    value: value.to_string(),
                    occurrences: vec![occurrence],
                });
            }
        }
    }
}

/// Scans transactions against a rule table.
#[derive(Debug, Clone)]
pub struct TokenFlowTracker<'r> {
    rules: &'r TokenRuleSet,
    min_length: usize,
    scan_cookies: bool,
}

impl<'r> TokenFlowTracker<'r> {
    pub fn new(rules: &'r TokenRuleSet) -> Self {
        Self {
            rules,
            min_length: DEFAULT_MIN_TOKEN_LENGTH,
            scan_cookies: false,
        }
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn with_cookie_scan(mut self, enabled: bool) -> Self {
        self.scan_cookies = enabled;
        self
    }

    /// Detect tokens and their definition sites.
    ///
    /// Transactions are identified by position in `transactions`. Values that
    /// never appear in a response are dropped: nothing in the capture produced
    /// them.
    pub fn analyze(&self, transactions: &[Transaction]) -> Vec<Token> {
        let _span = tracing::info_span!(names::TOKENS, rules = self.rules.len()).entered();
        let mut map = OccurrenceMap::default();

        for (index, tx) in transactions.iter().enumerate() {
            self.scan_transaction(&mut map, index, tx);
        }

        let tokens: Vec<Token> = map
            .tokens
            .into_iter()
            .filter_map(into_token)
            .collect();

        tracing::debug!(
            transactions = transactions.len(),
            tokens = tokens.len(),
            "token flow tracking complete"
        );
        tokens
    }

    fn scan_transaction(&self, map: &mut OccurrenceMap, index: usize, tx: &Transaction) {
        let response = &tx.response;
        for (name, value) in &response.headers {
            let line = format!("{name}: {value}");
            self.scan_text(map, &line, index, Side::Response, Area::Header, name);
        }
        if let Some(body) = response.body_text() {
            self.scan_text(map, body, index, Side::Response, Area::Body, "body");
        }
        if self.scan_cookies {
            for (name, value) in &response.cookies {
                let pair = format!("{name}={value}");
                self.scan_text(map, &pair, index, Side::Response, Area::Cookie, name);
            }
        }

        let request = &tx.request;
        for (name, value) in &request.headers {
            let line = format!("{name}: {value}");
            self.scan_text(map, &line, index, Side::Request, Area::Header, name);
        }
        if !request.url.is_empty() {
            self.scan_text(map, &request.url, index, Side::Request, Area::Url, "url");
        }
        if let Some(body) = request.body_text() {
            self.scan_text(map, body, index, Side::Request, Area::Body, "body");
        }
        if self.scan_cookies {
            for (name, value) in &request.cookies {
                let pair = format!("{name}={value}");
                self.scan_text(map, &pair, index, Side::Request, Area::Cookie, name);
            }
        }
    }

    fn scan_text(
        &self,
        map: &mut OccurrenceMap,
        text: &str,
        index: usize,
        side: Side,
        area: Area,
        context: &str,
    ) {
        if text.is_empty() {
            return;
        }
        for rule in self.rules.iter() {
            for value in rule.values(text) {
                if value.chars().count() < self.min_length {
                    continue;
                }
                map.record(
                    &rule.kind,
                    value,
                    TokenOccurrence {
                        index,
                        side,
                        area,
                        context: context.to_string(),
                    },
                );
            }
        }
    }
}

/// Resolve the definition site; `None` when no response carried the value.
fn into_token(tracked: TrackedToken) -> Option<Token> {
    let definition = tracked
        .occurrences
        .iter()
        .filter(|o| o.side == Side::Response)
        .min_by_key(|o| o.index)?;

    let mut used_by: Vec<usize> = tracked
        .occurrences
        .iter()
        .filter(|o| o.side == Side::Request)
        .map(|o| o.index)
        .collect();
    used_by.sort_unstable();
    used_by.dedup();

    Some(Token {
        kind: tracked.kind,
        definition_site: definition.index,
        definition_area: definition.area,
        definition_context: definition.context.clone(),
        value: tracked.value,
        used_by,
    })
}
