//! Batch-level summary numbers.

use harflow_core::types::collections::FxHashSet;
use harflow_core::types::Transaction;
use serde::{Deserialize, Serialize};
use url::Url;

/// Shared bucket for URLs that do not parse or carry no host.
const INVALID_DOMAIN: &str = "invalid";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchStatistics {
    pub total_requests: usize,
    pub unique_domains: usize,
    /// Request plus response body bytes.
    pub total_bytes: u64,
    pub average_duration_ms: f64,
    /// Percentage of exchanges with status in `200..400`.
    pub success_rate: f64,
}

impl BatchStatistics {
    pub fn compute(transactions: &[Transaction]) -> Self {
        let total = transactions.len();
        if total == 0 {
            return Self::default();
        }

        let mut domains: FxHashSet<String> = FxHashSet::default();
        let mut total_bytes = 0u64;
        let mut duration = 0.0f64;
        let mut succeeded = 0usize;
        for tx in transactions {
            domains.insert(host_of(&tx.request.url));
            total_bytes += tx.request.body_size() + tx.response.body_size();
            duration += tx.duration_ms;
            if tx.response.is_success() {
                succeeded += 1;
            }
        }

        Self {
            total_requests: total,
            unique_domains: domains.len(),
            total_bytes,
            average_duration_ms: duration / total as f64,
            success_rate: succeeded as f64 * 100.0 / total as f64,
        }
    }
}

fn host_of(raw: &str) -> String {
    Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
        .unwrap_or_else(|| INVALID_DOMAIN.to_string())
}
