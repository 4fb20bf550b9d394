//! Redundant transactions: safe to drop from a replay.

use harflow_core::types::collections::FxHashSet;
use harflow_core::types::{BodyKind, Transaction};

use crate::graph::AdjacencyMatrix;

/// Identity of a request for duplicate detection.
type RequestKey<'a> = (&'a str, &'a str, Option<(BodyKind, &'a str, u64)>);

fn request_key(tx: &Transaction) -> RequestKey<'_> {
    let body = tx
        .request
        .body
        .as_ref()
        .map(|b| (b.kind, b.text.as_str(), b.size));
    (tx.request.url.as_str(), tx.request.method.as_str(), body)
}

/// Indices, ascending, that are off the critical path, have no dependents,
/// and are a preflight, a failed exchange, or (with `detect_duplicates`) a
/// repeat of an earlier identical request.
pub fn find_redundant(
    transactions: &[Transaction],
    matrix: &AdjacencyMatrix,
    critical_path: &[usize],
    detect_duplicates: bool,
) -> Vec<usize> {
    let n = matrix.len().min(transactions.len());
    let on_path: FxHashSet<usize> = critical_path.iter().copied().collect();
    let mut seen: FxHashSet<RequestKey<'_>> = FxHashSet::default();
    let mut redundant = Vec::new();

    for (i, tx) in transactions.iter().enumerate().take(n) {
        let duplicate = detect_duplicates && !seen.insert(request_key(tx));
        if on_path.contains(&i) || matrix.has_dependents(i) {
            continue;
        }
        if tx.request.is_preflight() || tx.response.is_failure() || duplicate {
            redundant.push(i);
        }
    }
    redundant
}
