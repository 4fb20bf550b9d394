//! Token provenance: a request that carries a token value depends on the
//! transaction whose response first produced it.

use harflow_core::config::InferencePass;
use harflow_core::types::Request;

use super::PassContext;
use crate::graph::edge::EdgeSet;

pub fn apply(ctx: PassContext<'_>, edges: &mut EdgeSet) -> usize {
    let mut added = 0;
    for (i, tx) in ctx.transactions.iter().enumerate() {
        for token in ctx.tokens {
            if token.definition_site >= i {
                continue;
            }
            if request_carries(&tx.request, &token.value)
                && edges.link(i, token.definition_site, InferencePass::Token)
            {
                added += 1;
            }
        }
    }
    added
}

/// Whether the request's headers (as `name: value`), URL, or body contain `value`.
pub fn request_carries(request: &Request, value: &str) -> bool {
    if value.is_empty() {
        return false;
    }
    request
        .headers
        .iter()
        .any(|(name, v)| format!("{name}: {v}").contains(value))
        || request.url.contains(value)
        || request.body_text().is_some_and(|body| body.contains(value))
}
