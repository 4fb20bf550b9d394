//! Redirect chaining: the first later request whose URL equals a response's
//! redirect target depends on that response.

use harflow_core::config::InferencePass;
use harflow_core::errors::AnalysisError;
use harflow_core::types::Diagnostics;

use super::PassContext;
use crate::graph::edge::EdgeSet;

pub fn apply(ctx: PassContext<'_>, edges: &mut EdgeSet, diagnostics: &mut Diagnostics) -> usize {
    let txs = ctx.transactions;
    let mut added = 0;

    for (i, tx) in txs.iter().enumerate() {
        let Some(target) = tx.response.redirect_url.as_deref() else {
            continue;
        };
        if target.is_empty() {
            tracing::warn!(index = i, "skipping redirect with empty target");
            diagnostics.record(
                InferencePass::Redirect.name(),
                &AnalysisError::MissingField {
                    index: i,
                    field: "response.redirectUrl",
                },
            );
            continue;
        }
        let follow_up = txs
            .iter()
            .enumerate()
            .skip(i + 1)
            .find(|(_, later)| later.request.url == target)
            .map(|(j, _)| j);
        if let Some(j) = follow_up {
            if edges.link(j, i, InferencePass::Redirect) {
                added += 1;
            }
        }
    }
    added
}
