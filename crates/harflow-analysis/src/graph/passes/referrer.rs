//! Referrer linkage: a request naming a referrer depends on every earlier
//! request made to exactly that URL.

use harflow_core::config::InferencePass;
use harflow_core::errors::AnalysisError;
use harflow_core::types::Diagnostics;

use super::PassContext;
use crate::graph::edge::EdgeSet;

pub fn apply(ctx: PassContext<'_>, edges: &mut EdgeSet, diagnostics: &mut Diagnostics) -> usize {
    let txs = ctx.transactions;
    let mut added = 0;

    for (i, tx) in txs.iter().enumerate() {
        let Some(referrer) = tx.request.referrer() else {
            continue;
        };
        if referrer.is_empty() {
            tracing::warn!(index = i, "skipping empty referrer");
            diagnostics.record(
                InferencePass::Referrer.name(),
                &AnalysisError::MissingField {
                    index: i,
                    field: "request.headers.referer",
                },
            );
            continue;
        }
        for (j, earlier) in txs[..i].iter().enumerate() {
            if earlier.request.url == referrer && edges.link(i, j, InferencePass::Referrer) {
                added += 1;
            }
        }
    }
    added
}
