//! The four edge-inference passes. Each one reads the batch, writes into the
//! shared `EdgeSet`, and records per-entry problems instead of failing.

pub mod cookie;
pub mod redirect;
pub mod referrer;
pub mod token;

use harflow_core::config::InferencePass;
use harflow_core::types::{Diagnostics, Transaction};

use super::edge::EdgeSet;
use crate::tokens::Token;

/// Read-only inputs shared by every pass.
#[derive(Debug, Clone, Copy)]
pub struct PassContext<'a> {
    pub transactions: &'a [Transaction],
    pub tokens: &'a [Token],
}

/// Run one pass. Returns the number of matrix bits it newly set.
pub fn run(
    pass: InferencePass,
    ctx: PassContext<'_>,
    edges: &mut EdgeSet,
    diagnostics: &mut Diagnostics,
) -> usize {
    let added = match pass {
        InferencePass::Cookie => cookie::apply(ctx, edges),
        InferencePass::Token => token::apply(ctx, edges),
        InferencePass::Redirect => redirect::apply(ctx, edges, diagnostics),
        InferencePass::Referrer => referrer::apply(ctx, edges, diagnostics),
    };
    tracing::debug!(pass = pass.name(), added, "inference pass complete");
    added
}
