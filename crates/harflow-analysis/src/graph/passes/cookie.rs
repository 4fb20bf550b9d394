//! Cookie continuity: a request that sends cookie `name` depends on every
//! earlier response that set `name`. Names only; values are not compared.

use harflow_core::config::InferencePass;
use harflow_core::types::collections::FxHashMap;

use super::PassContext;
use crate::graph::edge::EdgeSet;

pub fn apply(ctx: PassContext<'_>, edges: &mut EdgeSet) -> usize {
    // cookie name -> indices whose response set it, ascending
    let mut setters: FxHashMap<&str, Vec<usize>> = FxHashMap::default();
    let mut added = 0;

    for (i, tx) in ctx.transactions.iter().enumerate() {
        for name in tx.request.cookies.keys() {
            if let Some(sources) = setters.get(name.as_str()) {
                for &j in sources {
                    if edges.link(i, j, InferencePass::Cookie) {
                        added += 1;
                    }
                }
            }
        }
        for name in tx.response.cookies.keys() {
            setters.entry(name.as_str()).or_default().push(i);
        }
    }
    added
}
