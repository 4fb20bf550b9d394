//! Property tests: structural invariants of the matrix and everything derived
//! from it, over random batches and random (possibly cyclic) matrices.

use proptest::prelude::*;

use harflow_analysis::analytics::{compute_depths, critical_path, find_cycles, topological_order};
use harflow_analysis::{AdjacencyMatrix, AnalysisEngine, AnalysisResult};
use harflow_core::types::{BodyKind, Transaction};

const METHODS: [&str; 3] = ["GET", "POST", "OPTIONS"];
const COOKIES: [&str; 2] = ["session", "pref"];
const TOKENS: [&str; 2] = ["tokAAAA11111", "tokBBBB22222"];

fn url(path: usize) -> String {
    format!("https://shop.test/p{path}")
}

/// method, path, status, request cookie, response cookie, redirect, referer,
/// issued token, sent token
type Spec = (
    usize,
    usize,
    u16,
    Option<usize>,
    Option<usize>,
    Option<usize>,
    Option<usize>,
    (Option<usize>, Option<usize>),
);

fn spec_strategy() -> impl Strategy<Value = Spec> {
    (
        0..METHODS.len(),
        0..4usize,
        prop::sample::select(vec![200u16, 302, 404, 500]),
        prop::option::of(0..COOKIES.len()),
        prop::option::of(0..COOKIES.len()),
        prop::option::of(0..4usize),
        prop::option::of(0..4usize),
        (
            prop::option::of(0..TOKENS.len()),
            prop::option::of(0..TOKENS.len()),
        ),
    )
}

fn build_batch(specs: &[Spec]) -> Vec<Transaction> {
    specs
        .iter()
        .enumerate()
        .map(
            |(i, &(method, path, status, sent_cookie, set_cookie, redirect, referer, (issued, sent)))| {
                let mut tx = Transaction::new(i, METHODS[method], &url(path)).with_status(status);
                if let Some(c) = sent_cookie {
                    tx = tx.with_request_cookie(COOKIES[c], "v");
                }
                if let Some(c) = set_cookie {
                    tx = tx.with_response_cookie(COOKIES[c], "v");
                }
                if let Some(p) = redirect {
                    tx = tx.with_redirect(&url(p));
                }
                if let Some(p) = referer {
                    tx = tx.with_request_header("referer", &url(p));
                }
                if let Some(t) = issued {
                    tx = tx.with_response_header("x-csrf-token", TOKENS[t]);
                }
                if let Some(t) = sent {
                    tx = tx.with_request_body(BodyKind::Form, &format!("csrf={}", TOKENS[t]));
                }
                tx
            },
        )
        .collect()
}

fn batch_strategy() -> impl Strategy<Value = Vec<Transaction>> {
    prop::collection::vec(spec_strategy(), 0..24).prop_map(|specs| build_batch(&specs))
}

fn matrix_strategy() -> impl Strategy<Value = AdjacencyMatrix> {
    (1..16usize)
        .prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..n * 3)))
        .prop_map(|(n, edges)| {
            let mut m = AdjacencyMatrix::new(n);
            for (i, j) in edges {
                m.set(i, j);
            }
            m
        })
}

fn is_permutation(order: &[usize], n: usize) -> bool {
    let mut sorted = order.to_vec();
    sorted.sort_unstable();
    sorted == (0..n).collect::<Vec<_>>()
}

fn check_derived(result: &AnalysisResult, n: usize) -> Result<(), TestCaseError> {
    prop_assert_eq!(result.len(), n);
    let rows = result.adjacency.to_rows();
    prop_assert_eq!(rows.len(), n);
    for row in &rows {
        prop_assert_eq!(row.len(), n);
        prop_assert!(row.iter().all(|&c| c <= 1));
    }
    prop_assert_eq!(result.depths.len(), n);
    prop_assert_eq!(result.scores.len(), n);
    prop_assert_eq!(result.requests.len(), n);
    prop_assert!(is_permutation(&result.topological_order, n));
    prop_assert!(result.critical_path.len() <= n);
    prop_assert!(result.critical_path.iter().all(|&i| i < n));
    for &r in &result.redundant_indices {
        prop_assert!(!result.critical_path.contains(&r));
    }
    for score in &result.scores {
        prop_assert!((0.0..=1.0).contains(score));
    }
    Ok(())
}

proptest! {
    #[test]
    fn derived_arrays_have_consistent_shape(batch in batch_strategy()) {
        let result = AnalysisEngine::new().analyze(&batch);
        check_derived(&result, batch.len())?;
        prop_assert!(result.diagnostics.is_clean());
    }

    #[test]
    fn analysis_is_idempotent(batch in batch_strategy()) {
        let engine = AnalysisEngine::new();
        let first = engine.analyze(&batch);
        let second = engine.analyze(&batch);
        prop_assert_eq!(&first.adjacency, &second.adjacency);
        prop_assert_eq!(&first.depths, &second.depths);
        prop_assert_eq!(&first.topological_order, &second.topological_order);
        prop_assert_eq!(&first.critical_path, &second.critical_path);
        prop_assert_eq!(&first.redundant_indices, &second.redundant_indices);
        prop_assert_eq!(&first.tokens, &second.tokens);
        prop_assert_eq!(&first.edges, &second.edges);
        prop_assert_eq!(&first.scores, &second.scores);
    }

    #[test]
    fn cookie_requirers_depend_on_earlier_setters(batch in batch_strategy()) {
        let result = AnalysisEngine::new().analyze(&batch);
        for (k, requirer) in batch.iter().enumerate() {
            for name in requirer.request.cookies.keys() {
                for (i, setter) in batch[..k].iter().enumerate() {
                    if setter.response.cookies.contains_key(name) {
                        prop_assert!(result.adjacency.get(k, i));
                    }
                }
            }
        }
    }

    #[test]
    fn inferred_edges_point_backwards_except_redirects(batch in batch_strategy()) {
        let result = AnalysisEngine::new().analyze(&batch);
        // Every pass links a later dependent to an earlier prerequisite, so
        // inferred graphs are acyclic and fully ordered.
        prop_assert!(result.cycles.is_empty());
        for edge in &result.edges {
            prop_assert!(edge.dependent > edge.prerequisite);
            prop_assert!(!edge.kinds.is_empty());
        }
        let mut position = vec![0usize; batch.len()];
        for (p, &node) in result.topological_order.iter().enumerate() {
            position[node] = p;
        }
        for (i, j) in result.adjacency.edges() {
            prop_assert!(position[j] < position[i]);
        }
    }

    #[test]
    fn critical_path_climbs_to_max_depth(batch in batch_strategy()) {
        let result = AnalysisEngine::new().analyze(&batch);
        let path = &result.critical_path;
        if batch.is_empty() {
            prop_assert!(path.is_empty());
        } else {
            prop_assert!(!path.is_empty());
            for pair in path.windows(2) {
                prop_assert!(result.depths[pair[0]] < result.depths[pair[1]]);
                prop_assert!(result.adjacency.get(pair[1], pair[0]));
            }
            let last = *path.last().unwrap();
            prop_assert_eq!(result.depths[last], result.max_depth());
        }
    }

    #[test]
    fn tokens_are_defined_by_responses(batch in batch_strategy()) {
        let result = AnalysisEngine::new().analyze(&batch);
        for token in &result.tokens {
            prop_assert!(token.value.chars().count() >= 10);
            prop_assert!(token.definition_site < batch.len());
            prop_assert!(token.used_by.windows(2).all(|w| w[0] < w[1]));
        }
        let values: Vec<&str> = result.tokens.iter().map(|t| t.value.as_str()).collect();
        let mut distinct = values.clone();
        distinct.sort_unstable();
        distinct.dedup();
        prop_assert_eq!(values.len(), distinct.len());
    }

    #[test]
    fn analytics_survive_arbitrary_cycles(matrix in matrix_strategy()) {
        let n = matrix.len();
        let depths = compute_depths(&matrix);
        prop_assert_eq!(depths.len(), n);

        let order = topological_order(&matrix);
        prop_assert!(is_permutation(&order, n));

        let path = critical_path(&matrix, &depths);
        prop_assert!(!path.is_empty());
        for pair in path.windows(2) {
            prop_assert!(depths[pair[0]] < depths[pair[1]]);
        }
        let max = depths.iter().copied().max().unwrap_or(0);
        prop_assert_eq!(depths[*path.last().unwrap()], max);
    }

    #[test]
    fn topological_order_is_valid_exactly_when_acyclic(matrix in matrix_strategy()) {
        let order = topological_order(&matrix);
        let mut position = vec![0usize; matrix.len()];
        for (p, &node) in order.iter().enumerate() {
            position[node] = p;
        }
        let respects_edges = matrix.edges().all(|(i, j)| position[j] < position[i]);
        prop_assert_eq!(find_cycles(&matrix).is_empty(), respects_edges);
    }
}
