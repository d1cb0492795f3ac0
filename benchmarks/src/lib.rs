//! Shared helpers for EES benchmark suites.

use ees_harness::contract::SearchWorld;
use ees_search::bias::GlobalAverageBias;
use ees_search::node::{CostEstimates, FHatKey, NodeArena, NodeId};
use ees_search::policy::{SearchPolicyV1, TieBreakV1};
use ees_search::report::{SearchOutcome, SearchReportV1};
use ees_search::search::EesSearch;

/// Run the engine alone, bypassing envelope construction and hashing.
///
/// # Panics
///
/// Panics if the policy is invalid. Benchmark policies are expected to pass.
pub fn run_engine_only<W: SearchWorld>(
    world: &W,
    policy: &SearchPolicyV1,
) -> (SearchOutcome, SearchReportV1<W::State>) {
    let engine = EesSearch::new(world, GlobalAverageBias::new(), policy.clone())
        .expect("benchmark policy is valid");
    let mut report = SearchReportV1::new();
    let outcome = engine.run(&mut report);
    (outcome, report)
}

/// Arena of bare nodes with the given corrected costs, plus their frontier
/// keys in allocation order.
///
/// Each node gets `h = fHat` and `g = 0`, so keys order by `(fHat, id)`.
#[must_use]
pub fn frontier_keys(f_hats: &[f64]) -> (NodeArena<usize>, Vec<FHatKey>) {
    let mut arena = NodeArena::new();
    let keys = f_hats
        .iter()
        .enumerate()
        .map(|(i, &f_hat)| {
            let id: NodeId =
                arena.alloc(i, None, CostEstimates::corrected(0.0, f_hat, 0.0, 0.0, 0.0, 0.0));
            FHatKey::of(&arena[id], TieBreakV1::PreferShallow)
        })
        .collect();
    (arena, keys)
}
