//! Search domain contract trait.

use std::hash::Hash;

/// An implicitly defined state-transition graph with cost estimates.
///
/// # Contract
///
/// - Edge costs are non-negative and finite.
/// - `successors` returns a finite list in a deterministic order; the engine
///   is deterministic only if the domain is.
/// - `heuristic` should be admissible for the suboptimality bound to hold.
/// - `distance` estimates the number of edges to the nearest goal.
///
/// Violations are not detected by the engine.
pub trait SearchDomain {
    type State: Clone + Eq + Hash;

    fn start_state(&self) -> Self::State;

    fn is_goal(&self, state: &Self::State) -> bool;

    /// Raw estimate of the remaining cost from `state`.
    fn heuristic(&self, state: &Self::State) -> f64;

    /// Raw estimate of the remaining number of steps from `state`.
    fn distance(&self, state: &Self::State) -> f64;

    /// Cost of the edge just taken to reach `state`.
    fn edge_cost(&self, state: &Self::State) -> f64;

    /// States reachable from `state` in one step.
    fn successors(&self, state: &Self::State) -> Vec<Self::State>;
}
