//! Search node records, the node arena, and the frontier ordering keys.
//!
//! Every canonical node lives in a [`NodeArena`] and is addressed by a stable
//! [`NodeId`]. The frontier, both queues, and the closed index store ids only.

use std::cmp::Ordering;
use std::ops::{Index, IndexMut};

use crate::policy::TieBreakV1;

/// Largest distance-error estimate the corrected distance accepts.
///
/// `dHat = d / (1 - εd)` diverges as `εd` approaches 1.
pub const MAX_DISTANCE_ERROR: f64 = 0.99;

/// A cost value with a total order.
///
/// Ordering uses [`f64::total_cmp`]. Construction normalizes `-0.0` to `0.0`
/// so that the total order agrees with `<=` on every non-NaN value.
#[derive(Debug, Clone, Copy)]
pub struct OrdCost(f64);

impl OrdCost {
    /// Largest representable key component.
    pub const MAX: Self = Self(f64::INFINITY);

    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value + 0.0)
    }

    #[must_use]
    pub fn get(self) -> f64 {
        self.0
    }
}

impl PartialEq for OrdCost {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OrdCost {}

impl PartialOrd for OrdCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OrdCost {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

/// Stable handle of a node record in the [`NodeArena`].
///
/// Ids are allocated in generation order, so comparing ids compares the
/// order in which states were first discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(usize);

impl NodeId {
    /// Sentinel greater than every allocated id. Used for range bounds.
    pub const MAX: Self = Self(usize::MAX);

    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Raw and bias-corrected cost estimates of one path to a state.
///
/// A value type: duplicate candidates are built as bare estimates and only
/// become arena records when their state is novel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostEstimates {
    /// Path cost from the start state.
    pub g: f64,
    /// Raw heuristic.
    pub h: f64,
    /// Raw distance-to-go.
    pub d: f64,
    /// Bias-corrected heuristic.
    pub h_hat: f64,
    /// Bias-corrected distance-to-go.
    pub d_hat: f64,
    /// Heuristic error variance hint at construction time.
    pub h_variance: f64,
}

impl CostEstimates {
    /// Build estimates, correcting `h` and `d` with the global one-step errors.
    ///
    /// `dHat = d / (1 - εd)` and `hHat = h + dHat * εh`.
    #[must_use]
    pub fn corrected(g: f64, h: f64, d: f64, h_error: f64, d_error: f64, h_variance: f64) -> Self {
        let d_error = d_error.min(MAX_DISTANCE_ERROR);
        let d_hat = d / (1.0 - d_error);
        Self {
            g,
            h,
            d,
            h_hat: h + d_hat * h_error,
            d_hat,
            h_variance,
        }
    }

    /// Admissible estimate `g + h`.
    #[must_use]
    pub fn f(&self) -> f64 {
        self.g + self.h
    }

    /// Corrected estimate `g + hHat`.
    #[must_use]
    pub fn f_hat(&self) -> f64 {
        self.g + self.h_hat
    }
}

/// Probability that a node with corrected cost `f_hat` lies inside the
/// suboptimality envelope of the reference estimate.
///
/// The reference minimum is modeled as normally distributed around
/// `reference_f_hat` with variance `variance + d_hat * h_variance`; the
/// result is `P(f_hat <= weight * F)`. A zero spread degrades to a step.
#[must_use]
pub fn envelope_probability(
    estimates: &CostEstimates,
    reference_f_hat: f64,
    variance: f64,
    weight: f64,
) -> f64 {
    let bound = weight * reference_f_hat;
    let f_hat = estimates.f_hat();
    let spread = variance.max(0.0) + (estimates.d_hat * estimates.h_variance).max(0.0);
    if spread.is_nan() || spread <= 0.0 {
        return if f_hat <= bound { 1.0 } else { 0.0 };
    }
    let z = (bound - f_hat) / (weight * spread.sqrt());
    0.5 * libm::erfc(-z / std::f64::consts::SQRT_2)
}

/// One canonical node per discovered state.
#[derive(Debug, Clone)]
pub struct SearchNode<S> {
    id: NodeId,
    state: S,
    parent: Option<NodeId>,
    costs: CostEstimates,
    dxes_prob: f64,
    on_open: bool,
    on_closed: bool,
}

impl<S> SearchNode<S> {
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.id
    }

    #[must_use]
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Parent on the best known path (`None` for the start node).
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    #[must_use]
    pub fn costs(&self) -> &CostEstimates {
        &self.costs
    }

    #[must_use]
    pub fn g(&self) -> f64 {
        self.costs.g
    }

    #[must_use]
    pub fn f(&self) -> f64 {
        self.costs.f()
    }

    #[must_use]
    pub fn f_hat(&self) -> f64 {
        self.costs.f_hat()
    }

    #[must_use]
    pub fn d_hat(&self) -> f64 {
        self.costs.d_hat
    }

    /// Envelope probability computed when the node was last (re)costed.
    #[must_use]
    pub fn dxes_prob(&self) -> f64 {
        self.dxes_prob
    }

    pub fn set_dxes_prob(&mut self, prob: f64) {
        self.dxes_prob = prob;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.on_open
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.on_closed
    }

    /// Take the node off the frontier for expansion.
    pub fn select(&mut self) {
        self.on_open = false;
    }

    pub fn close(&mut self) {
        self.on_open = false;
        self.on_closed = true;
    }

    /// Adopt `state` with its cost fields and parent if `costs` strictly
    /// improves `g`.
    ///
    /// `state` is equal to the stored one but may carry data from the new
    /// incoming edge. Returns `false` (and leaves the node untouched)
    /// otherwise. When the node was closed it is reopened.
    pub fn improve(&mut self, state: S, costs: CostEstimates, parent: NodeId) -> bool {
        if costs.g >= self.costs.g {
            return false;
        }
        self.state = state;
        self.costs = costs;
        self.parent = Some(parent);
        self.on_closed = false;
        self.on_open = true;
        true
    }
}

/// Owner of every canonical node for one search run.
///
/// Dropping the arena releases all nodes at once.
#[derive(Debug)]
pub struct NodeArena<S> {
    nodes: Vec<SearchNode<S>>,
}

impl<S> NodeArena<S> {
    #[must_use]
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Allocate an open node and return its id.
    pub fn alloc(&mut self, state: S, parent: Option<NodeId>, costs: CostEstimates) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SearchNode {
            id,
            state,
            parent,
            costs,
            dxes_prob: 0.0,
            on_open: true,
            on_closed: false,
        });
        id
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SearchNode<S>> {
        self.nodes.iter()
    }

    /// Ids from the start node to `id`, following parent links backward.
    #[must_use]
    pub fn path_to(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            path.push(node_id);
            current = self.nodes.get(node_id.0).and_then(|n| n.parent);
        }
        path.reverse();
        path
    }
}

impl<S> Default for NodeArena<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Index<NodeId> for NodeArena<S> {
    type Output = SearchNode<S>;

    fn index(&self, id: NodeId) -> &Self::Output {
        &self.nodes[id.0]
    }
}

impl<S> IndexMut<NodeId> for NodeArena<S> {
    fn index_mut(&mut self, id: NodeId) -> &mut Self::Output {
        &mut self.nodes[id.0]
    }
}

/// OrderedFrontier key: `(fHat, g per tie-break, id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FHatKey {
    pub f_hat: OrdCost,
    pub tie: OrdCost,
    pub id: NodeId,
}

impl FHatKey {
    #[must_use]
    pub fn of<S>(node: &SearchNode<S>, tie_break: TieBreakV1) -> Self {
        Self {
            f_hat: OrdCost::new(node.f_hat()),
            tie: tie_break.g_component(node.g()),
            id: node.id,
        }
    }

    /// The largest key whose `fHat` equals `threshold`.
    #[must_use]
    pub fn upper_bound(threshold: f64) -> Self {
        Self {
            f_hat: OrdCost::new(threshold),
            tie: OrdCost::MAX,
            id: NodeId::MAX,
        }
    }
}

/// AdmissibleQueue key: `(f, g per tie-break, id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FKey {
    pub f: OrdCost,
    pub tie: OrdCost,
    pub id: NodeId,
}

impl FKey {
    #[must_use]
    pub fn of<S>(node: &SearchNode<S>, tie_break: TieBreakV1) -> Self {
        Self {
            f: OrdCost::new(node.f()),
            tie: tie_break.g_component(node.g()),
            id: node.id,
        }
    }
}

/// SecondaryQueue key: `(dHat, fHat, id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct DHatKey {
    pub d_hat: OrdCost,
    pub f_hat: OrdCost,
    pub id: NodeId,
}

impl DHatKey {
    #[must_use]
    pub fn of<S>(node: &SearchNode<S>) -> Self {
        Self {
            d_hat: OrdCost::new(node.d_hat()),
            f_hat: OrdCost::new(node.f_hat()),
            id: node.id,
        }
    }
}
