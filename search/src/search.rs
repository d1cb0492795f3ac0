//! Explicit Estimation Search: selection, expansion, and bound maintenance.
//!
//! The engine keeps three orderings over the open nodes in sync:
//!
//! - `open` ([`OrderedFrontier`]) by corrected cost `fHat`, with a cursor at
//!   `w * fHatMin`;
//! - `focal` ([`SecondaryQueue`]) by corrected distance `dHat`, holding only
//!   open nodes inside the envelope whose stored probability exceeds the
//!   policy confidence;
//! - `cleanup` ([`AdmissibleQueue`]) by admissible `f`, holding every open
//!   node.
//!
//! Between iterations the following hold for every node id:
//! `is_open` iff in `open` iff in `cleanup`; in `focal` implies in `open`,
//! `fHat <= w * fHatMin` and `dxes_prob > focal_confidence`.

use crate::bias::BiasModel;
use crate::closed::{ClosedIndex, PathClass};
use crate::contract::SearchDomain;
use crate::error::SearchError;
use crate::frontier::{CursorDirection, OrderedFrontier};
use crate::node::{
    envelope_probability, CostEstimates, DHatKey, FHatKey, FKey, NodeArena, NodeId, OrdCost,
};
use crate::policy::SearchPolicyV1;
use crate::queue::{AdmissibleQueue, SecondaryQueue};
use crate::report::{SearchOutcome, SearchReportV1, SelectionSourceV1};
use crate::variance::VarianceTracker;

/// One bounded-suboptimal search over a borrowed domain.
///
/// Owns every node and frontier structure for the run. [`EesSearch::run`]
/// consumes the engine, so all nodes are released when it returns.
pub struct EesSearch<'d, D: SearchDomain, B> {
    domain: &'d D,
    bias: B,
    policy: SearchPolicyV1,
    arena: NodeArena<D::State>,
    closed: ClosedIndex<D::State>,
    open: OrderedFrontier,
    focal: SecondaryQueue,
    cleanup: AdmissibleQueue,
    /// Admissible lower bound: `f` of the cleanup head.
    f_min: f64,
    /// Corrected minimum: `fHat` of the frontier minimum.
    f_hat_min: f64,
    variance: VarianceTracker,
}

/// The minimal-`f` survivor of one expansion, kept for error learning.
#[derive(Debug, Clone, Copy)]
struct BestChild {
    f: f64,
    edge: f64,
    h: f64,
    d: f64,
}

impl<'d, D: SearchDomain, B: BiasModel> EesSearch<'d, D, B> {
    /// Build an engine for one run.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] if the policy fails validation.
    pub fn new(domain: &'d D, bias: B, policy: SearchPolicyV1) -> Result<Self, SearchError> {
        policy.validate()?;
        let variance = VarianceTracker::new(policy.default_variance);
        Ok(Self {
            domain,
            bias,
            policy,
            arena: NodeArena::new(),
            closed: ClosedIndex::new(),
            open: OrderedFrontier::new(),
            focal: SecondaryQueue::new(),
            cleanup: AdmissibleQueue::new(),
            f_min: 0.0,
            f_hat_min: 0.0,
            variance,
        })
    }

    /// Search until a goal is selected or the frontier is exhausted.
    ///
    /// Counters, the initial heuristic, selection provenance, and (on
    /// success) the start-to-goal path are written into `report`.
    pub fn run(mut self, report: &mut SearchReportV1<D::State>) -> SearchOutcome {
        tracing::debug!(
            weight = self.policy.weight,
            focal_confidence = self.policy.focal_confidence,
            tie_break = self.policy.tie_break.as_str(),
            "ees run started"
        );
        self.initialize(report);
        let outcome = loop {
            if let Some(outcome) = self.step(report) {
                break outcome;
            }
        };
        report.outcome = Some(outcome);
        report.frontier_high_water = self.open.high_water() as u64;
        tracing::debug!(
            solved = outcome.is_solved(),
            cost = ?outcome.cost(),
            expanded = report.nodes_expanded,
            generated = report.nodes_generated,
            duplicates = report.duplicates,
            reopened = report.reopened,
            "ees run finished"
        );
        outcome
    }

    /// Seed every structure with the start node.
    ///
    /// The start node is indexed and placed in `open` and `cleanup` but not
    /// in `focal`: its probability has no reference yet.
    fn initialize(&mut self, report: &mut SearchReportV1<D::State>) {
        let start = self.domain.start_state();
        let h = self.domain.heuristic(&start);
        let d = self.domain.distance(&start);
        report.initial_h = h;

        let costs = self.estimates(0.0, h, d);
        self.f_min = costs.f();
        self.f_hat_min = costs.f_hat();
        self.variance.push(self.f_hat_min);

        let id = self.arena.alloc(start.clone(), None, costs);
        self.closed.insert(start, id);
        let key = self.frontier_key(id);
        self.open.insert(key);
        self.cleanup.push(FKey::of(&self.arena[id], self.policy.tie_break));
        self.open.move_cursor(self.envelope_bound());
    }

    /// One select/expand/refresh iteration. Returns the outcome when the run
    /// is over.
    fn step(&mut self, report: &mut SearchReportV1<D::State>) -> Option<SearchOutcome> {
        let Some((id, source)) = self.select() else {
            return Some(SearchOutcome::Unsolved);
        };
        report.selections.record(source);

        if self.domain.is_goal(self.arena[id].state()) {
            report.solution_path = self
                .arena
                .path_to(id)
                .into_iter()
                .map(|n| self.arena[n].state().clone())
                .collect();
            return Some(SearchOutcome::Solved {
                cost: self.arena[id].g(),
            });
        }

        self.expand(id, report);
        if !self.open.is_empty() {
            self.refresh_bounds();
        }
        None
    }

    /// Pick the next node and detach it from every structure.
    ///
    /// 1. focal head, if its `fHat <= w * fMin`;
    /// 2. frontier minimum, if its `fHat <= w * fMin`;
    /// 3. cleanup head.
    fn select(&mut self) -> Option<(NodeId, SelectionSourceV1)> {
        let best_f_hat = self.open.min()?;
        let best_f = *self.cleanup.top()?;
        let bound = OrdCost::new(self.policy.weight * self.f_min);

        let (id, source) = match self.focal.top() {
            Some(top) if top.f_hat <= bound => {
                let heads_open = top.id == best_f_hat.id;
                let heads_cleanup = top.id == best_f.id;
                let source = match (heads_open, heads_cleanup) {
                    (true, true) => SelectionSourceV1::OpenAndCleanup,
                    (true, false) => SelectionSourceV1::Open,
                    (false, true) => SelectionSourceV1::Cleanup,
                    (false, false) => SelectionSourceV1::Focal,
                };
                (top.id, source)
            }
            _ if best_f_hat.f_hat <= bound => {
                let source = if best_f_hat.id == best_f.id {
                    SelectionSourceV1::OpenAndCleanup
                } else {
                    SelectionSourceV1::Open
                };
                (best_f_hat.id, source)
            }
            _ => (best_f.id, SelectionSourceV1::Cleanup),
        };

        self.focal.remove(id);
        self.open.remove(id);
        self.cleanup.remove(id);
        self.arena[id].select();
        Some((id, source))
    }

    /// Close `id`, generate its successors, resolve duplicates, and learn one
    /// error sample from the best surviving child.
    fn expand(&mut self, id: NodeId, report: &mut SearchReportV1<D::State>) {
        report.nodes_expanded += 1;
        self.arena[id].close();
        if self.policy.record_expansion_order {
            report.expansion_order.push(self.arena[id].state().clone());
        }

        let parent = *self.arena[id].costs();
        let children = self.domain.successors(self.arena[id].state());
        report.nodes_generated += children.len() as u64;

        let mut best: Option<BestChild> = None;
        for child in children {
            let edge = self.domain.edge_cost(&child);
            let h = self.domain.heuristic(&child);
            let d = self.domain.distance(&child);
            let costs = self.estimates(parent.g + edge, h, d);

            if self.resolve_duplicate(&child, costs, id, report) {
                continue;
            }
            let improves_best = match best {
                Some(b) => costs.f() < b.f,
                None => true,
            };
            if improves_best {
                best = Some(BestChild {
                    f: costs.f(),
                    edge,
                    h,
                    d,
                });
            }
            self.insert_novel(child, costs, id);
        }

        if let Some(b) = best {
            self.bias.record_d_error((1.0 + b.d) - parent.d);
            self.bias.record_h_error((b.edge + b.h) - parent.h);
            self.bias.recompute();
        }
    }

    /// Apply the duplicate protocol. Returns `true` if `state` was already
    /// known, in which case no new node is allocated.
    fn resolve_duplicate(
        &mut self,
        state: &D::State,
        costs: CostEstimates,
        parent: NodeId,
        report: &mut SearchReportV1<D::State>,
    ) -> bool {
        match self.closed.classify(state, costs.g, &self.arena) {
            PathClass::Novel => false,
            PathClass::NotImproved(_) => {
                report.duplicates += 1;
                true
            }
            PathClass::ImprovesOpen(existing) => {
                report.duplicates += 1;
                report.updated_open += 1;
                self.open.remove(existing);
                self.arena[existing].improve(state.clone(), costs, parent);
                self.refresh_probability(existing);

                let key = self.frontier_key(existing);
                self.open.insert(key);
                self.cleanup.update(FKey::of(&self.arena[existing], self.policy.tie_break));
                let focal_key = DHatKey::of(&self.arena[existing]);
                if self.qualifies_for_focal(existing) {
                    if !self.focal.update(focal_key) {
                        self.focal.push(focal_key);
                    }
                } else {
                    self.focal.remove(existing);
                }
                tracing::trace!(node = existing.index(), g = costs.g, "open node improved");
                true
            }
            PathClass::ImprovesClosed(existing) => {
                report.duplicates += 1;
                report.reopened += 1;
                self.arena[existing].improve(state.clone(), costs, parent);
                self.refresh_probability(existing);
                self.enqueue(existing);
                tracing::trace!(node = existing.index(), g = costs.g, "closed node reopened");
                true
            }
        }
    }

    fn insert_novel(&mut self, state: D::State, costs: CostEstimates, parent: NodeId) {
        let id = self.arena.alloc(state.clone(), Some(parent), costs);
        self.closed.insert(state, id);
        self.refresh_probability(id);
        self.enqueue(id);
    }

    /// Put an open node into `open` and `cleanup`, and into `focal` if it
    /// qualifies.
    fn enqueue(&mut self, id: NodeId) {
        let key = self.frontier_key(id);
        self.open.insert(key);
        self.cleanup.push(FKey::of(&self.arena[id], self.policy.tie_break));
        if self.qualifies_for_focal(id) {
            self.focal.push(DHatKey::of(&self.arena[id]));
        }
    }

    /// Recompute `fMin` and `fHatMin`, move the cursor if the corrected
    /// minimum changed, and record the corrected minimum.
    fn refresh_bounds(&mut self) {
        if let Some(top) = self.cleanup.top() {
            self.f_min = top.f.get();
        }
        if let Some(best) = self.open.min() {
            if best.f_hat != OrdCost::new(self.f_hat_min) {
                self.f_hat_min = best.f_hat.get();
                let moved = self.open.move_cursor(self.envelope_bound());
                match moved.direction {
                    CursorDirection::Advanced => {
                        for id in moved.crossed {
                            if self.arena[id].dxes_prob() > self.policy.focal_confidence {
                                self.focal.push(DHatKey::of(&self.arena[id]));
                            }
                        }
                    }
                    CursorDirection::Retreated => {
                        for id in moved.crossed {
                            self.focal.remove(id);
                        }
                    }
                    CursorDirection::Unchanged => {}
                }
            }
        }
        self.variance.push(self.f_hat_min);
    }

    fn estimates(&self, g: f64, h: f64, d: f64) -> CostEstimates {
        CostEstimates::corrected(
            g,
            h,
            d,
            self.bias.h_error(),
            self.bias.d_error(),
            self.bias.h_error_variance(),
        )
    }

    fn refresh_probability(&mut self, id: NodeId) {
        let prob = envelope_probability(
            self.arena[id].costs(),
            self.f_hat_min,
            self.variance.variance(),
            self.policy.weight,
        );
        self.arena[id].set_dxes_prob(prob);
    }

    /// `w * fHatMin`; also the frontier cursor threshold.
    fn envelope_bound(&self) -> f64 {
        self.policy.weight * self.f_hat_min
    }

    fn qualifies_for_focal(&self, id: NodeId) -> bool {
        let node = &self.arena[id];
        OrdCost::new(node.f_hat()) <= OrdCost::new(self.envelope_bound())
            && node.dxes_prob() > self.policy.focal_confidence
    }

    fn frontier_key(&self, id: NodeId) -> FHatKey {
        FHatKey::of(&self.arena[id], self.policy.tie_break)
    }
}
