//! Search outcome and the result sink written by the engine.

use crate::canon::{canonical_hash, canonical_json_bytes, cost_bits, CanonError, ContentHash};

/// Domain prefix for search report hashing.
pub const DOMAIN_SEARCH_REPORT: &[u8] = b"EES::SEARCH_REPORT::V1\0";

/// Terminal state of a run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchOutcome {
    /// A goal was selected; `cost` is its `g`.
    Solved { cost: f64 },
    /// The frontier was exhausted without selecting a goal.
    Unsolved,
}

impl SearchOutcome {
    #[must_use]
    pub fn is_solved(&self) -> bool {
        matches!(self, Self::Solved { .. })
    }

    #[must_use]
    pub fn cost(&self) -> Option<f64> {
        match self {
            Self::Solved { cost } => Some(*cost),
            Self::Unsolved => None,
        }
    }
}

/// Which ordering supplied a selected node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionSourceV1 {
    /// Focal head that headed neither other ordering.
    Focal,
    /// Frontier minimum by `fHat` (possibly taken through focal).
    Open,
    /// Cleanup head by `f` (possibly taken through focal).
    Cleanup,
    /// Frontier minimum that was also the cleanup head.
    OpenAndCleanup,
}

impl SelectionSourceV1 {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Focal => "focal",
            Self::Open => "open",
            Self::Cleanup => "cleanup",
            Self::OpenAndCleanup => "open_and_cleanup",
        }
    }
}

/// Per-source selection counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionCountsV1 {
    pub focal: u64,
    pub open: u64,
    pub cleanup: u64,
    pub open_and_cleanup: u64,
}

impl SelectionCountsV1 {
    pub fn record(&mut self, source: SelectionSourceV1) {
        match source {
            SelectionSourceV1::Focal => self.focal += 1,
            SelectionSourceV1::Open => self.open += 1,
            SelectionSourceV1::Cleanup => self.cleanup += 1,
            SelectionSourceV1::OpenAndCleanup => self.open_and_cleanup += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.focal + self.open + self.cleanup + self.open_and_cleanup
    }
}

/// Result sink for one run. The engine only writes to it.
#[derive(Debug, Clone)]
pub struct SearchReportV1<S> {
    /// Nodes expanded (goal selection excluded).
    pub nodes_expanded: u64,
    /// Successor states produced by the domain, duplicates included.
    pub nodes_generated: u64,
    /// Generated states that were already known.
    pub duplicates: u64,
    /// Open nodes whose path was improved in place.
    pub updated_open: u64,
    /// Closed nodes reopened by a cheaper path.
    pub reopened: u64,
    /// Raw heuristic of the start state.
    pub initial_h: f64,
    pub frontier_high_water: u64,
    pub selections: SelectionCountsV1,
    pub outcome: Option<SearchOutcome>,
    /// States from start to goal (empty unless solved).
    pub solution_path: Vec<S>,
    /// Expanded states in order; filled only when the policy asks for it.
    pub expansion_order: Vec<S>,
}

impl<S> SearchReportV1<S> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes_expanded: 0,
            nodes_generated: 0,
            duplicates: 0,
            updated_open: 0,
            reopened: 0,
            initial_h: 0.0,
            frontier_high_water: 0,
            selections: SelectionCountsV1::default(),
            outcome: None,
            solution_path: Vec::new(),
            expansion_order: Vec::new(),
        }
    }

    /// JSON form with states rendered by `render_state`.
    ///
    /// Costs are bit patterns (see [`cost_bits`]); a display copy sits next
    /// to each for readability.
    #[must_use]
    pub fn to_json(&self, render_state: impl Fn(&S) -> String) -> serde_json::Value {
        let outcome = match self.outcome {
            Some(SearchOutcome::Solved { cost }) => serde_json::json!({
                "cost_bits": cost_bits(cost),
                "cost_display": cost.to_string(),
                "type": "solved",
            }),
            Some(SearchOutcome::Unsolved) => serde_json::json!({ "type": "unsolved" }),
            None => serde_json::json!({ "type": "not_run" }),
        };
        serde_json::json!({
            "counters": {
                "duplicates": self.duplicates,
                "frontier_high_water": self.frontier_high_water,
                "nodes_expanded": self.nodes_expanded,
                "nodes_generated": self.nodes_generated,
                "reopened": self.reopened,
                "updated_open": self.updated_open,
            },
            "expansion_order": self.expansion_order.iter().map(&render_state).collect::<Vec<_>>(),
            "initial_h_bits": cost_bits(self.initial_h),
            "initial_h_display": self.initial_h.to_string(),
            "outcome": outcome,
            "schema_version": "search_report.v1",
            "selections": {
                SelectionSourceV1::Cleanup.as_str(): self.selections.cleanup,
                SelectionSourceV1::Focal.as_str(): self.selections.focal,
                SelectionSourceV1::Open.as_str(): self.selections.open,
                SelectionSourceV1::OpenAndCleanup.as_str(): self.selections.open_and_cleanup,
            },
            "solution_path": self.solution_path.iter().map(&render_state).collect::<Vec<_>>(),
        })
    }

    /// Canonical JSON bytes of [`Self::to_json`].
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if canonicalization fails.
    pub fn to_canonical_json_bytes(
        &self,
        render_state: impl Fn(&S) -> String,
    ) -> Result<Vec<u8>, CanonError> {
        canonical_json_bytes(&self.to_json(render_state))
    }

    /// Content hash of the canonical report.
    ///
    /// # Errors
    ///
    /// Returns [`CanonError`] if canonicalization fails.
    pub fn digest(&self, render_state: impl Fn(&S) -> String) -> Result<ContentHash, CanonError> {
        let bytes = self.to_canonical_json_bytes(render_state)?;
        Ok(canonical_hash(DOMAIN_SEARCH_REPORT, &bytes))
    }
}

impl<S> Default for SearchReportV1<S> {
    fn default() -> Self {
        Self::new()
    }
}
