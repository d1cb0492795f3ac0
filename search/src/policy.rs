//! Search policy types.

use crate::canon::{canonical_hash, canonical_json_bytes, cost_bits, ContentHash};
use crate::error::SearchError;
use crate::node::OrdCost;

/// Domain prefix for search policy snapshot hashing.
pub const DOMAIN_SEARCH_POLICY: &[u8] = b"EES::SEARCH_POLICY::V1\0";

/// Configuration for one Explicit Estimation Search run.
///
/// Fixed at construction; the engine never mutates it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPolicyV1 {
    /// Suboptimality bound `w`: returned cost is at most `w` times optimal.
    pub weight: f64,
    /// Envelope probability a node must exceed to enter the focal queue.
    pub focal_confidence: f64,
    /// Variance reported while fewer than two corrected minima are known.
    pub default_variance: f64,
    /// Secondary ordering for equal `fHat` / `f` keys.
    pub tie_break: TieBreakV1,
    /// Record the expanded states, in order, into the report.
    pub record_expansion_order: bool,
}

impl SearchPolicyV1 {
    /// Policy with the given bound and defaults elsewhere.
    #[must_use]
    pub fn with_weight(weight: f64) -> Self {
        Self {
            weight,
            ..Self::default()
        }
    }

    /// Check every field is in range.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::InvalidPolicy`] when `weight` is not a finite
    /// value `>= 1`, `focal_confidence` is outside `[0, 1)`, or
    /// `default_variance` is not finite and positive.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.weight.is_finite() || self.weight < 1.0 {
            return Err(SearchError::InvalidPolicy {
                field: "weight",
                detail: format!("must be finite and >= 1, got {}", self.weight),
            });
        }
        if !(0.0..1.0).contains(&self.focal_confidence) {
            return Err(SearchError::InvalidPolicy {
                field: "focal_confidence",
                detail: format!("must be in [0, 1), got {}", self.focal_confidence),
            });
        }
        if !self.default_variance.is_finite() || self.default_variance <= 0.0 {
            return Err(SearchError::InvalidPolicy {
                field: "default_variance",
                detail: format!("must be finite and > 0, got {}", self.default_variance),
            });
        }
        Ok(())
    }

    /// Canonical JSON form. Costs are written as IEEE-754 bit patterns.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "default_variance_bits": cost_bits(self.default_variance),
            "focal_confidence_bits": cost_bits(self.focal_confidence),
            "record_expansion_order": self.record_expansion_order,
            "schema_version": "search_policy.v1",
            "tie_break": self.tie_break.as_str(),
            "weight_bits": cost_bits(self.weight),
        })
    }

    /// Content hash of the canonical policy snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Canon`] if canonicalization fails.
    pub fn digest(&self) -> Result<ContentHash, SearchError> {
        let bytes = canonical_json_bytes(&self.to_json())?;
        Ok(canonical_hash(DOMAIN_SEARCH_POLICY, &bytes))
    }
}

impl Default for SearchPolicyV1 {
    fn default() -> Self {
        Self {
            weight: 2.0,
            focal_confidence: 0.95,
            default_variance: 100.0,
            tie_break: TieBreakV1::PreferShallow,
            record_expansion_order: false,
        }
    }
}

/// Secondary key for nodes with equal primary cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreakV1 {
    /// Lower `g` first. Default.
    #[default]
    PreferShallow,
    /// Higher `g` first.
    PreferDeep,
}

impl TieBreakV1 {
    /// Key component for `g` under this tie-break.
    #[must_use]
    pub fn g_component(self, g: f64) -> OrdCost {
        match self {
            Self::PreferShallow => OrdCost::new(g),
            Self::PreferDeep => OrdCost::new(-g),
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::PreferShallow => "prefer_shallow",
            Self::PreferDeep => "prefer_deep",
        }
    }
}
