//! Global one-step error model.
//!
//! The engine consumes a [`BiasModel`]: it reads the current corrections when
//! building nodes and feeds back one error sample per expansion.

use crate::node::MAX_DISTANCE_ERROR;
use crate::variance::RunningMoments;

/// Source of the global heuristic and distance corrections.
///
/// # Contract
///
/// - `h_error` and `d_error` are read when a node's estimates are built.
/// - `record_*` only accumulates; values returned by the getters change
///   after `recompute`.
/// - `h_error` should be non-negative so that `hHat >= h`; the suboptimality
///   bound relies on it.
pub trait BiasModel {
    /// Mean one-step heuristic error `εh`.
    fn h_error(&self) -> f64;
    /// Mean one-step distance error `εd`.
    fn d_error(&self) -> f64;
    /// Variance of the heuristic error samples.
    fn h_error_variance(&self) -> f64;
    fn record_h_error(&mut self, sample: f64);
    fn record_d_error(&mut self, sample: f64);
    /// Refresh the corrections from accumulated samples.
    fn recompute(&mut self);
}

impl<B: BiasModel + ?Sized> BiasModel for &mut B {
    fn h_error(&self) -> f64 {
        (**self).h_error()
    }
    fn d_error(&self) -> f64 {
        (**self).d_error()
    }
    fn h_error_variance(&self) -> f64 {
        (**self).h_error_variance()
    }
    fn record_h_error(&mut self, sample: f64) {
        (**self).record_h_error(sample);
    }
    fn record_d_error(&mut self, sample: f64) {
        (**self).record_d_error(sample);
    }
    fn recompute(&mut self) {
        (**self).recompute();
    }
}

impl<B: BiasModel + ?Sized> BiasModel for Box<B> {
    fn h_error(&self) -> f64 {
        (**self).h_error()
    }
    fn d_error(&self) -> f64 {
        (**self).d_error()
    }
    fn h_error_variance(&self) -> f64 {
        (**self).h_error_variance()
    }
    fn record_h_error(&mut self, sample: f64) {
        (**self).record_h_error(sample);
    }
    fn record_d_error(&mut self, sample: f64) {
        (**self).record_d_error(sample);
    }
    fn recompute(&mut self) {
        (**self).recompute();
    }
}

/// No correction: `hHat = h`, `dHat = d`. Samples are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoBias;

impl BiasModel for NoBias {
    fn h_error(&self) -> f64 {
        0.0
    }
    fn d_error(&self) -> f64 {
        0.0
    }
    fn h_error_variance(&self) -> f64 {
        0.0
    }
    fn record_h_error(&mut self, _sample: f64) {}
    fn record_d_error(&mut self, _sample: f64) {}
    fn recompute(&mut self) {}
}

/// Running average of every one-step error sample seen so far.
///
/// On `recompute`, `εh` is clamped to `>= 0` and `εd` to
/// `[0, MAX_DISTANCE_ERROR]`.
#[derive(Debug, Clone, Default)]
pub struct GlobalAverageBias {
    h_samples: RunningMoments,
    d_samples: RunningMoments,
    h_error: f64,
    d_error: f64,
    h_variance: f64,
}

impl GlobalAverageBias {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of heuristic error samples recorded.
    #[must_use]
    pub fn sample_count(&self) -> u64 {
        self.h_samples.count()
    }
}

impl BiasModel for GlobalAverageBias {
    fn h_error(&self) -> f64 {
        self.h_error
    }

    fn d_error(&self) -> f64 {
        self.d_error
    }

    fn h_error_variance(&self) -> f64 {
        self.h_variance
    }

    fn record_h_error(&mut self, sample: f64) {
        if sample.is_finite() {
            self.h_samples.push(sample);
        }
    }

    fn record_d_error(&mut self, sample: f64) {
        if sample.is_finite() {
            self.d_samples.push(sample);
        }
    }

    fn recompute(&mut self) {
        self.h_error = self.h_samples.mean().unwrap_or(0.0).max(0.0);
        self.d_error = self
            .d_samples
            .mean()
            .unwrap_or(0.0)
            .clamp(0.0, MAX_DISTANCE_ERROR);
        self.h_variance = self.h_samples.sample_variance().unwrap_or(0.0);
    }
}
