//! Online mean/variance estimation.
//!
//! [`RunningMoments`] is a Welford accumulator. [`VarianceTracker`] wraps it
//! for the sequence of corrected minima (`fHatMin`) seen across iterations.

/// Welford accumulator: count, mean, and sum of squared deviations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMoments {
    count: u64,
    mean: f64,
    m2: f64,
}

impl RunningMoments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        #[allow(clippy::cast_precision_loss)]
        let n = self.count as f64;
        self.mean += delta / n;
        self.m2 += delta * (value - self.mean);
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.count
    }

    /// Mean of the samples, `None` when empty.
    #[must_use]
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.mean)
    }

    /// Sample variance (`n - 1` denominator), `None` below two samples.
    #[must_use]
    pub fn sample_variance(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let denom = (self.count - 1) as f64;
        Some((self.m2 / denom).max(0.0))
    }
}

/// Variance of the corrected-minimum sequence.
///
/// Reports `default_variance` until two values have been observed, which
/// keeps early envelope probabilities from being over-confident.
#[derive(Debug, Clone, PartialEq)]
pub struct VarianceTracker {
    moments: RunningMoments,
    default_variance: f64,
}

impl VarianceTracker {
    /// Default used by the search policy.
    pub const DEFAULT_VARIANCE: f64 = 100.0;

    #[must_use]
    pub fn new(default_variance: f64) -> Self {
        Self {
            moments: RunningMoments::new(),
            default_variance,
        }
    }

    pub fn push(&mut self, value: f64) {
        self.moments.push(value);
    }

    #[must_use]
    pub fn variance(&self) -> f64 {
        self.moments
            .sample_variance()
            .unwrap_or(self.default_variance)
    }

    #[must_use]
    pub fn count(&self) -> u64 {
        self.moments.count()
    }
}

impl Default for VarianceTracker {
    fn default() -> Self {
        Self::new(Self::DEFAULT_VARIANCE)
    }
}
