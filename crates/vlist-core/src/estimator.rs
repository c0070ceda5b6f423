#![forbid(unsafe_code)]

//! Adaptive height estimation for rows that have not been measured yet.
//!
//! When a page arrives the engine has to give every new row some height
//! before the render surface can measure it. A constant placeholder makes
//! the scroll extent jump each time real heights come back; predicting the
//! running mean of everything measured so far keeps the jump small.
//!
//! # Model
//!
//! Normal-Normal conjugate update of the mean row height:
//!
//! ```text
//! κ_n = κ₀ + n
//! μ_n = (κ₀·μ₀ + n·x̄) / κ_n
//! ```
//!
//! `μ₀` is the configured placeholder, `κ₀` the prior strength, and `x̄` the
//! Welford running mean of measured heights.
//!
//! # Failure Modes
//!
//! | Condition | Behavior |
//! |-----------|----------|
//! | No measurements | Return the prior mean |
//! | Zero prior strength | Plain running mean once data exists |
//! | Zero-height reports | Counted like any other sample |

/// Running statistics using Welford's online algorithm.
#[derive(Debug, Clone, Default)]
struct WelfordStats {
    n: u64,
    mean: f64,
    m2: f64,
}

impl WelfordStats {
    fn update(&mut self, x: f64) {
        self.n += 1;
        let delta = x - self.mean;
        self.mean += delta / self.n as f64;
        let delta2 = x - self.mean;
        self.m2 += delta * delta2;
    }

    fn variance(&self) -> Option<f64> {
        if self.n < 2 {
            return None;
        }
        Some(self.m2 / (self.n - 1) as f64)
    }
}

/// Posterior-mean predictor of unmeasured row heights, in pixels.
#[derive(Debug, Clone)]
pub struct HeightEstimator {
    prior_mean: f64,
    prior_strength: f64,
    stats: WelfordStats,
    posterior_mean: f64,
}

impl Default for HeightEstimator {
    fn default() -> Self {
        Self::new(0.0, 2.0)
    }
}

impl HeightEstimator {
    /// Create an estimator with prior mean `prior_mean` weighted as
    /// `prior_strength` pseudo-observations.
    #[must_use]
    pub fn new(prior_mean: f64, prior_strength: f64) -> Self {
        let prior_mean = crate::units::sanitize_px(prior_mean);
        let prior_strength = if prior_strength.is_finite() {
            prior_strength.max(0.0)
        } else {
            0.0
        };
        Self {
            prior_mean,
            prior_strength,
            stats: WelfordStats::default(),
            posterior_mean: prior_mean,
        }
    }

    /// Fold one measured height into the model.
    pub fn observe(&mut self, px: f64) {
        self.stats.update(crate::units::sanitize_px(px));
        let n = self.stats.n as f64;
        let kappa = self.prior_strength + n;
        self.posterior_mean = (self.prior_strength * self.prior_mean + n * self.stats.mean) / kappa;
    }

    /// Height to assign to the next unmeasured row.
    #[must_use]
    pub fn predict(&self) -> f64 {
        self.posterior_mean
    }

    /// Sample variance of observed heights, once two or more exist.
    #[must_use]
    pub fn sample_variance(&self) -> Option<f64> {
        self.stats.variance()
    }

    /// Number of measurements observed.
    #[must_use]
    pub fn observations(&self) -> u64 {
        self.stats.n
    }

    /// The configured prior mean.
    #[must_use]
    pub fn prior_mean(&self) -> f64 {
        self.prior_mean
    }
}
