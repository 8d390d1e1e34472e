//! RANSAC configuration.

use crate::error::{Error, Result};

/// Number of points drawn per RANSAC trial.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MinSamples {
    /// An absolute count.
    Count(usize),
    /// A fraction in (0, 1) of the data, rounded up.
    Fraction(f64),
}

impl Default for MinSamples {
    /// Two points determine a line.
    fn default() -> Self {
        MinSamples::Count(2)
    }
}

impl MinSamples {
    /// Resolves to a count for `n` data points.
    ///
    /// Fails with [`Error::InsufficientSamples`] unless the count is in `1..=n`.
    pub fn resolve(&self, n: usize) -> Result<usize> {
        let count = match *self {
            MinSamples::Count(c) => c,
            MinSamples::Fraction(f) => (f * n as f64).ceil() as usize,
        };
        if count == 0 || count > n {
            return Err(Error::InsufficientSamples {
                min_samples: count,
                n,
            });
        }
        Ok(count)
    }
}

/// Configuration for [`RansacRegressor`](super::RansacRegressor).
///
/// # Examples
///
/// ```
/// use u_subset::ransac::{MinSamples, RansacConfig};
///
/// let config = RansacConfig::default()
///     .with_min_samples(MinSamples::Fraction(0.2))
///     .with_residual_threshold(0.5)
///     .with_max_trials(500)
///     .with_seed(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RansacConfig {
    /// Points per trial.
    pub min_samples: MinSamples,

    /// Maximum absolute residual for a point to count as an inlier.
    ///
    /// `None` uses the median absolute deviation of `y`.
    pub residual_threshold: Option<f64>,

    /// Upper bound on the number of trials.
    pub max_trials: usize,

    /// Stop as soon as a consensus set reaches this size.
    pub stop_n_inliers: Option<usize>,

    /// Desired probability that at least one trial drew only inliers.
    ///
    /// Bounds the trial count by `log(1 - p) / log(1 - w^m)` where `w`
    /// is the best inlier ratio so far and `m` the sample size.
    pub stop_probability: f64,

    /// Random seed. `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for RansacConfig {
    fn default() -> Self {
        Self {
            min_samples: MinSamples::default(),
            residual_threshold: None,
            max_trials: 100,
            stop_n_inliers: None,
            stop_probability: 0.99,
            seed: None,
        }
    }
}

impl RansacConfig {
    pub fn with_min_samples(mut self, min_samples: MinSamples) -> Self {
        self.min_samples = min_samples;
        self
    }

    pub fn with_residual_threshold(mut self, threshold: f64) -> Self {
        self.residual_threshold = Some(threshold);
        self
    }

    pub fn with_max_trials(mut self, n: usize) -> Self {
        self.max_trials = n;
        self
    }

    pub fn with_stop_n_inliers(mut self, n: usize) -> Self {
        self.stop_n_inliers = Some(n);
        self
    }

    pub fn with_stop_probability(mut self, p: f64) -> Self {
        self.stop_probability = p;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.max_trials == 0 {
            return Err("max_trials must be at least 1".into());
        }
        if !(0.0..=1.0).contains(&self.stop_probability) {
            return Err(format!(
                "stop_probability must be in [0, 1], got {}",
                self.stop_probability
            ));
        }
        if let Some(t) = self.residual_threshold {
            if t.is_nan() || t < 0.0 {
                return Err(format!("residual_threshold must be non-negative, got {t}"));
            }
        }
        if let MinSamples::Fraction(f) = self.min_samples {
            if f.is_nan() || f <= 0.0 || f >= 1.0 {
                return Err(format!("min_samples fraction must be in (0, 1), got {f}"));
            }
        }
        Ok(())
    }
}
