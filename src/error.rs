//! Error type shared by the subset optimizer, exhaustive search and RANSAC.

use thiserror::Error;

/// Errors produced by this crate.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// `x` and `y` have different lengths.
    #[error("x and y must have the same length (x: {x}, y: {y})")]
    LengthMismatch { x: usize, y: usize },

    /// No data points were supplied.
    #[error("input data is empty")]
    EmptyInput,

    /// Subset size outside `1..n`.
    #[error("subset size k must satisfy 1 <= k < n (k: {k}, n: {n})")]
    InvalidSubsetSize { k: usize, n: usize },

    /// RANSAC cannot draw `min_samples` points from `n`.
    #[error("min_samples must be in 1..={n}, got {min_samples}")]
    InsufficientSamples { min_samples: usize, n: usize },

    /// A configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Every RANSAC trial was rejected.
    #[error("RANSAC could not find a valid consensus set after {trials} trials")]
    NoConsensus { trials: usize },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Checks that `x` and `y` describe the same, non-empty set of points.
pub(crate) fn check_xy(x: &[f64], y: &[f64]) -> Result<usize> {
    if x.len() != y.len() {
        return Err(Error::LengthMismatch {
            x: x.len(),
            y: y.len(),
        });
    }
    if x.is_empty() {
        return Err(Error::EmptyInput);
    }
    Ok(x.len())
}

/// Checks `1 <= k < n`.
pub(crate) fn check_subset_size(k: usize, n: usize) -> Result<()> {
    if k == 0 || k >= n {
        return Err(Error::InvalidSubsetSize { k, n });
    }
    Ok(())
}
