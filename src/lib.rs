//! Subset selection by simulated annealing.
//!
//! Picks `k` of `n` points `(x[i], y[i])` so that a score of the chosen
//! points is as large as possible:
//!
//! - **Simulated Annealing (SA)**: generic single-solution engine with
//!   pluggable cooling schedules and in-place moves.
//! - **Scores**: R², correlation, covariance, total variation, difference
//!   of variances, fraction of variance unexplained, or any closure.
//! - **Subset selection**: the SA adapter (one swap per move) plus an
//!   exhaustive search for small inputs.
//! - **RANSAC**: a standalone robust line fit reporting R².
//!
//! # Example
//!
//! ```
//! use u_subset::sa::{CoolingSchedule, SaConfig};
//! use u_subset::score::Score;
//! use u_subset::subset::anneal_subset;
//!
//! let x = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
//! let y = vec![2.0, 4.1, 9.0, 8.0, 10.1, 0.5];
//! let config = SaConfig::default()
//!     .with_temperatures((1.0, 1e-3))
//!     .with_cooling(CoolingSchedule::Exponential)
//!     .with_max_iterations(2_000);
//!
//! let best = anneal_subset(x, y, 4, Score::R2, 7, &config).unwrap();
//! assert_eq!(best.indices.len(), 4);
//! assert!(best.score > 0.99);
//! ```

pub mod error;
pub mod random;
pub mod ransac;
pub mod sa;
pub mod score;
pub mod subset;

pub use error::{Error, Result};
