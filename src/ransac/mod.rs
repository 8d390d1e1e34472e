//! Robust line fitting (RANSAC).
//!
//! Fits `y = slope * x + intercept` while discounting outliers: repeated
//! least squares fits on small random samples vote for the line with the
//! largest consensus set, which is then refit by least squares.
//!
//! # References
//!
//! - Fischler & Bolles (1981), "Random Sample Consensus: A Paradigm for
//!   Model Fitting with Applications to Image Analysis and Automated
//!   Cartography"

mod config;
mod linear;
mod runner;

pub use config::{MinSamples, RansacConfig};
pub use linear::{median_absolute_deviation, r2_score, Line};
pub use runner::{fit_ransac, RansacModel, RansacRegressor};
