//! RANSAC execution loop.

use super::config::{MinSamples, RansacConfig};
use super::linear::{median_absolute_deviation, Line};
use crate::error::{check_xy, Error, Result};
use crate::random::create_rng;
use log::debug;
use rand::seq::index;

/// A line fitted by RANSAC.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RansacModel {
    /// Least squares fit on the consensus set.
    pub line: Line,

    /// `true` for points in the consensus set.
    pub inlier_mask: Vec<bool>,

    /// Size of the consensus set.
    pub n_inliers: usize,

    /// Number of trials run.
    pub trials: usize,

    /// Residual threshold that defined the consensus set.
    pub residual_threshold: f64,
}

impl RansacModel {
    /// Coefficient of determination of the robust line on `(x, y)`.
    pub fn score(&self, x: &[f64], y: &[f64]) -> f64 {
        self.line.score(x, y)
    }
}

/// Best trial so far.
struct Consensus {
    inliers: Vec<usize>,
    score: f64,
}

/// Robust line fitting by random sample consensus.
pub struct RansacRegressor;

impl RansacRegressor {
    /// Fits a line to `(x, y)`, discounting outliers.
    ///
    /// Each trial fits a line to `min_samples` random points and collects
    /// the points within `residual_threshold` of it. The largest
    /// collection wins, ties broken by the R² of the trial line on its
    /// own inliers; the returned line is refit on the winner.
    pub fn fit(x: &[f64], y: &[f64], config: &RansacConfig) -> Result<RansacModel> {
        let n = check_xy(x, y)?;
        config.validate().map_err(Error::InvalidConfig)?;
        let min_samples = config.min_samples.resolve(n)?;
        let threshold = config
            .residual_threshold
            .unwrap_or_else(|| median_absolute_deviation(y));

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };

        let mut best: Option<Consensus> = None;
        let mut max_trials = config.max_trials;
        let mut trials = 0usize;
        let mut inliers = Vec::with_capacity(n);

        while trials < max_trials {
            trials += 1;

            let sample = index::sample(&mut rng, n, min_samples).into_vec();
            let candidate = Line::fit_indices(x, y, &sample);

            inliers.clear();
            inliers.extend((0..n).filter(|&i| (y[i] - candidate.predict(x[i])).abs() <= threshold));

            let best_count = best.as_ref().map_or(1, |b| b.inliers.len());
            if inliers.len() < best_count {
                continue;
            }

            let (xs, ys): (Vec<f64>, Vec<f64>) = inliers.iter().map(|&i| (x[i], y[i])).unzip();
            let score = candidate.score(&xs, &ys);
            if let Some(b) = &best {
                if inliers.len() == b.inliers.len() && score < b.score {
                    continue;
                }
            }

            max_trials = max_trials.min(dynamic_max_trials(
                inliers.len(),
                n,
                min_samples,
                config.stop_probability,
            ));
            best = Some(Consensus {
                inliers: inliers.clone(),
                score,
            });

            if config.stop_n_inliers.is_some_and(|stop| inliers.len() >= stop) {
                break;
            }
        }

        let Some(consensus) = best else {
            return Err(Error::NoConsensus { trials });
        };

        let line = Line::fit_indices(x, y, &consensus.inliers);
        let mut inlier_mask = vec![false; n];
        for &i in &consensus.inliers {
            inlier_mask[i] = true;
        }
        debug!(
            "ransac: {} of {n} inliers after {trials} trials (threshold {threshold})",
            consensus.inliers.len()
        );

        Ok(RansacModel {
            line,
            inlier_mask,
            n_inliers: consensus.inliers.len(),
            trials,
            residual_threshold: threshold,
        })
    }
}

/// Trials needed to draw an all-inlier sample with probability `p`.
fn dynamic_max_trials(n_inliers: usize, n: usize, min_samples: usize, p: f64) -> usize {
    let inlier_ratio = n_inliers as f64 / n as f64;
    let nom = 1.0 - p;
    let denom = 1.0 - inlier_ratio.powi(min_samples as i32);
    if nom == 0.0 || denom == 1.0 {
        return usize::MAX;
    }
    if denom == 0.0 {
        return 1;
    }
    (nom.ln() / denom.ln()).ceil().abs() as usize
}

/// Fits a RANSAC line with `min_samples` points per trial and returns its
/// R² on the full data.
///
/// An ordinary least squares line is fit alongside as a baseline and
/// only reported in the debug log.
pub fn fit_ransac(x: &[f64], y: &[f64], min_samples: usize) -> Result<f64> {
    let baseline = Line::fit(x, y)?;
    debug!("ols baseline: {baseline:?}, r2 {}", baseline.score(x, y));

    let config = RansacConfig::default().with_min_samples(MinSamples::Count(min_samples));
    let model = RansacRegressor::fit(x, y, &config)?;
    Ok(model.score(x, y))
}
