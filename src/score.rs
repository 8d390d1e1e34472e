//! Subset score functions.
//!
//! A score maps the `(x, y)` coordinates of a subset to a real number,
//! higher being better. Any `Fn(&[f64], &[f64]) -> f64` closure is a
//! score; [`Score`] provides the standard statistical criteria.

use crate::error::Error;
use std::fmt;
use std::str::FromStr;

/// A scoring function over the coordinates of a subset. Higher is better.
pub trait SubsetScore {
    /// Scores the subset whose coordinates are `x[i], y[i]`.
    fn score(&self, x: &[f64], y: &[f64]) -> f64;
}

impl<F> SubsetScore for F
where
    F: Fn(&[f64], &[f64]) -> f64,
{
    fn score(&self, x: &[f64], y: &[f64]) -> f64 {
        self(x, y)
    }
}

/// Built-in statistical criteria.
///
/// All criteria are computed from the centered second moments of the
/// subset (scatter, not divided by the subset size):
/// `sxx = S_XX - S_X^2 / m`, `syy = S_YY - S_Y^2 / m`,
/// `sxy = S_XY - S_X S_Y / m`.
///
/// # Examples
///
/// ```
/// use u_subset::score::{Score, SubsetScore};
///
/// let x = [1.0, 2.0, 3.0];
/// let y = [2.0, 4.0, 6.0];
/// assert!((Score::R2.evaluate(&x, &y) - 1.0).abs() < 1e-12);
///
/// // Minimized criteria are negated when used as a score.
/// let tv = Score::TotalVariation.evaluate(&x, &y);
/// assert!((Score::TotalVariation.score(&x, &y) + tv).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Score {
    /// Coefficient of determination `sxy^2 / (sxx * syy)`. Maximized.
    R2,
    /// Pearson correlation `sxy / sqrt(sxx * syy)`. Maximized.
    Correlation,
    /// `sxx + syy`. Minimized.
    TotalVariation,
    /// `sxy`. Maximized.
    Covariance,
    /// `sxx - syy`. Maximized.
    DifferenceOfVariances,
    /// `1 - R2`. Minimized.
    FractionOfVarianceUnexplained,
}

impl Score {
    /// Every built-in criterion.
    pub const ALL: [Score; 6] = [
        Score::R2,
        Score::Correlation,
        Score::TotalVariation,
        Score::Covariance,
        Score::DifferenceOfVariances,
        Score::FractionOfVarianceUnexplained,
    ];

    /// Raw value of the criterion on the given coordinates.
    ///
    /// `R2` and `Correlation` are 0.0 when either coordinate has no
    /// spread in the subset.
    pub fn evaluate(&self, x: &[f64], y: &[f64]) -> f64 {
        let m = Moments::new(x, y);
        match self {
            Score::R2 => m.r2(),
            Score::Correlation => m.correlation(),
            Score::TotalVariation => m.sxx + m.syy,
            Score::Covariance => m.sxy,
            Score::DifferenceOfVariances => m.sxx - m.syy,
            Score::FractionOfVarianceUnexplained => 1.0 - m.r2(),
        }
    }

    /// Whether larger raw values are better.
    pub fn maximizing(&self) -> bool {
        !matches!(
            self,
            Score::TotalVariation | Score::FractionOfVarianceUnexplained
        )
    }

    /// Short symbol, as accepted by [`FromStr`].
    pub fn symbol(&self) -> &'static str {
        match self {
            Score::R2 => "r2",
            Score::Correlation => "cor",
            Score::TotalVariation => "tv",
            Score::Covariance => "cov",
            Score::DifferenceOfVariances => "dv",
            Score::FractionOfVarianceUnexplained => "fvu",
        }
    }
}

impl SubsetScore for Score {
    fn score(&self, x: &[f64], y: &[f64]) -> f64 {
        let value = self.evaluate(x, y);
        if self.maximizing() {
            value
        } else {
            -value
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Score {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Score::ALL
            .into_iter()
            .find(|score| score.symbol().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidConfig(format!("unknown score function: {s}")))
    }
}

/// Centered second moments of a point set.
struct Moments {
    sxx: f64,
    syy: f64,
    sxy: f64,
    /// Scatter left over by rounding when centering, per coordinate.
    noise_x: f64,
    noise_y: f64,
}

/// Multiple of the unit roundoff allowed in each centered deviation.
const CENTERING_ULPS: f64 = 4.0;

impl Moments {
    fn new(x: &[f64], y: &[f64]) -> Self {
        let m = x.len().min(y.len());
        let mut moments = Self {
            sxx: 0.0,
            syy: 0.0,
            sxy: 0.0,
            noise_x: 0.0,
            noise_y: 0.0,
        };
        if m == 0 {
            return moments;
        }
        let (x, y) = (&x[..m], &y[..m]);
        let mx = x.iter().sum::<f64>() / m as f64;
        let my = y.iter().sum::<f64>() / m as f64;

        for (&xi, &yi) in x.iter().zip(y) {
            let dx = xi - mx;
            let dy = yi - my;
            moments.sxx += dx * dx;
            moments.syy += dy * dy;
            moments.sxy += dx * dy;
        }
        moments.noise_x = m as f64 * (CENTERING_ULPS * f64::EPSILON * mx.abs()).powi(2);
        moments.noise_y = m as f64 * (CENTERING_ULPS * f64::EPSILON * my.abs()).powi(2);
        moments
    }

    /// No spread beyond what centering can leave behind in either coordinate.
    fn degenerate(&self) -> bool {
        self.sxx <= self.noise_x || self.syy <= self.noise_y
    }

    fn r2(&self) -> f64 {
        if self.degenerate() {
            return 0.0;
        }
        (self.sxy * self.sxy / (self.sxx * self.syy)).clamp(0.0, 1.0)
    }

    fn correlation(&self) -> f64 {
        if self.degenerate() {
            return 0.0;
        }
        (self.sxy / (self.sxx * self.syy).sqrt()).clamp(-1.0, 1.0)
    }
}
