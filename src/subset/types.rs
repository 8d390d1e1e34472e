//! Subset annealing problem.

use crate::error::{check_subset_size, check_xy, Result};
use crate::sa::SaProblem;
use crate::score::SubsetScore;
use rand::Rng;

/// A chosen subset together with its score.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SubsetSolution {
    /// Indices into the data, in slot order.
    pub indices: Vec<usize>,
    /// Score of the subset (higher is better).
    pub score: f64,
}

/// Selection of `k` of `n` points maximizing a score.
///
/// The state is a `Vec<usize>` of `k` distinct indices in `0..n`. Its
/// energy is the negated score of the selected points, and a move
/// replaces one slot with a point not currently selected.
#[derive(Debug, Clone)]
pub struct SubsetProblem<F> {
    x: Vec<f64>,
    y: Vec<f64>,
    k: usize,
    score: F,
}

impl<F: SubsetScore> SubsetProblem<F> {
    /// Creates a problem over the points `(x[i], y[i])`.
    ///
    /// Fails if the lengths differ, the data is empty, or `k` is not in `1..n`.
    pub fn new(x: Vec<f64>, y: Vec<f64>, k: usize, score: F) -> Result<Self> {
        let n = check_xy(&x, &y)?;
        check_subset_size(k, n)?;
        Ok(Self { x, y, k, score })
    }

    /// Number of data points.
    pub fn n(&self) -> usize {
        self.x.len()
    }

    /// Subset size.
    pub fn k(&self) -> usize {
        self.k
    }

    /// Coordinates of the selected points, in slot order.
    pub fn gather(&self, subset: &[usize]) -> (Vec<f64>, Vec<f64>) {
        subset.iter().map(|&i| (self.x[i], self.y[i])).unzip()
    }

    /// Score of a subset (higher is better).
    pub fn score_of(&self, subset: &[usize]) -> f64 {
        let (xs, ys) = self.gather(subset);
        self.score.score(&xs, &ys)
    }

    /// Packs a subset and its score.
    pub fn solution(&self, subset: &[usize]) -> SubsetSolution {
        SubsetSolution {
            indices: subset.to_vec(),
            score: self.score_of(subset),
        }
    }
}

impl<F: SubsetScore> SaProblem for SubsetProblem<F> {
    type State = Vec<usize>;

    fn initial_state<R: Rng>(&self, rng: &mut R) -> Vec<usize> {
        rand::seq::index::sample(rng, self.n(), self.k).into_vec()
    }

    fn energy(&self, subset: &Vec<usize>) -> f64 {
        -self.score_of(subset)
    }

    fn perturb<R: Rng>(&self, subset: &mut Vec<usize>, rng: &mut R) {
        let slot = rng.random_range(0..self.k);

        // Pick the r-th non-member by walking the members in order.
        let mut members = subset.clone();
        members.sort_unstable();
        let mut incoming = rng.random_range(0..self.n() - self.k);
        for &member in &members {
            if member <= incoming {
                incoming += 1;
            } else {
                break;
            }
        }
        subset[slot] = incoming;
    }
}
