//! Exhaustive subset search.
//!
//! Scores every `k`-combination of `0..n`. The cost grows as `C(n, k)`,
//! so this is only practical for small inputs, where it gives the exact
//! optimum to compare annealing against.

use super::types::{SubsetProblem, SubsetSolution};
use crate::score::SubsetScore;
use itertools::Itertools;
use log::debug;
use std::cmp::Ordering;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Returns the highest-scoring subset of `problem`.
///
/// Ties go to the lexicographically smallest index set. NaN scores rank
/// below every other score.
#[cfg(not(feature = "parallel"))]
pub fn brute_force<F: SubsetScore>(problem: &SubsetProblem<F>) -> SubsetSolution {
    let best = (0..problem.n())
        .combinations(problem.k())
        .map(|indices| (problem.score_of(&indices), indices))
        .reduce(pick);
    finish(problem, best)
}

/// Returns the highest-scoring subset of `problem`, scoring on the rayon pool.
///
/// Ties go to the lexicographically smallest index set. NaN scores rank
/// below every other score.
#[cfg(feature = "parallel")]
pub fn brute_force<F: SubsetScore + Sync>(problem: &SubsetProblem<F>) -> SubsetSolution {
    let best = (0..problem.n())
        .combinations(problem.k())
        .par_bridge()
        .map(|indices| (problem.score_of(&indices), indices))
        .reduce_with(pick);
    finish(problem, best)
}

fn finish<F: SubsetScore>(
    problem: &SubsetProblem<F>,
    best: Option<(f64, Vec<usize>)>,
) -> SubsetSolution {
    // 1 <= k < n guarantees at least one combination.
    let (score, indices) = best.unwrap_or_else(|| (f64::NAN, Vec::new()));
    debug!(
        "brute force over n={} k={}: best score {score}",
        problem.n(),
        problem.k()
    );
    SubsetSolution { indices, score }
}

fn pick(a: (f64, Vec<usize>), b: (f64, Vec<usize>)) -> (f64, Vec<usize>) {
    let by_score = match (a.0.is_nan(), b.0.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.0.total_cmp(&b.0),
    };
    match by_score.then_with(|| b.1.cmp(&a.1)) {
        Ordering::Less => b,
        _ => a,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::score::Score;

    #[test]
    fn test_finds_collinear_subset() {
        let x = vec![1.0, 2.0, 3.0, 4.0];
        let y = vec![2.0, 3.0, 6.0, 8.0];
        let problem = SubsetProblem::new(x, y, 2, Score::R2).unwrap();
        let best = brute_force(&problem);
        // Any pair is collinear; the tie goes to the smallest index set.
        assert_eq!(best.indices, vec![0, 1]);
        assert!((best.score - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_skips_outlier() {
        let x = vec![0.0, 1.0, 2.0, 3.0, 4.0];
        let y = vec![0.0, 1.0, 10.0, 3.0, 4.0];
        let problem = SubsetProblem::new(x, y, 4, Score::R2).unwrap();
        let best = brute_force(&problem);
        assert_eq!(best.indices, vec![0, 1, 3, 4]);
    }

    #[test]
    fn test_minimized_score() {
        // Smallest total variation: the three clustered points.
        let x = vec![0.0, 0.1, 0.2, 5.0, -7.0];
        let y = vec![0.0, 0.1, 0.0, 5.0, 9.0];
        let problem = SubsetProblem::new(x, y, 3, Score::TotalVariation).unwrap();
        let best = brute_force(&problem);
        assert_eq!(best.indices, vec![0, 1, 2]);
        assert!(best.score <= 0.0);
    }

    #[test]
    fn test_nan_ranks_last() {
        let a = (f64::NAN, vec![0]);
        let b = (-1.0, vec![1]);
        assert_eq!(pick(a.clone(), b.clone()).1, vec![1]);
        assert_eq!(pick(b, a).1, vec![1]);
    }

    #[test]
    fn test_tie_prefers_smaller_indices() {
        assert_eq!(pick((1.0, vec![2, 3]), (1.0, vec![0, 4])).1, vec![0, 4]);
        assert_eq!(pick((1.0, vec![0, 4]), (1.0, vec![2, 3])).1, vec![0, 4]);
    }
}
