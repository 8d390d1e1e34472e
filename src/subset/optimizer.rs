//! Stateful subset optimizer.

use super::types::{SubsetProblem, SubsetSolution};
use crate::error::Result;
use crate::random::create_rng;
use crate::sa::{SaConfig, SaProblem, SaResult, SaRunner};
use crate::score::SubsetScore;
use rand::rngs::StdRng;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Owns a subset of size `k` and the seeded random stream that moves it.
///
/// The same seed always yields the same initial subset and the same
/// sequence of moves.
///
/// # Examples
///
/// ```
/// use u_subset::sa::{CoolingSchedule, SaConfig};
/// use u_subset::score::Score;
/// use u_subset::subset::SubsetOptimizer;
///
/// let x: Vec<f64> = (0..30).map(|i| i as f64).collect();
/// let y: Vec<f64> = x.iter().map(|v| if *v as usize % 3 == 0 { 50.0 } else { 2.0 * v }).collect();
///
/// let mut opt = SubsetOptimizer::new(x, y, 10, Score::R2, 42).unwrap();
/// let config = SaConfig::default()
///     .with_temperatures((1.0, 1e-4))
///     .with_cooling(CoolingSchedule::Exponential)
///     .with_max_iterations(5_000);
/// let result = opt.anneal(&config).unwrap();
/// assert_eq!(result.best.len(), 10);
/// assert!(opt.score() >= 0.99);
/// ```
pub struct SubsetOptimizer<F> {
    problem: SubsetProblem<F>,
    state: Vec<usize>,
    rng: StdRng,
}

impl<F: SubsetScore> SubsetOptimizer<F> {
    /// Validates the data and draws the initial subset from `seed`.
    pub fn new(x: Vec<f64>, y: Vec<f64>, k: usize, score: F, seed: u64) -> Result<Self> {
        Ok(Self::from_problem(SubsetProblem::new(x, y, k, score)?, seed))
    }

    /// Wraps an existing problem, drawing the initial subset from `seed`.
    pub fn from_problem(problem: SubsetProblem<F>, seed: u64) -> Self {
        let mut rng = create_rng(seed);
        let state = problem.initial_state(&mut rng);
        Self {
            problem,
            state,
            rng,
        }
    }

    /// The current subset.
    pub fn state(&self) -> &[usize] {
        &self.state
    }

    /// The underlying problem.
    pub fn problem(&self) -> &SubsetProblem<F> {
        &self.problem
    }

    /// Negated score of the current subset.
    pub fn energy(&self) -> f64 {
        self.problem.energy(&self.state)
    }

    /// Score of the current subset.
    pub fn score(&self) -> f64 {
        self.problem.score_of(&self.state)
    }

    /// Replaces one randomly chosen slot with a random non-member.
    pub fn perturb(&mut self) {
        self.problem.perturb(&mut self.state, &mut self.rng);
    }

    /// Anneals from the current subset and keeps the best one found.
    pub fn anneal(&mut self, config: &SaConfig) -> Result<SaResult<Vec<usize>>> {
        self.anneal_with_cancel(config, None)
    }

    /// Like [`anneal`](Self::anneal), stopping early when `cancel` is set.
    pub fn anneal_with_cancel(
        &mut self,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult<Vec<usize>>> {
        let result = SaRunner::run_from(
            &self.problem,
            config,
            self.state.clone(),
            &mut self.rng,
            cancel,
        )?;
        self.state.clone_from(&result.best);
        Ok(result)
    }

    /// The current subset with its score.
    pub fn solution(&self) -> SubsetSolution {
        self.problem.solution(&self.state)
    }
}

/// Selects `k` of the points `(x[i], y[i])` maximizing `score` by annealing.
pub fn anneal_subset<F: SubsetScore>(
    x: Vec<f64>,
    y: Vec<f64>,
    k: usize,
    score: F,
    seed: u64,
    config: &SaConfig,
) -> Result<SubsetSolution> {
    let mut optimizer = SubsetOptimizer::new(x, y, k, score, seed)?;
    optimizer.anneal(config)?;
    Ok(optimizer.solution())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::sa::CoolingSchedule;
    use crate::score::Score;
    use crate::subset::brute_force;
    use proptest::prelude::*;
    use std::cell::Cell;
    use std::collections::HashSet;
    use std::rc::Rc;

    fn noisy_line(n: usize) -> (Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let y: Vec<f64> = x
            .iter()
            .enumerate()
            .map(|(i, v)| 1.5 * v + 2.0 + if i % 4 == 0 { 9.0 * (i as f64).cos() } else { 0.0 })
            .collect();
        (x, y)
    }

    fn config() -> SaConfig {
        SaConfig::default()
            .with_temperatures((0.5, 1e-4))
            .with_cooling(CoolingSchedule::Exponential)
            .with_max_iterations(4_000)
    }

    #[test]
    fn test_new_validates() {
        let err = SubsetOptimizer::new(vec![1.0; 3], vec![1.0; 3], 3, Score::R2, 0)
            .err()
            .unwrap();
        assert_eq!(err, Error::InvalidSubsetSize { k: 3, n: 3 });
    }

    #[test]
    fn test_energy_matches_score_function() {
        let (x, y) = noisy_line(12);
        let score = |xs: &[f64], ys: &[f64]| xs.iter().zip(ys).map(|(a, b)| a * b).sum::<f64>();
        let mut opt = SubsetOptimizer::new(x.clone(), y.clone(), 5, score, 8).unwrap();
        for _ in 0..20 {
            let expected: f64 = opt.state().iter().map(|&i| x[i] * y[i]).sum();
            assert!((opt.energy() + expected).abs() < 1e-9);
            assert!((opt.score() - expected).abs() < 1e-9);
            opt.perturb();
        }
    }

    #[test]
    fn test_anneal_improves_and_keeps_best() {
        let (x, y) = noisy_line(24);
        let mut opt = SubsetOptimizer::new(x, y, 12, Score::R2, 7).unwrap();
        let start = opt.energy();
        let result = opt.anneal(&config()).unwrap();
        assert!(result.best_energy <= start);
        assert_eq!(opt.state(), result.best.as_slice());
        assert!((opt.energy() - result.best_energy).abs() < 1e-12);
    }

    #[test]
    fn test_anneal_matches_brute_force_on_small_input() {
        let (x, y) = noisy_line(10);
        let problem = SubsetProblem::new(x.clone(), y.clone(), 4, Score::R2).unwrap();
        let exact = brute_force(&problem);
        let found = anneal_subset(x, y, 4, Score::R2, 21, &config()).unwrap();
        assert!(found.score <= exact.score + 1e-12);
        assert!((found.score - exact.score).abs() < 1e-9, "{} vs {}", found.score, exact.score);
    }

    #[test]
    fn test_anneal_cancelled_keeps_start() {
        let (x, y) = noisy_line(10);
        let mut opt = SubsetOptimizer::new(x, y, 3, Score::Covariance, 1).unwrap();
        let start = opt.state().to_vec();
        let cancel = Arc::new(AtomicBool::new(true));
        let result = opt.anneal_with_cancel(&config(), Some(cancel)).unwrap();
        assert!(result.cancelled);
        assert_eq!(opt.state(), start.as_slice());
    }

    #[test]
    fn test_anneal_rejects_invalid_config() {
        let (x, y) = noisy_line(10);
        let mut opt = SubsetOptimizer::new(x, y, 3, Score::R2, 1).unwrap();
        let bad = SaConfig::default().with_cooling(CoolingSchedule::Exponential);
        assert!(matches!(opt.anneal(&bad), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_anneal_on_data_far_from_origin() {
        let (x, y) = noisy_line(24);
        let shifted: Vec<f64> = x.iter().map(|v| v + 1.7e9).collect();

        let plain = SubsetOptimizer::new(x, y.clone(), 12, Score::R2, 7).unwrap();
        let mut opt = SubsetOptimizer::new(shifted, y, 12, Score::R2, 7).unwrap();
        assert_eq!(opt.state(), plain.state());
        assert!(opt.score() > 0.0);
        assert!((opt.energy() - plain.energy()).abs() < 1e-8);

        let start = opt.energy();
        let result = opt.anneal(&config()).unwrap();
        assert!(result.best_energy < start, "{} vs {start}", result.best_energy);
        assert!(result.improving_moves > 0);
    }

    #[test]
    fn test_score_closure_with_shared_counter() {
        let (x, y) = noisy_line(10);
        let calls = Rc::new(Cell::new(0usize));
        let counter = Rc::clone(&calls);
        let score = move |xs: &[f64], _ys: &[f64]| {
            counter.set(counter.get() + 1);
            xs.iter().sum::<f64>()
        };

        let mut opt = SubsetOptimizer::new(x, y, 3, score, 2).unwrap();
        opt.energy();
        opt.perturb();
        opt.energy();
        assert_eq!(calls.get(), 2);

        let result = opt.anneal(&config()).unwrap();
        // One evaluation for the start plus one per move.
        assert_eq!(calls.get(), 2 + 1 + result.iterations);
    }

    proptest! {
        #[test]
        fn prop_subset_invariant_holds(n in 2usize..40, k_frac in 0.0f64..1.0, seed: u64, moves in 0usize..60) {
            let k = 1 + ((n - 1) as f64 * k_frac) as usize % (n - 1);
            let (x, y) = noisy_line(n);
            let mut opt = SubsetOptimizer::new(x, y, k, Score::R2, seed).unwrap();
            for _ in 0..moves {
                opt.perturb();
            }
            let state = opt.state();
            prop_assert_eq!(state.len(), k);
            prop_assert!(state.iter().all(|&i| i < n));
            prop_assert_eq!(state.iter().collect::<HashSet<_>>().len(), k);
        }

        #[test]
        fn prop_same_seed_same_trajectory(seed: u64, moves in 0usize..30) {
            let (x, y) = noisy_line(15);
            let mut a = SubsetOptimizer::new(x.clone(), y.clone(), 6, Score::R2, seed).unwrap();
            let mut b = SubsetOptimizer::new(x, y, 6, Score::R2, seed).unwrap();
            prop_assert_eq!(a.state(), b.state());
            for _ in 0..moves {
                a.perturb();
                b.perturb();
                prop_assert_eq!(a.state(), b.state());
            }
        }

        #[test]
        fn prop_energy_is_negated_score(seed: u64, moves in 0usize..40, k in 1usize..15) {
            let (x, y) = noisy_line(16);
            let mut opt = SubsetOptimizer::new(x.clone(), y.clone(), k, Score::Correlation, seed).unwrap();
            for _ in 0..moves {
                let xs: Vec<f64> = opt.state().iter().map(|&i| x[i]).collect();
                let ys: Vec<f64> = opt.state().iter().map(|&i| y[i]).collect();
                prop_assert_eq!(opt.energy(), -Score::Correlation.score(&xs, &ys));
                prop_assert_eq!(opt.energy(), -opt.score());
                opt.perturb();
            }
        }
    }
}
