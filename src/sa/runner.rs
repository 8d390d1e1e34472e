//! SA execution loop.

use super::config::{CoolingSchedule, SaConfig};
use super::types::SaProblem;
use crate::error::{Error, Result};
use crate::random::create_rng;
use log::{debug, trace};
use rand::Rng;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Result of a Simulated Annealing run.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SaResult<S: Clone> {
    /// The best state found.
    pub best: S,

    /// Energy of the best state.
    pub best_energy: f64,

    /// Total number of iterations (moves evaluated).
    pub iterations: usize,

    /// Final temperature when the algorithm stopped.
    pub final_temperature: f64,

    /// Number of accepted moves (including improvements).
    pub accepted_moves: usize,

    /// Number of improving moves.
    pub improving_moves: usize,

    /// Whether cancelled externally.
    pub cancelled: bool,

    /// Best energy sampled at regular intervals.
    pub energy_history: Vec<f64>,
}

/// Executes the Simulated Annealing algorithm.
pub struct SaRunner;

impl SaRunner {
    /// Runs SA optimization from a random initial state.
    pub fn run<P: SaProblem>(problem: &P, config: &SaConfig) -> Result<SaResult<P::State>> {
        Self::run_with_cancel(problem, config, None)
    }

    /// Runs SA with an optional cancellation token.
    ///
    /// The flag is polled once per temperature step; when set, the run
    /// stops and returns the best state found so far.
    pub fn run_with_cancel<P: SaProblem>(
        problem: &P,
        config: &SaConfig,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult<P::State>> {
        config.validate().map_err(Error::InvalidConfig)?;

        let mut rng = match config.seed {
            Some(seed) => create_rng(seed),
            None => create_rng(rand::random()),
        };
        let initial = problem.initial_state(&mut rng);
        Self::run_from(problem, config, initial, &mut rng, cancel)
    }

    /// Runs SA from a caller-supplied state, drawing randomness from `rng`.
    ///
    /// `config.seed` is ignored; the caller owns the random stream.
    pub fn run_from<P: SaProblem, R: Rng>(
        problem: &P,
        config: &SaConfig,
        initial: P::State,
        rng: &mut R,
        cancel: Option<Arc<AtomicBool>>,
    ) -> Result<SaResult<P::State>> {
        config.validate().map_err(Error::InvalidConfig)?;

        let mut current = initial;
        let mut current_energy = problem.energy(&current);
        let mut best = current.clone();
        let mut best_energy = current_energy;

        let mut temperature = config.initial_temperature;
        let mut total_iterations = 0usize;
        let mut accepted_moves = 0usize;
        let mut improving_moves = 0usize;
        let mut cancelled = false;

        let linear_max_steps = compute_linear_steps(config);

        let history_interval = 100.max(config.iterations_per_temperature);
        let mut energy_history = vec![best_energy];

        debug!(
            "annealing: T0={} Tmin={} cooling={:?} initial energy={}",
            config.initial_temperature, config.min_temperature, config.cooling, current_energy
        );

        let mut step = 0usize;

        while temperature > config.min_temperature {
            if let Some(ref flag) = cancel {
                if flag.load(Ordering::Relaxed) {
                    cancelled = true;
                    break;
                }
            }

            let inner_iters = match config.cooling {
                CoolingSchedule::LundyMees { .. } | CoolingSchedule::Exponential => 1,
                _ => config.iterations_per_temperature,
            };

            for _ in 0..inner_iters {
                if budget_spent(config, total_iterations) {
                    break;
                }

                let mut candidate = current.clone();
                problem.perturb(&mut candidate, rng);
                let candidate_energy = problem.energy(&candidate);

                let accept = if current_energy.is_nan() {
                    !candidate_energy.is_nan()
                } else {
                    let delta = candidate_energy - current_energy;
                    if delta < 0.0 {
                        improving_moves += 1;
                        true
                    } else {
                        // Metropolis criterion; a NaN delta never passes.
                        let probability = (-delta / temperature).exp();
                        rng.random_range(0.0..1.0) < probability
                    }
                };

                if accept {
                    current = candidate;
                    current_energy = candidate_energy;
                    accepted_moves += 1;

                    if improves(current_energy, best_energy) {
                        best = current.clone();
                        best_energy = current_energy;
                    }
                }

                total_iterations += 1;

                if total_iterations % history_interval == 0 {
                    energy_history.push(best_energy);
                }
            }

            if budget_spent(config, total_iterations) {
                break;
            }

            temperature = cool(temperature, config, step, linear_max_steps, total_iterations);
            step += 1;
            trace!("step {step}: T={temperature} current={current_energy} best={best_energy}");
        }

        if energy_history
            .last()
            .is_none_or(|&last| (last - best_energy).abs() > 1e-15)
        {
            energy_history.push(best_energy);
        }

        debug!(
            "annealing done: iterations={total_iterations} accepted={accepted_moves} \
             improving={improving_moves} best energy={best_energy} cancelled={cancelled}"
        );

        Ok(SaResult {
            best,
            best_energy,
            iterations: total_iterations,
            final_temperature: temperature,
            accepted_moves,
            improving_moves,
            cancelled,
            energy_history,
        })
    }
}

fn budget_spent(config: &SaConfig, total_iterations: usize) -> bool {
    config.max_iterations > 0 && total_iterations >= config.max_iterations
}

/// `true` if `candidate` is strictly better than `best`; anything beats NaN.
fn improves(candidate: f64, best: f64) -> bool {
    candidate < best || (best.is_nan() && !candidate.is_nan())
}

/// Apply the cooling schedule to compute the next temperature.
fn cool(
    temperature: f64,
    config: &SaConfig,
    step: usize,
    linear_max_steps: usize,
    total_iterations: usize,
) -> f64 {
    match config.cooling {
        CoolingSchedule::Geometric { alpha } => temperature * alpha,

        CoolingSchedule::Linear => {
            if linear_max_steps == 0 {
                config.min_temperature
            } else {
                let t = config.initial_temperature
                    - (step + 1) as f64 * (config.initial_temperature - config.min_temperature)
                        / linear_max_steps as f64;
                t.max(config.min_temperature)
            }
        }

        CoolingSchedule::LundyMees { beta } => temperature / (1.0 + beta * temperature),

        CoolingSchedule::Exponential => {
            let factor = -(config.initial_temperature / config.min_temperature).ln();
            let progress = total_iterations as f64 / config.max_iterations as f64;
            config.initial_temperature * (factor * progress).exp()
        }
    }
}

/// Estimate the number of temperature steps for linear cooling.
fn compute_linear_steps(config: &SaConfig) -> usize {
    match config.cooling {
        CoolingSchedule::Linear => {
            if config.max_iterations > 0 {
                config.max_iterations / config.iterations_per_temperature
            } else {
                1000
            }
        }
        _ => 0,
    }
}
