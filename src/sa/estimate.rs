//! Temperature estimation from sampled moves.

use super::types::SaProblem;
use crate::error::{Error, Result};
use log::debug;
use rand::Rng;

/// Acceptance probability of an average uphill move at the initial temperature.
const INITIAL_ACCEPTANCE: f64 = 0.98;

/// Acceptance probability of an average uphill move at the minimum temperature.
const FINAL_ACCEPTANCE: f64 = 0.001;

/// Estimates an `(initial, min)` temperature pair for `problem`.
///
/// Draws `samples` random states, applies one move to each and averages
/// the energy increase over the uphill moves. The initial temperature
/// accepts that average increase with probability 0.98, the minimum
/// temperature with probability 0.001.
///
/// Fails with [`Error::InvalidConfig`] when no finite uphill move was
/// observed (e.g. a flat energy landscape).
pub fn estimate_temperatures<P: SaProblem, R: Rng>(
    problem: &P,
    samples: usize,
    rng: &mut R,
) -> Result<(f64, f64)> {
    let mut total = 0.0;
    let mut uphill = 0usize;

    for _ in 0..samples {
        let mut state = problem.initial_state(rng);
        let before = problem.energy(&state);
        problem.perturb(&mut state, rng);
        let delta = problem.energy(&state) - before;
        if delta.is_finite() && delta > 0.0 {
            total += delta;
            uphill += 1;
        }
    }

    if uphill == 0 {
        return Err(Error::InvalidConfig(format!(
            "no uphill move observed in {samples} samples"
        )));
    }

    let mean = total / uphill as f64;
    let initial = -mean / INITIAL_ACCEPTANCE.ln();
    let min = -mean / FINAL_ACCEPTANCE.ln();
    debug!("estimated temperatures from {uphill}/{samples} uphill moves: T0={initial} Tmin={min}");
    Ok((initial, min))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::sa::SaConfig;

    struct Steps;

    impl SaProblem for Steps {
        type State = i64;

        fn initial_state<R: Rng>(&self, rng: &mut R) -> i64 {
            rng.random_range(-100..100)
        }

        fn energy(&self, s: &i64) -> f64 {
            s.abs() as f64
        }

        fn perturb<R: Rng>(&self, s: &mut i64, rng: &mut R) {
            *s += if rng.random_bool(0.5) { 1 } else { -1 };
        }
    }

    struct Flat;

    impl SaProblem for Flat {
        type State = ();

        fn initial_state<R: Rng>(&self, _rng: &mut R) {}

        fn energy(&self, _s: &()) -> f64 {
            1.0
        }

        fn perturb<R: Rng>(&self, _s: &mut (), _rng: &mut R) {}
    }

    #[test]
    fn test_estimate_unit_steps() {
        let mut rng = create_rng(11);
        let (t0, t_min) = estimate_temperatures(&Steps, 500, &mut rng).unwrap();
        // Every uphill move costs exactly 1.
        assert!((t0 - (-1.0 / 0.98f64.ln())).abs() < 1e-9);
        assert!((t_min - (-1.0 / 0.001f64.ln())).abs() < 1e-9);
        assert!(SaConfig::default().with_temperatures((t0, t_min)).validate().is_ok());
    }

    #[test]
    fn test_estimate_flat_landscape_fails() {
        let mut rng = create_rng(11);
        assert!(estimate_temperatures(&Flat, 100, &mut rng).is_err());
    }
}
