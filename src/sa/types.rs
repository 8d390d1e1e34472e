//! Core trait for Simulated Annealing.

use rand::Rng;

/// Defines a Simulated Annealing problem.
///
/// The user implements the initial state, the energy and an in-place
/// move. The SA framework handles temperature management, the
/// acceptance criterion and cooling.
///
/// # Minimization
///
/// SA minimizes the energy. For maximization, negate the objective.
///
/// # Examples
///
/// ```
/// use rand::Rng;
/// use u_subset::sa::SaProblem;
///
/// struct Parabola;
///
/// impl SaProblem for Parabola {
///     type State = f64;
///
///     fn initial_state<R: Rng>(&self, rng: &mut R) -> f64 {
///         rng.random_range(-10.0..10.0)
///     }
///
///     fn energy(&self, x: &f64) -> f64 {
///         x * x
///     }
///
///     fn perturb<R: Rng>(&self, x: &mut f64, rng: &mut R) {
///         *x += rng.random_range(-1.0..1.0);
///     }
/// }
/// ```
///
/// # References
///
/// Kirkpatrick et al. (1983), Cerny (1985)
pub trait SaProblem {
    /// The state representation type.
    type State: Clone;

    /// Creates a random initial state.
    fn initial_state<R: Rng>(&self, rng: &mut R) -> Self::State;

    /// Computes the energy of a state. Lower is better.
    fn energy(&self, state: &Self::State) -> f64;

    /// Applies one small random perturbation to `state` in place.
    ///
    /// The neighborhood must be connected: any state is reachable from
    /// any other through a sequence of moves.
    fn perturb<R: Rng>(&self, state: &mut Self::State, rng: &mut R);
}
