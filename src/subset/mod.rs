//! Subset selection.
//!
//! Chooses `k` of `n` points `(x[i], y[i])` maximizing a
//! [`SubsetScore`](crate::score::SubsetScore). [`SubsetProblem`] plugs
//! the selection into the [`sa`](crate::sa) engine: the state is the list
//! of selected indices, the energy is the negated score and a move swaps
//! one selected point for an unselected one. [`brute_force`] gives the
//! exact optimum for small inputs.

mod optimizer;
mod search;
mod types;

pub use optimizer::{anneal_subset, SubsetOptimizer};
pub use search::brute_force;
pub use types::{SubsetProblem, SubsetSolution};
