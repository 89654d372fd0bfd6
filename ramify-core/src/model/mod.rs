//! Problem and solution types.

mod problem;
mod solution;

pub use problem::{Constraint, ConstraintSense, ObjectiveSense, Problem, VarKind, Variable};
pub use solution::{IncumbentTracker, Solution, SolveStatus};
