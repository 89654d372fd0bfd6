//! Ramify: a branch-and-bound solver for mixed-integer linear programs.
//!
//! The crate solves problems of the form
//!
//! ```text
//! optimize    c^T x
//! subject to  a_i^T x  {<=, >=, =}  b_i    for each constraint i
//!             lower_j <= x_j <= upper_j    for each variable j
//!             x_j integer                  for designated variables
//! ```
//!
//! Problems are built programmatically through [`Problem`] or loaded from
//! the MPS text format with [`read_mps_file`]. Solving is depth-first
//! branch-and-bound over an LP relaxation backend; the built-in backend is
//! a deterministic bound-driven repair heuristic ([`RepairSolver`]), and a
//! full simplex or interior-point solver can be plugged in through the
//! [`LpSolver`] trait.
//!
//! # Example
//!
//! ```
//! use ramify_core::{solve, ConstraintSense, ObjectiveSense, Problem, Settings, SolveStatus, VarKind};
//!
//! // max 5 x0 + 8 x1  s.t.  2 x0 + 4 x1 <= 10,  x0, x1 binary
//! let mut problem = Problem::new("knapsack", ObjectiveSense::Maximize);
//! let x0 = problem.add_variable("x0", VarKind::Binary);
//! let x1 = problem.add_variable("x1", VarKind::Binary);
//! problem.set_objective_coefficient(x0, 5.0).unwrap();
//! problem.set_objective_coefficient(x1, 8.0).unwrap();
//! let cap = problem.add_constraint("cap", ConstraintSense::Le, 10.0).unwrap();
//! problem.set_coefficient(cap, x0, 2.0).unwrap();
//! problem.set_coefficient(cap, x1, 4.0).unwrap();
//!
//! let solution = solve(&problem, &Settings::default());
//! assert_eq!(solution.status(), SolveStatus::Optimal);
//! assert_eq!(solution.objective_value(), 13.0);
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod model;
pub mod mps;
pub mod relax;
pub mod search;
pub mod settings;

pub use error::{MilpError, MilpResult};
pub use model::{
    Constraint, ConstraintSense, IncumbentTracker, ObjectiveSense, Problem, Solution, SolveStatus,
    VarKind, Variable,
};
pub use mps::{parse_mps, read_mps_file, write_mps};
pub use relax::{LpResult, LpSolver, LpStatus, RepairSolver};
pub use search::BranchAndBound;
pub use settings::Settings;

/// Solve a problem with the reference branch-and-bound configuration.
///
/// Blocks the calling thread until a solution is produced or a limit is
/// hit. The input problem is never mutated.
pub fn solve(problem: &Problem, settings: &Settings) -> Solution {
    BranchAndBound::new(settings.clone()).solve(problem)
}
