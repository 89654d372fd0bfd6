//! Branching variable selection.

use super::node::BoundChange;
use crate::model::Problem;

/// A branching decision on a fractional integer variable.
#[derive(Debug, Clone)]
pub struct BranchDecision {
    /// Variable to branch on.
    pub var: usize,

    /// Current (fractional) relaxation value.
    pub value: f64,

    /// Distance of `value` to the nearest integer.
    pub fractionality: f64,

    /// Bound change for the down child (`x <= floor(value)`).
    pub down: BoundChange,

    /// Bound change for the up child (`x >= ceil(value)`).
    pub up: BoundChange,
}

/// Pick the integer variable with the largest fractional part.
///
/// Ties are broken by the smaller variable index. Returns `None` when every
/// integer variable is within `int_tol` of an integer.
pub fn select_branch_variable(
    x: &[f64],
    problem: &Problem,
    int_tol: f64,
) -> Option<BranchDecision> {
    let mut best: Option<(usize, f64, f64)> = None;
    for i in problem.integer_indices() {
        let value = x[i];
        let frac = Problem::fractionality(value);
        if frac <= int_tol {
            continue;
        }
        // Strict comparison keeps the first (smallest-index) maximum.
        match best {
            Some((_, _, best_frac)) if frac <= best_frac => {}
            _ => best = Some((i, value, frac)),
        }
    }
    best.map(|(var, value, fractionality)| BranchDecision {
        var,
        value,
        fractionality,
        down: BoundChange::down(var, value),
        up: BoundChange::up(var, value),
    })
}
