//! Bound-driven repair solver for LP relaxations.
//!
//! This is not a textbook simplex. The procedure starts each variable at
//! the bound favorable to the objective, then iteratively distributes
//! corrective deltas across the variables of each violated constraint until
//! every constraint holds or the sweep limit is reached. It is cheap,
//! deterministic, and good enough to drive branch-and-bound on small
//! instances; it can report Infeasible for feasible problems with tightly
//! coupled constraints, and it does not detect unbounded rays through
//! constraints (infinite bounds are replaced by a finite sentinel).
//!
//! Constraints are visited in insertion order and each constraint's terms
//! in ascending variable index, so two runs on the same input produce the
//! same assignment.

use super::backend::{LpResult, LpSolver, LpStatus};
use crate::error::{MilpError, MilpResult};
use crate::model::{ConstraintSense, ObjectiveSense, Problem};

/// Stand-in for an infinite bound chosen by the initial assignment.
const UNBOUNDED_SENTINEL: f64 = 100.0;

/// The reference LP relaxation solver.
#[derive(Debug, Clone)]
pub struct RepairSolver {
    /// Feasibility tolerance for violation checks.
    pub feas_tol: f64,

    /// Maximum number of repair sweeps over the constraints.
    pub max_rounds: usize,

    /// Total absolute violation accepted after the repair loop. Coarse on
    /// purpose, reflecting the heuristic's limits.
    pub accept_violation: f64,
}

impl Default for RepairSolver {
    fn default() -> Self {
        Self {
            feas_tol: 1e-9,
            max_rounds: 20,
            accept_violation: 0.1,
        }
    }
}

impl RepairSolver {
    /// Create a solver with the given feasibility tolerance.
    pub fn new(feas_tol: f64) -> Self {
        Self {
            feas_tol,
            ..Self::default()
        }
    }

    /// Starting point: fixed variables at their value, everything else at
    /// the bound favorable to the objective, with infinite bounds replaced
    /// by a finite sentinel.
    fn initial_assignment(&self, problem: &Problem) -> Vec<f64> {
        problem
            .variables()
            .iter()
            .map(|var| {
                if (var.upper() - var.lower()).abs() <= self.feas_tol {
                    return var.lower();
                }
                let favor_upper = match problem.sense() {
                    ObjectiveSense::Maximize => var.obj_coeff() >= 0.0,
                    ObjectiveSense::Minimize => var.obj_coeff() < 0.0,
                };
                let chosen = if favor_upper { var.upper() } else { var.lower() };
                if chosen.is_infinite() {
                    if chosen > 0.0 {
                        UNBOUNDED_SENTINEL
                    } else {
                        0.0
                    }
                } else {
                    chosen
                }
            })
            .collect()
    }

    /// Sweep the constraints, nudging violated ones back toward their
    /// right-hand side. Returns the number of sweeps performed.
    fn repair(&self, problem: &Problem, x: &mut [f64]) -> u64 {
        for round in 1..=self.max_rounds {
            let mut any_violated = false;
            for constraint in problem.constraints() {
                let lhs = constraint.lhs_value(x);
                let rhs = constraint.rhs();
                let violated = match constraint.sense() {
                    ConstraintSense::Le => lhs > rhs + self.feas_tol,
                    ConstraintSense::Ge => lhs < rhs - self.feas_tol,
                    ConstraintSense::Eq => (lhs - rhs).abs() > self.feas_tol,
                };
                if !violated {
                    continue;
                }
                any_violated = true;
                // All three senses want the left-hand side moved toward rhs.
                self.distribute(problem, constraint.terms(), x, rhs - lhs);
            }
            if !any_violated {
                return round as u64;
            }
        }
        self.max_rounds as u64
    }

    /// Spread `target_change` of left-hand-side movement across the
    /// constraint's variables, proportionally to coefficient magnitude,
    /// skipping variables with no slack in the needed direction.
    fn distribute(
        &self,
        problem: &Problem,
        terms: &std::collections::BTreeMap<usize, f64>,
        x: &mut [f64],
        target_change: f64,
    ) {
        if target_change.abs() <= self.feas_tol {
            return;
        }

        let mut adjustable: Vec<usize> = Vec::new();
        let mut total_weight = 0.0;
        for (&idx, &coeff) in terms {
            if coeff.abs() <= self.feas_tol {
                continue;
            }
            let var = &problem.variables()[idx];
            // Increasing the contribution needs headroom above, decreasing
            // needs headroom below.
            let can_adjust = if target_change * coeff > 0.0 {
                x[idx] < var.upper() - self.feas_tol
            } else {
                x[idx] > var.lower() + self.feas_tol
            };
            if can_adjust {
                adjustable.push(idx);
                total_weight += coeff.abs();
            }
        }

        if adjustable.is_empty() || total_weight <= self.feas_tol {
            return;
        }

        for idx in adjustable {
            let coeff = terms[&idx];
            let weight = coeff.abs() / total_weight;
            let delta = target_change * weight / coeff;
            let var = &problem.variables()[idx];
            x[idx] = (x[idx] + delta).max(var.lower()).min(var.upper());
        }
    }

    /// Total absolute violation across all constraints.
    fn total_violation(&self, problem: &Problem, x: &[f64]) -> f64 {
        problem.constraints().iter().map(|c| c.violation(x)).sum()
    }

    /// An improving direction is unbounded when a variable with a nonzero
    /// objective coefficient has an infinite favorable bound and appears in
    /// no constraint.
    fn has_unbounded_ray(&self, problem: &Problem) -> bool {
        let mut in_constraint = vec![false; problem.num_variables()];
        for constraint in problem.constraints() {
            for &idx in constraint.terms().keys() {
                in_constraint[idx] = true;
            }
        }
        problem.variables().iter().enumerate().any(|(i, var)| {
            if var.obj_coeff() == 0.0 || in_constraint[i] {
                return false;
            }
            let improving_bound = match problem.sense() {
                ObjectiveSense::Maximize => {
                    if var.obj_coeff() > 0.0 {
                        var.upper()
                    } else {
                        var.lower()
                    }
                }
                ObjectiveSense::Minimize => {
                    if var.obj_coeff() > 0.0 {
                        var.lower()
                    } else {
                        var.upper()
                    }
                }
            };
            improving_bound.is_infinite()
        })
    }
}

impl LpSolver for RepairSolver {
    fn solve_relaxation(&self, problem: &Problem) -> MilpResult<LpResult> {
        // Trivial infeasibility screen.
        for var in problem.variables() {
            if var.lower() > var.upper() + self.feas_tol {
                return Ok(LpResult::infeasible(0));
            }
        }

        let mut x = self.initial_assignment(problem);
        let rounds = self.repair(problem, &mut x);

        if self.total_violation(problem, &x) > self.accept_violation {
            return Ok(LpResult::infeasible(rounds));
        }

        let obj_val = problem.evaluate_objective(&x);
        if !obj_val.is_finite() || x.iter().any(|v| !v.is_finite()) {
            return Err(MilpError::Internal(
                "non-finite assignment produced by constraint repair".to_string(),
            ));
        }

        let status = if self.has_unbounded_ray(problem) {
            LpStatus::Unbounded
        } else {
            LpStatus::Optimal
        };

        Ok(LpResult {
            status,
            x,
            obj_val,
            iterations: rounds,
        })
    }
}
