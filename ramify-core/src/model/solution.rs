//! Solution types and the incumbent tracker.

use std::fmt;

use super::problem::ObjectiveSense;

/// Outcome of a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveStatus {
    /// Optimal solution found within tolerance.
    Optimal,
    /// No integer-feasible point exists (or the search proved none reachable).
    Infeasible,
    /// The objective can be improved without bound.
    Unbounded,
    /// Wall-clock limit or cancellation hit; best incumbent returned.
    TimeLimit,
    /// Node limit hit; best incumbent returned.
    IterationLimit,
    /// Internal failure; diagnostics are best-effort.
    Unknown,
}

impl SolveStatus {
    /// Small-integer wire encoding used by the foreign-function surface.
    pub fn code(self) -> i32 {
        match self {
            SolveStatus::Optimal => 2,
            SolveStatus::Infeasible => 3,
            SolveStatus::Unbounded => 4,
            SolveStatus::TimeLimit => 5,
            SolveStatus::IterationLimit => 6,
            SolveStatus::Unknown => 7,
        }
    }

    /// Whether the solution carries a usable assignment.
    pub fn has_solution(self) -> bool {
        matches!(
            self,
            SolveStatus::Optimal | SolveStatus::TimeLimit | SolveStatus::IterationLimit
        )
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "Optimal",
            SolveStatus::Infeasible => "Infeasible",
            SolveStatus::Unbounded => "Unbounded",
            SolveStatus::TimeLimit => "TimeLimit",
            SolveStatus::IterationLimit => "IterationLimit",
            SolveStatus::Unknown => "Unknown",
        };
        f.write_str(s)
    }
}

/// Result package returned by the branch-and-bound driver.
///
/// Immutable once returned; every attribute is exposed through a read-only
/// accessor.
#[derive(Debug, Clone)]
pub struct Solution {
    status: SolveStatus,
    values: Vec<f64>,
    objective_value: f64,
    iterations: u64,
    solve_time_seconds: f64,
    nodes_pruned: u64,
    incumbent_updates: u64,
}

impl Solution {
    pub(crate) fn new(
        status: SolveStatus,
        values: Vec<f64>,
        objective_value: f64,
        iterations: u64,
        solve_time_seconds: f64,
        nodes_pruned: u64,
        incumbent_updates: u64,
    ) -> Self {
        Self {
            status,
            values,
            objective_value,
            iterations,
            solve_time_seconds,
            nodes_pruned,
            incumbent_updates,
        }
    }

    /// Solve status.
    pub fn status(&self) -> SolveStatus {
        self.status
    }

    /// Variable values aligned to variable indices.
    ///
    /// All zeros when no incumbent was found.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Objective value of the returned assignment.
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    /// Branch-and-bound nodes processed.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Wall-clock time of the solve, in seconds.
    pub fn solve_time_seconds(&self) -> f64 {
        self.solve_time_seconds
    }

    /// Nodes discarded by infeasibility or bound pruning.
    pub fn nodes_pruned(&self) -> u64 {
        self.nodes_pruned
    }

    /// Number of times the incumbent improved.
    pub fn incumbent_updates(&self) -> u64 {
        self.incumbent_updates
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Status:    {}", self.status)?;
        if self.status.has_solution() {
            writeln!(f, "Objective: {}", self.objective_value)?;
        }
        writeln!(f, "Nodes:     {}", self.iterations)?;
        write!(f, "Time:      {:.3}s", self.solve_time_seconds)?;
        if self.status.has_solution() {
            writeln!(f)?;
            write!(f, "Nonzero variables:")?;
            for (i, &v) in self.values.iter().enumerate() {
                if v.abs() > 1e-9 {
                    write!(f, "\n  x{i} = {v}")?;
                }
            }
        }
        Ok(())
    }
}

/// Tracks the best integer-feasible solution found so far.
///
/// The objective starts at `+inf` for minimization and `-inf` for
/// maximization; the value vector starts at all zeros. Updates are accepted
/// only on strict improvement, so the incumbent objective never degrades
/// over the course of a solve.
#[derive(Debug, Clone)]
pub struct IncumbentTracker {
    sense: ObjectiveSense,
    values: Vec<f64>,
    objective: f64,
    update_count: u64,
    found: bool,
}

impl IncumbentTracker {
    /// Create a tracker for a problem with `num_vars` variables.
    pub fn new(sense: ObjectiveSense, num_vars: usize) -> Self {
        let objective = match sense {
            ObjectiveSense::Minimize => f64::INFINITY,
            ObjectiveSense::Maximize => f64::NEG_INFINITY,
        };
        Self {
            sense,
            values: vec![0.0; num_vars],
            objective,
            update_count: 0,
            found: false,
        }
    }

    /// Whether an incumbent has been recorded.
    pub fn has_incumbent(&self) -> bool {
        self.found
    }

    /// Current incumbent objective (`+/-inf` when none).
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Current incumbent values (all zeros when none).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of accepted updates.
    pub fn update_count(&self) -> u64 {
        self.update_count
    }

    /// Accept `x` as the new incumbent iff `obj` strictly improves.
    pub fn try_update(&mut self, x: &[f64], obj: f64) -> bool {
        let improved = match self.sense {
            ObjectiveSense::Minimize => obj < self.objective,
            ObjectiveSense::Maximize => obj > self.objective,
        };
        if improved {
            self.values.clear();
            self.values.extend_from_slice(x);
            self.objective = obj;
            self.update_count += 1;
            self.found = true;
        }
        improved
    }

    /// Whether a node with relaxation objective `lp_obj` cannot beat the
    /// incumbent by more than `tol`.
    pub fn can_prune(&self, lp_obj: f64, tol: f64) -> bool {
        match self.sense {
            ObjectiveSense::Minimize => lp_obj >= self.objective - tol,
            ObjectiveSense::Maximize => lp_obj <= self.objective + tol,
        }
    }
}
