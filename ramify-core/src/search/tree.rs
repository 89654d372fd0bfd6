//! Branch-and-bound driver.
//!
//! Depth-first search over a LIFO frontier of subproblems. Each node owns a
//! value-clone of the problem with tightened bounds; the input problem is
//! never mutated. A node is popped, its relaxation solved, and exactly one
//! of three things happens: the node is pruned (infeasible relaxation or
//! dominated bound), it updates the incumbent (integral relaxation), or it
//! is split into a down and an up child. The down child is pushed last so
//! it is explored first.
//!
//! Exploration order, branching choice, and the relaxation itself are all
//! deterministic, so two solves of the same problem return the same
//! solution.

use std::sync::atomic::Ordering;
use std::time::Instant;

use super::branching::select_branch_variable;
use super::node::SearchNode;
use crate::model::{IncumbentTracker, ObjectiveSense, Problem, Solution, SolveStatus};
use crate::relax::{LpSolver, LpStatus, RepairSolver};
use crate::settings::Settings;

/// Branch-and-bound solver over a pluggable LP relaxation backend.
pub struct BranchAndBound<S = RepairSolver> {
    settings: Settings,
    lp: S,
}

impl BranchAndBound<RepairSolver> {
    /// Create a driver using the reference repair solver for relaxations.
    pub fn new(settings: Settings) -> Self {
        let lp = RepairSolver::new(settings.feas_tol);
        Self { settings, lp }
    }
}

impl<S: LpSolver> BranchAndBound<S> {
    /// Create a driver with a substituted relaxation backend.
    pub fn with_solver(settings: Settings, lp: S) -> Self {
        Self { settings, lp }
    }

    /// Solve the problem, blocking until done or a limit is hit.
    pub fn solve(&self, problem: &Problem) -> Solution {
        let start = Instant::now();
        let sense = problem.sense();

        let mut incumbent = IncumbentTracker::new(sense, problem.num_variables());
        let mut stack = vec![SearchNode::root(problem.clone())];
        let mut nodes_processed: u64 = 0;
        let mut nodes_pruned: u64 = 0;
        let mut lp_failures: u64 = 0;
        let mut interrupted = false;

        while !stack.is_empty() && nodes_processed < self.settings.max_nodes {
            // Cancellation and the time limit are polled between nodes.
            if self.cancelled() || self.time_limit_exceeded(start) {
                interrupted = true;
                break;
            }
            let Some(node) = stack.pop() else { break };
            nodes_processed += 1;

            if self.settings.verbose && nodes_processed % self.settings.log_freq == 0 {
                log::info!(
                    "nodes: {} ({} open) | incumbent: {:.6e}",
                    nodes_processed,
                    stack.len(),
                    incumbent.objective(),
                );
            }

            let lp = match self.lp.solve_relaxation(&node.problem) {
                Ok(result) => result,
                Err(err) => {
                    // Relaxation failures are contained: drop the node and
                    // keep searching.
                    log::warn!("node {nodes_processed}: relaxation failed ({err}), pruning");
                    lp_failures += 1;
                    nodes_pruned += 1;
                    continue;
                }
            };

            match lp.status {
                LpStatus::Infeasible => {
                    log::debug!("node {nodes_processed}: relaxation infeasible, pruned");
                    nodes_pruned += 1;
                    continue;
                }
                LpStatus::Unbounded if sense == ObjectiveSense::Minimize => {
                    return Solution::new(
                        SolveStatus::Unbounded,
                        incumbent.values().to_vec(),
                        f64::NEG_INFINITY,
                        nodes_processed,
                        start.elapsed().as_secs_f64(),
                        nodes_pruned,
                        incumbent.update_count(),
                    );
                }
                // For maximization the search continues with the extreme
                // value the sentinel assignment produced.
                LpStatus::Unbounded | LpStatus::Optimal => {}
            }

            if incumbent.can_prune(lp.obj_val, self.settings.prune_tol) {
                log::debug!(
                    "node {nodes_processed}: bound {:.6e} dominated, pruned",
                    lp.obj_val
                );
                nodes_pruned += 1;
                continue;
            }

            if node.problem.is_integer_feasible(&lp.x, self.settings.int_tol) {
                let mut x = lp.x;
                node.problem.round_integers(&mut x);
                let obj = node.problem.evaluate_objective(&x);
                if incumbent.try_update(&x, obj) && self.settings.verbose {
                    log::info!("node {nodes_processed}: new incumbent, obj {obj:.6e}");
                }
                continue;
            }

            let Some(decision) = select_branch_variable(&lp.x, &node.problem, self.settings.int_tol)
            else {
                continue;
            };
            log::debug!(
                "node {nodes_processed}: branching on x{} = {}",
                decision.var,
                decision.value
            );
            // Up first, down second: the down child is explored first.
            stack.push(node.child(decision.up, lp.obj_val));
            stack.push(node.child(decision.down, lp.obj_val));
        }

        let status = if interrupted {
            SolveStatus::TimeLimit
        } else if !incumbent.has_incumbent() {
            if lp_failures > 0 {
                SolveStatus::Unknown
            } else {
                SolveStatus::Infeasible
            }
        } else if !stack.is_empty() {
            SolveStatus::IterationLimit
        } else {
            SolveStatus::Optimal
        };

        Solution::new(
            status,
            incumbent.values().to_vec(),
            incumbent.objective(),
            nodes_processed,
            start.elapsed().as_secs_f64(),
            nodes_pruned,
            incumbent.update_count(),
        )
    }

    fn cancelled(&self) -> bool {
        self.settings
            .cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    fn time_limit_exceeded(&self, start: Instant) -> bool {
        self.settings
            .time_limit_ms
            .is_some_and(|limit| start.elapsed().as_millis() as u64 >= limit)
    }
}
