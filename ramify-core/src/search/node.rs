//! Search node representation.

use crate::model::{ObjectiveSense, Problem};

/// A bound tightening produced by branching.
///
/// Applied by intersection with the parent's bounds, so a child's feasible
/// box is always a subset of its parent's.
#[derive(Debug, Clone, Copy)]
pub struct BoundChange {
    /// Variable index.
    pub var: usize,

    /// Requested lower bound (`-inf` for a down branch).
    pub lower: f64,

    /// Requested upper bound (`+inf` for an up branch).
    pub upper: f64,
}

impl BoundChange {
    /// Down branch: `x <= floor(value)`.
    pub fn down(var: usize, value: f64) -> Self {
        Self {
            var,
            lower: f64::NEG_INFINITY,
            upper: value.floor(),
        }
    }

    /// Up branch: `x >= ceil(value)`.
    pub fn up(var: usize, value: f64) -> Self {
        Self {
            var,
            lower: value.ceil(),
            upper: f64::INFINITY,
        }
    }

    /// Tighten the variable's bounds in `problem` by intersection.
    pub fn apply(&self, problem: &mut Problem) {
        problem.intersect_bounds(self.var, self.lower, self.upper);
    }
}

/// A node in the branch-and-bound tree.
///
/// Each node owns its subproblem outright; there are no back-references to
/// the parent, so nodes are independent once created.
#[derive(Debug, Clone)]
pub struct SearchNode {
    /// The subproblem with tightened bounds.
    pub problem: Problem,

    /// Relaxation objective inherited from the parent. The driver recomputes
    /// the bound at node entry; this field records where the node came from.
    pub bound: f64,

    /// Depth in the tree (0 for the root).
    pub depth: usize,
}

impl SearchNode {
    /// Create the root node.
    pub fn root(problem: Problem) -> Self {
        let bound = match problem.sense() {
            ObjectiveSense::Minimize => f64::NEG_INFINITY,
            ObjectiveSense::Maximize => f64::INFINITY,
        };
        Self {
            problem,
            bound,
            depth: 0,
        }
    }

    /// Create a child by cloning this node's problem and applying a bound
    /// change. `parent_obj` is the relaxation objective at this node.
    pub fn child(&self, change: BoundChange, parent_obj: f64) -> Self {
        let mut problem = self.problem.clone();
        change.apply(&mut problem);
        Self {
            problem,
            bound: parent_obj,
            depth: self.depth + 1,
        }
    }
}
