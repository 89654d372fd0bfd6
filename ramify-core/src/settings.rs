//! Configuration settings for the solver.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Solver settings.
#[derive(Debug, Clone)]
pub struct Settings {
    // === Termination ===
    /// Maximum number of branch-and-bound nodes to process.
    pub max_nodes: u64,

    /// Wall-clock limit in milliseconds (None = unlimited).
    pub time_limit_ms: Option<u64>,

    // === Tolerances ===
    /// Feasibility tolerance for constraint and bound checks.
    pub feas_tol: f64,

    /// Integrality tolerance: a value is integer if `|x - round(x)| <= int_tol`.
    pub int_tol: f64,

    /// Pruning tolerance when comparing a node bound against the incumbent.
    pub prune_tol: f64,

    // === Output ===
    /// Emit progress information through the `log` facade.
    pub verbose: bool,

    /// Log progress every N nodes.
    pub log_freq: u64,

    // === Cooperative cancellation ===
    /// Optional cancel flag, polled between nodes. When set, the search
    /// stops at the next node boundary and returns the current incumbent
    /// with a TimeLimit status.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            max_nodes: 1_000_000,
            time_limit_ms: None,
            feas_tol: 1e-9,
            int_tol: 1e-6,
            prune_tol: 1e-6,
            verbose: false,
            log_freq: 100,
            cancel: None,
        }
    }
}

impl Settings {
    /// Create settings with verbose output enabled.
    pub fn verbose() -> Self {
        Self {
            verbose: true,
            log_freq: 1,
            ..Self::default()
        }
    }

    /// Set the wall-clock limit in seconds.
    pub fn with_time_limit(mut self, seconds: f64) -> Self {
        self.time_limit_ms = Some((seconds * 1000.0) as u64);
        self
    }

    /// Set the node limit.
    pub fn with_max_nodes(mut self, nodes: u64) -> Self {
        self.max_nodes = nodes;
        self
    }

    /// Attach a shared cancel flag.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }
}
