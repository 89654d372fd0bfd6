//! Branch-and-bound search.

mod branching;
mod node;
mod tree;

pub use branching::{select_branch_variable, BranchDecision};
pub use node::{BoundChange, SearchNode};
pub use tree::BranchAndBound;
