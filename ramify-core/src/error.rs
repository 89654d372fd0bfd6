//! Error types for the MILP solver.

use thiserror::Error;

/// Errors surfaced by the problem model, the MPS parser, and the solver.
///
/// Algorithmic outcomes (infeasible, unbounded, limits) are never errors;
/// they are reported as [`SolveStatus`](crate::SolveStatus) values on the
/// returned solution.
#[derive(Error, Debug)]
pub enum MilpError {
    /// Variable or constraint index out of range. Caller bug.
    #[error("{kind} index {index} out of range (have {len})")]
    InvalidIndex {
        /// What the index refers to ("variable" or "constraint").
        kind: &'static str,
        /// The offending index.
        index: usize,
        /// Current number of entries.
        len: usize,
    },

    /// NaN or otherwise structurally impossible input.
    #[error("invalid value: {0}")]
    InvalidValue(String),

    /// MPS parse failure with the 1-based source line.
    #[error("syntax error at line {line}: {message}")]
    Syntax {
        /// 1-based line number in the input stream.
        line: usize,
        /// What went wrong.
        message: String,
    },

    /// COLUMNS or RHS entry referencing a row that was never declared.
    #[error("unknown row '{row}' at line {line}")]
    UnknownRow {
        /// The undeclared row name.
        row: String,
        /// 1-based line number in the input stream.
        line: usize,
    },

    /// MPS section or directive the parser does not implement.
    #[error("unsupported MPS feature: {0}")]
    Unsupported(String),

    /// Internal solver error (non-finite arithmetic during repair).
    #[error("internal error: {0}")]
    Internal(String),

    /// I/O failure while reading an MPS stream.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for MILP operations.
pub type MilpResult<T> = Result<T, MilpError>;
