use std::fmt;
use thiserror::Error;

/// Identifies which index was out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfBounds {
    /// A cell address outside of a `rows` x `cols` grid.
    Cell {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },
    /// A step index at or past the end of a chain holding `len` entries.
    Step { step: usize, len: usize },
}

impl fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            OutOfBounds::Cell { row, col, rows, cols } => write!(
                f,
                "cell ({}, {}) is outside of the {}x{} grid",
                row, col, rows, cols
            ),
            OutOfBounds::Step { step, len } => {
                write!(f, "step {} does not exist in a chain of length {}", step, len)
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum LpfError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Index out of bounds: {0}")]
    IndexOutOfBounds(OutOfBounds),

    #[error("Chain already holds its bounce budget of {budget} entries")]
    CapacityExceeded { budget: usize },

    #[error("Bounce budget mismatch: field uses {expected}, chain uses {found}")]
    BudgetMismatch { expected: usize, found: usize },

    #[error("{}", connectivity_message(.cell, .segment, .distance))]
    ConnectivityViolation {
        /// Cell of the offending chain, if the check ran at field level.
        cell: Option<(usize, usize)>,
        /// Segment `segment -> segment + 1` is disconnected.
        segment: usize,
        distance: f64,
    },

    #[error("Invalid field record: {0}")]
    InvalidRecord(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

fn connectivity_message(cell: &Option<(usize, usize)>, segment: &usize, distance: &f64) -> String {
    let (segment, distance) = (*segment, *distance);
    match *cell {
        Some((row, col)) => format!(
            "Connectivity violation in cell ({}, {}) at segment {}->{} (gap {:e})",
            row,
            col,
            segment,
            segment + 1,
            distance
        ),
        None => format!(
            "Connectivity violation at segment {}->{} (gap {:e})",
            segment,
            segment + 1,
            distance
        ),
    }
}

pub type LpfResult<T> = Result<T, LpfError>;
