//! Crate-wide error type.

use thiserror::Error;

/// Errors produced while building or solving a TSP instance.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TspError {
    #[error("Expected {expected} cities, got {actual}")]
    InputSizeMismatch { expected: usize, actual: usize },

    #[error("City {index} has a non-finite coordinate ({x}, {y})")]
    DegenerateCoordinate { index: usize, x: f64, y: f64 },

    #[error("Invalid distance matrix: {0}")]
    InvalidDistanceMatrix(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "No valid tour after {iterations} annealing iterations (final temperature {final_temperature})"
    )]
    NonConvergence {
        iterations: usize,
        final_temperature: f64,
    },

    #[error("Annealing cancelled after {iterations} iterations")]
    Cancelled { iterations: usize },

    #[error(
        "Grid does not encode a tour (rows {invalid_rows:?}, columns {invalid_columns:?} are not one-hot)"
    )]
    DegenerateQuery {
        invalid_rows: Vec<usize>,
        invalid_columns: Vec<usize>,
    },
}
