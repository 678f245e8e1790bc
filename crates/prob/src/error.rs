//! Error types for probability operations.

use thiserror::Error;

/// Errors that can occur in probability computations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProbError {
    /// Distribution doesn't sum to 1.
    #[error("Distribution not normalized: sum = {sum} (expected 1.0)")]
    NotNormalized { sum: f64 },

    /// Negative probability encountered.
    #[error("Negative probability encountered at index {index}: {value}")]
    NegativeProbability { index: usize, value: f64 },

    /// All weights are zero (can't normalize).
    #[error("Cannot normalize: all weights are zero")]
    ZeroWeights,

    /// Empty distribution.
    #[error("Distribution cannot be empty")]
    EmptyDistribution,

    /// Empty matrix.
    #[error("Matrix cannot be empty")]
    EmptyMatrix,

    /// Rows have different lengths.
    #[error("Matrix has ragged rows (row {row} has {got} columns, expected {expected})")]
    RaggedMatrix {
        row: usize,
        expected: usize,
        got: usize,
    },

    /// A matrix entry is negative or not a number.
    #[error("Invalid matrix entry at ({row}, {col}): {value}")]
    InvalidEntry { row: usize, col: usize, value: f64 },

    /// A row has no mass, so it cannot be normalized.
    ///
    /// In a lexicon this means a message that is false everywhere.
    #[error("Cannot normalize row {row}: row sum is {sum}")]
    ZeroRow { row: usize, sum: f64 },

    /// Shape mismatch for elementwise operations or broadcasting.
    #[error("Shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: usize, got: usize },
}
