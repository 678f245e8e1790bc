//! Dense real matrices with the normalizations used by speaker/listener recursion.

use serde::{Deserialize, Serialize};

use crate::dist::entropy;
use crate::error::ProbError;
use crate::MAX_DIGITS;

/// A dense `n_rows × n_cols` matrix of reals.
///
/// Lexica, listeners and speakers are all matrices of this shape:
/// - A lexicon is indexed `[message][state]` with 0/1 (or near-boolean) entries
/// - A listener is a lexicon-shaped matrix whose rows are distributions over states
/// - A speaker is indexed `[state][message]` with rows that are distributions over messages
///
/// # Example
///
/// ```rust
/// use pragmatics_prob::Matrix;
///
/// let lex = Matrix::new(vec![
///     vec![0.0, 1.0, 1.0],  // "scored"
///     vec![1.0, 1.0, 1.0],  // NULL
/// ]).unwrap();
///
/// let listener = lex.rownorm().unwrap();
/// assert!((listener.m[0][1] - 0.5).abs() < 1e-12);
/// assert!(listener.is_row_stochastic(1e-9));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    /// Row-major entries: `m[i][j]` is row i, column j.
    pub m: Vec<Vec<f64>>,
    /// Number of rows.
    pub n_rows: usize,
    /// Number of columns.
    pub n_cols: usize,
}

impl Matrix {
    /// Create a matrix from rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is empty or rows have different lengths.
    pub fn new(m: Vec<Vec<f64>>) -> Result<Self, ProbError> {
        if m.is_empty() || m[0].is_empty() {
            return Err(ProbError::EmptyMatrix);
        }

        let n_rows = m.len();
        let n_cols = m[0].len();

        for (row, values) in m.iter().enumerate() {
            if values.len() != n_cols {
                return Err(ProbError::RaggedMatrix {
                    row,
                    expected: n_cols,
                    got: values.len(),
                });
            }
        }

        Ok(Self { m, n_rows, n_cols })
    }

    /// A matrix filled with zeros.
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self::filled(n_rows, n_cols, 0.0)
    }

    /// A matrix with every entry equal to `value`.
    pub fn filled(n_rows: usize, n_cols: usize, value: f64) -> Self {
        Self {
            m: vec![vec![value; n_cols]; n_rows],
            n_rows,
            n_cols,
        }
    }

    /// Shape as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows, self.n_cols)
    }

    /// Check that every entry is finite and non-negative.
    pub fn check_non_negative(&self) -> Result<(), ProbError> {
        for (row, values) in self.m.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if !(value >= 0.0) || value.is_infinite() {
                    return Err(ProbError::InvalidEntry { row, col, value });
                }
            }
        }
        Ok(())
    }

    /// Transpose: `tᵀ[j][i] = m[i][j]`.
    pub fn transpose(&self) -> Matrix {
        let m = (0..self.n_cols)
            .map(|j| (0..self.n_rows).map(|i| self.m[i][j]).collect())
            .collect();
        Matrix {
            m,
            n_rows: self.n_cols,
            n_cols: self.n_rows,
        }
    }

    /// Sum of each row.
    pub fn row_sums(&self) -> Vec<f64> {
        self.m.iter().map(|row| row.iter().sum()).collect()
    }

    /// Row normalization: divide every row by its sum.
    ///
    /// # Errors
    ///
    /// A row whose sum is zero (or not a number) has no conditional
    /// distribution, and is reported as [`ProbError::ZeroRow`]. No smoothing
    /// is applied.
    pub fn rownorm(&self) -> Result<Matrix, ProbError> {
        let mut m = Vec::with_capacity(self.n_rows);
        for (row, values) in self.m.iter().enumerate() {
            let sum: f64 = values.iter().sum();
            if !(sum > 0.0) || sum.is_infinite() {
                return Err(ProbError::ZeroRow { row, sum });
            }
            m.push(values.iter().map(|x| x / sum).collect());
        }
        Ok(Matrix {
            m,
            n_rows: self.n_rows,
            n_cols: self.n_cols,
        })
    }

    /// Multiply column j by `weights[j]` (broadcast across rows).
    pub fn scale_columns(&self, weights: &[f64]) -> Result<Matrix, ProbError> {
        if weights.len() != self.n_cols {
            return Err(ProbError::ShapeMismatch {
                expected: self.n_cols,
                got: weights.len(),
            });
        }
        Ok(self.map_indexed(|_, j, x| x * weights[j]))
    }

    /// Natural log of every entry, with `ln(0) = -∞`.
    ///
    /// Never panics and never produces NaN for non-negative input; the
    /// `-∞` entries become exact zeros again after exponentiation.
    pub fn safe_ln(&self) -> Matrix {
        self.map(safe_ln)
    }

    /// Apply `f` to every entry.
    pub fn map<F>(&self, f: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        self.map_indexed(|_, _, x| f(x))
    }

    /// Apply `f(row, col, value)` to every entry.
    pub fn map_indexed<F>(&self, f: F) -> Matrix
    where
        F: Fn(usize, usize, f64) -> f64,
    {
        let m = self
            .m
            .iter()
            .enumerate()
            .map(|(i, row)| row.iter().enumerate().map(|(j, &x)| f(i, j, x)).collect())
            .collect();
        Matrix {
            m,
            n_rows: self.n_rows,
            n_cols: self.n_cols,
        }
    }

    /// In-place `self += weight * other`.
    pub fn add_scaled(&mut self, other: &Matrix, weight: f64) -> Result<(), ProbError> {
        self.check_same_shape(other)?;
        for (row, other_row) in self.m.iter_mut().zip(other.m.iter()) {
            for (x, y) in row.iter_mut().zip(other_row.iter()) {
                *x += weight * y;
            }
        }
        Ok(())
    }

    /// Shannon entropy (nats) of each row.
    pub fn row_entropies(&self) -> Vec<f64> {
        self.m.iter().map(|row| entropy(row)).collect()
    }

    /// Round every entry to `digits` decimal places.
    pub fn rounded(&self, digits: u32) -> Matrix {
        self.map(|x| round_to(x, digits))
    }

    /// Check that every row sums to 1 within `tolerance`.
    pub fn is_row_stochastic(&self, tolerance: f64) -> bool {
        self.row_sums()
            .iter()
            .all(|sum| (sum - 1.0).abs() <= tolerance)
    }

    /// Entrywise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Matrix, tolerance: f64) -> bool {
        self.shape() == other.shape()
            && self
                .m
                .iter()
                .flatten()
                .zip(other.m.iter().flatten())
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    fn check_same_shape(&self, other: &Matrix) -> Result<(), ProbError> {
        if self.n_rows != other.n_rows {
            return Err(ProbError::ShapeMismatch {
                expected: self.n_rows,
                got: other.n_rows,
            });
        }
        if self.n_cols != other.n_cols {
            return Err(ProbError::ShapeMismatch {
                expected: self.n_cols,
                got: other.n_cols,
            });
        }
        Ok(())
    }
}

/// Natural log with `ln(0) = -∞` (and the same for negative zero).
pub fn safe_ln(x: f64) -> f64 {
    if x <= 0.0 {
        f64::NEG_INFINITY
    } else {
        x.ln()
    }
}

/// Round half away from zero to `digits` decimal places.
///
/// `digits` above [`MAX_DIGITS`] is treated as [`MAX_DIGITS`]; an `f64` carries
/// no more decimal precision than that, and larger scales overflow.
pub fn round_to(x: f64, digits: u32) -> f64 {
    let scale = 10f64.powi(digits.min(MAX_DIGITS) as i32);
    (x * scale).round() / scale
}
