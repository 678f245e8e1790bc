//! Probability distributions over finite sets.

use serde::{Deserialize, Serialize};

use crate::error::ProbError;
use crate::PROB_TOLERANCE;

/// A probability distribution over a finite set {0, 1, ..., n-1}.
///
/// Used for the state prior and the lexicon prior.
///
/// Invariants:
/// - All probabilities are non-negative
/// - Probabilities sum to 1 (within tolerance)
///
/// # Example
///
/// ```rust
/// use pragmatics_prob::Dist;
///
/// // Flat prior over three states
/// let prior = Dist::uniform(3);
/// assert!((prior.p[0] - 1.0 / 3.0).abs() < 1e-12);
///
/// // Skewed prior
/// let skewed = Dist::new(vec![2.0 / 3.0, 1.0 / 3.0]).unwrap();
/// assert_eq!(skewed.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dist {
    /// Probability vector (sums to 1).
    pub p: Vec<f64>,
}

impl Dist {
    /// Create a new distribution from a probability vector.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The vector is empty
    /// - Any probability is negative
    /// - The probabilities don't sum to 1 (within tolerance)
    pub fn new(p: Vec<f64>) -> Result<Self, ProbError> {
        if p.is_empty() {
            return Err(ProbError::EmptyDistribution);
        }

        if let Some((index, &value)) = p
            .iter()
            .enumerate()
            .find(|(_, &x)| x < -PROB_TOLERANCE || x.is_nan())
        {
            return Err(ProbError::NegativeProbability { index, value });
        }

        let sum: f64 = p.iter().sum();
        if (sum - 1.0).abs() > PROB_TOLERANCE {
            return Err(ProbError::NotNormalized { sum });
        }

        Ok(Self { p })
    }

    /// Create a distribution from unnormalized weights.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pragmatics_prob::Dist;
    ///
    /// let d = Dist::from_weights(vec![1.0, 2.0, 3.0]).unwrap();
    /// assert!((d.p[2] - 0.5).abs() < 1e-12);
    /// ```
    pub fn from_weights(weights: Vec<f64>) -> Result<Self, ProbError> {
        if weights.is_empty() {
            return Err(ProbError::EmptyDistribution);
        }

        if let Some((index, &value)) = weights
            .iter()
            .enumerate()
            .find(|(_, &x)| x < 0.0 || x.is_nan())
        {
            return Err(ProbError::NegativeProbability { index, value });
        }

        let sum: f64 = weights.iter().sum();
        if sum <= 0.0 {
            return Err(ProbError::ZeroWeights);
        }

        Ok(Self {
            p: weights.iter().map(|w| w / sum).collect(),
        })
    }

    /// Create a uniform distribution over n elements.
    pub fn uniform(n: usize) -> Self {
        assert!(n > 0, "Cannot create uniform distribution over empty set");
        Self {
            p: vec![1.0 / n as f64; n],
        }
    }

    /// The number of outcomes in the sample space.
    pub fn len(&self) -> usize {
        self.p.len()
    }

    /// Check if the distribution is over an empty set (always false for valid Dist).
    pub fn is_empty(&self) -> bool {
        self.p.is_empty()
    }
}

/// Shannon entropy (natural log) of a probability vector.
///
/// `H(p) = -Σ p[i] * ln(p[i])`, skipping zero entries.
pub fn entropy(p: &[f64]) -> f64 {
    p.iter().filter(|&&x| x > 0.0).map(|&x| -x * x.ln()).sum()
}
