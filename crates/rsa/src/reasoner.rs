//! Literal listener, pragmatic speaker and pragmatic listener for one lexicon.
//!
//! ```text
//! L0(lex)  = rownorm(lex ⊙ prior)                            [message, state]
//! S(lis)   = rownorm(exp(λ · (ln lisᵀ − cost)))              [state, message]
//! L(spk)   = L0(spkᵀ)                                        [message, state]
//! ```

use pragmatics_prob::{Dist, Matrix, ProbError};
use serde::Serialize;

use crate::error::RsaError;

/// The three matrices of one round of reasoning.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RsaMatrices {
    pub literal: Matrix,
    pub speaker: Matrix,
    pub listener: Matrix,
}

/// Speaker and listener operators for fixed costs, state prior and temperature.
#[derive(Debug, Clone, PartialEq)]
pub struct Reasoner {
    state_prior: Dist,
    costs: Vec<f64>,
    temperature: f64,
}

impl Reasoner {
    /// Create a reasoner over `costs.len()` messages and `state_prior.len()` states.
    ///
    /// # Errors
    ///
    /// Fails on an empty cost vector, a negative or non-finite cost, or a
    /// temperature that is not strictly positive.
    pub fn new(state_prior: Dist, costs: Vec<f64>, temperature: f64) -> Result<Self, RsaError> {
        if costs.is_empty() {
            return Err(RsaError::EmptyMessages);
        }
        if state_prior.is_empty() {
            return Err(RsaError::EmptyStates);
        }
        if let Some((index, &value)) = costs
            .iter()
            .enumerate()
            .find(|(_, c)| !(c.is_finite() && **c >= 0.0))
        {
            return Err(RsaError::NegativeCost { index, value });
        }
        if !(temperature.is_finite() && temperature > 0.0) {
            return Err(RsaError::NonPositiveTemperature { value: temperature });
        }
        Ok(Self {
            state_prior,
            costs,
            temperature,
        })
    }

    pub fn n_messages(&self) -> usize {
        self.costs.len()
    }

    pub fn n_states(&self) -> usize {
        self.state_prior.len()
    }

    pub fn state_prior(&self) -> &Dist {
        &self.state_prior
    }

    pub fn costs(&self) -> &[f64] {
        &self.costs
    }

    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Literal listener: condition the prior on each message's truth set.
    pub fn l0(&self, lexicon: &Matrix) -> Result<Matrix, RsaError> {
        Ok(lexicon.scale_columns(&self.state_prior.p)?.rownorm()?)
    }

    /// Pragmatic speaker: soft-max of informativity minus cost, per state.
    ///
    /// Each row is shifted by its largest utility before exponentiating, which
    /// leaves the normalized result unchanged and keeps large costs from
    /// underflowing to an all-zero row.
    ///
    /// # Errors
    ///
    /// A state with prior 0 gets no mass from any listener, so it has no
    /// speaker distribution; this is reported as [`RsaError::ZeroPriorState`].
    pub fn speaker(&self, listener: &Matrix) -> Result<Matrix, RsaError> {
        if listener.n_rows != self.costs.len() {
            return Err(ProbError::ShapeMismatch {
                expected: self.costs.len(),
                got: listener.n_rows,
            }
            .into());
        }

        let utility = listener
            .transpose()
            .safe_ln()
            .map_indexed(|_, j, x| self.temperature * (x - self.costs[j]));
        let mut shifts = Vec::with_capacity(utility.n_rows);
        for (state, row) in utility.m.iter().enumerate() {
            let max = row.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if max.is_finite() {
                shifts.push(max);
            } else if self.state_prior.p.get(state) == Some(&0.0) {
                return Err(RsaError::ZeroPriorState { state });
            } else {
                shifts.push(0.0);
            }
        }

        Ok(utility
            .map_indexed(|i, _, u| (u - shifts[i]).exp())
            .rownorm()?)
    }

    /// Pragmatic listener: a literal listener over the speaker's choices.
    pub fn listener(&self, speaker: &Matrix) -> Result<Matrix, RsaError> {
        self.l0(&speaker.transpose())
    }

    /// One round of reasoning on a single lexicon.
    pub fn rsa(&self, lexicon: &Matrix) -> Result<RsaMatrices, RsaError> {
        let literal = self.l0(lexicon)?;
        let speaker = self.speaker(&literal)?;
        let listener = self.listener(&speaker)?;
        Ok(RsaMatrices {
            literal,
            speaker,
            listener,
        })
    }
}

/// Plain RSA on one lexicon, with no lexical uncertainty.
///
/// # Example
///
/// ```rust
/// use pragmatics_prob::{Dist, Matrix};
/// use pragmatics_rsa::run_single_lexicon_rsa;
///
/// // Rows: "some", "all", NULL; states: none, some-not-all, all
/// let lexicon = Matrix::new(vec![
///     vec![0.0, 1.0, 1.0],
///     vec![0.0, 0.0, 1.0],
///     vec![1.0, 1.0, 1.0],
/// ]).unwrap();
///
/// let rsa = run_single_lexicon_rsa(&lexicon, &Dist::uniform(3), &[0.0, 0.0, 5.0], 1.0).unwrap();
/// // The pragmatic listener hears "some" as "some but not all"
/// assert!(rsa.listener.m[0][1] > rsa.listener.m[0][2]);
/// ```
pub fn run_single_lexicon_rsa(
    lexicon: &Matrix,
    state_prior: &Dist,
    costs: &[f64],
    temperature: f64,
) -> Result<RsaMatrices, RsaError> {
    Reasoner::new(state_prior.clone(), costs.to_vec(), temperature)?.rsa(lexicon)
}
