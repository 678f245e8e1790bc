//! Error types for pragmatic reasoning.

use pragmatics_lexicon::LexiconError;
use pragmatics_prob::ProbError;
use thiserror::Error;

/// Errors that can occur while configuring or running a model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RsaError {
    /// A configuration value is out of range or inconsistent.
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A message has a negative production cost.
    #[error("Negative cost for message {index}: {value}")]
    NegativeCost { index: usize, value: f64 },

    /// Temperature must be strictly positive.
    #[error("Temperature must be positive, got {value}")]
    NonPositiveTemperature { value: f64 },

    /// No messages to reason about.
    #[error("Message list is empty")]
    EmptyMessages,

    /// No states to reason about.
    #[error("State list is empty")]
    EmptyStates,

    /// A lexicon does not have one row per message and one column per state.
    #[error("Lexicon {index} has shape {got:?}, expected {expected:?}")]
    LexiconShape {
        index: usize,
        expected: (usize, usize),
        got: (usize, usize),
    },

    /// A state with prior 0 cannot be described by any speaker.
    #[error("State {state} has prior probability 0, so no speaker describes it")]
    ZeroPriorState { state: usize },

    /// The lexicon stream produced nothing.
    #[error("Lexicon space is empty: no feasible lexicon to marginalize over")]
    EmptyLexiconSpace,

    /// The lexicon prior does not have one entry per streamed lexicon.
    #[error("Lexicon prior has {expected} entries but {got} lexica were streamed")]
    LexiconPriorLength { expected: usize, got: usize },

    /// A configuration file could not be read.
    #[error("Cannot read configuration {path}: {reason}")]
    ConfigRead { path: String, reason: String },

    /// JSON could not be parsed or written.
    #[error("JSON error: {reason}")]
    Json { reason: String },

    /// Numeric failure (zero row, bad prior).
    #[error(transparent)]
    Prob(#[from] ProbError),

    /// Lexicon space failure.
    #[error(transparent)]
    Lexicon(#[from] LexiconError),
}
