//! Error types for lexicon space generation.

use pragmatics_prob::ProbError;
use thiserror::Error;

/// Errors that can occur while building or evaluating a lexicon space.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexiconError {
    /// Word not found in the lexicon.
    #[error("Unknown word: '{word}'")]
    UnknownWord { word: String },

    /// A word was used with the wrong kind of denotation.
    #[error("Word '{word}' has a {got} denotation, expected {expected}")]
    WrongKind {
        word: String,
        expected: &'static str,
        got: &'static str,
    },

    /// A refinable word has too many atoms to enumerate its powerset.
    #[error("Word '{word}' has {atoms} atoms; refinement is limited to {max}")]
    RefinementTooLarge {
        word: String,
        atoms: usize,
        max: usize,
    },

    /// A refinable word has an empty characteristic set.
    #[error("Word '{word}' has an empty characteristic set and cannot be refined")]
    EmptyRefinement { word: String },

    /// Too many players or shots to enumerate quantifier denotations.
    #[error("Domain has {got} entities of kind '{noun}'; at most {max} are supported")]
    TooManyEntities {
        noun: &'static str,
        got: usize,
        max: usize,
    },

    /// An entity name appears twice in the domain.
    #[error("Duplicate entity name: '{name}'")]
    DuplicateEntity { name: String },

    /// A world does not fit the domain.
    #[error("Invalid world {world}: {reason}")]
    InvalidWorld { world: String, reason: String },

    /// No worlds to evaluate messages against.
    #[error("World list is empty")]
    NoWorlds,

    /// Matrix construction failed.
    #[error(transparent)]
    Prob(#[from] ProbError),
}
