//! # Lexicon - Lexicon Spaces for Lexical Uncertainty
//!
//! Generates the space of lexica a pragmatic listener is uncertain about.
//!
//! ## Core Concepts
//!
//! - **Typed denotations**: every word of the quantifier fragment denotes a
//!   noun, quantifier, predicate or relation, each given by a characteristic set
//! - **Refinement**: a refinable word may mean any non-empty subset of its
//!   characteristic set, or one of a list of named alternatives
//! - **Lexicon space**: the Cartesian product of per-word candidates, walked
//!   lazily and rendered into message × state truth matrices
//! - **Feasibility**: a matrix with a message true in no state is skipped
//!
//! ## Example: Refining a Scalar Term
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use pragmatics_lexicon::{enumerate_worlds, Domain, Fragment, LexiconSpace, Messages, Refinement};
//!
//! // One player, two shots: worlds N, S, A
//! let domain = Domain::new(vec!["a".into()], vec!["s1".into(), "s2".into()]).unwrap();
//! let fragment = Fragment::new(domain, enumerate_worlds(&[0, 1, 2], 1, false)).unwrap();
//! let messages = Messages::new(
//!     fragment.subject_predicate_messages(&["PlayerA"], &["scored", "aced"]),
//! );
//! let refinements = BTreeMap::from([("scored".to_string(), Refinement::Unconstrained)]);
//!
//! let space = LexiconSpace::new(fragment.base_lexicon(), &refinements, messages, 3).unwrap();
//! assert_eq!(space.size(), 3);
//! // Rows: PlayerA(aced), PlayerA(scored), NULL
//! assert_eq!(space.base_matrix().unwrap().m[1], vec![0.0, 1.0, 1.0]);
//! ```

mod domain;
mod error;
mod fragment;
mod message;
mod refine;
mod semantics;
mod space;

pub use domain::{enumerate_worlds, Domain, EntitySet, World, MAX_ENTITIES, MAX_NOUN_ENTITIES};
pub use error::LexiconError;
pub use fragment::{proper_name, quantifier_word, Fragment, PLAYER, SHOT};
pub use message::{Message, Messages, NULL};
pub use refine::{enumerate_denotations, powerset, Refinement, MAX_REFINEMENT_ATOMS};
pub use semantics::{
    Denotation, Determiner, Environment, Formula, Lexicon, Quantifier, Subject, VerbPhrase,
};
pub use space::{
    build_lexicon_space, filter_feasible, render_matrix, Assignment, Assignments, Enumeration,
    LexiconSpace, Matrices,
};
