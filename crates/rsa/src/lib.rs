//! # RSA - Pragmatic Reasoning Under Lexical Uncertainty
//!
//! Rational Speech Act listeners and speakers, marginalized over a space of
//! possible lexica.
//!
//! ## Core Concepts
//!
//! - **Literal listener** `L0`: conditions the state prior on literal truth
//! - **Speaker** `S`: chooses messages by informativity minus cost
//! - **Pragmatic listener** `L`: inverts the speaker by Bayes' rule
//! - **Lexical uncertainty**: the listener averages the speaker over every
//!   refinement of the lexicon before inverting it, which is what lets
//!   "some" come to mean "some but not all" even when nothing forces it
//!
//! ## Example: Scalar Implicature
//!
//! ```rust
//! use pragmatics_rsa::ExperimentConfig;
//!
//! let config = ExperimentConfig::from_json_str(r#"{
//!     "players": ["a"],
//!     "shots": ["s1", "s2"],
//!     "messages": [{"subject_predicate": {"subjects": ["PlayerA"], "predicates": ["scored", "aced"]}}],
//!     "refinements": {"scored": "unconstrained"}
//! }"#).unwrap();
//!
//! let result = config.run().unwrap();
//! let best = result.best_inferences(4).unwrap();
//!
//! // "A scored" is heard as "A made some but not all shots"
//! assert_eq!(best["PlayerA(scored)"][0].0, "S");
//! ```

mod config;
mod error;
mod experiment;
mod inference;
mod model;
mod reasoner;
mod report;

pub use config::ModelConfig;
pub use error::RsaError;
pub use experiment::{ExperimentConfig, MessageSpec};
pub use inference::best_inferences;
pub use model::{run_uncertainty, LexicalUncertaintyModel, UncertaintyResult};
pub use reasoner::{run_single_lexicon_rsa, Reasoner, RsaMatrices};
pub use report::ListenerReport;
