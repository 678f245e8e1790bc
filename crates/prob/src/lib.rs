//! # Prob - Distributions and Normalized Matrices
//!
//! Numeric substrate for iterated speaker/listener reasoning.
//!
//! ## Core Concepts
//!
//! - **Distributions**: priors over states and over lexica are [`Dist`] values
//! - **Row normalization is conditioning**: `rownorm(M)[i,j]` = P(j | i)
//! - **Transposition swaps perspective**: a listener `[message, state]` becomes
//!   the input of a speaker `[state, message]`
//! - **Safe logs**: `ln(0) = -∞`, and `exp(-∞) = 0` recovers exact zeros
//!
//! ## Example: Literal Listener
//!
//! ```rust
//! use pragmatics_prob::{Dist, Matrix};
//!
//! // Messages: "scored", "aced"; states: none, some, all
//! let lexicon = Matrix::new(vec![
//!     vec![0.0, 1.0, 1.0],
//!     vec![0.0, 0.0, 1.0],
//! ]).unwrap();
//! let prior = Dist::uniform(3);
//!
//! let literal = lexicon.scale_columns(&prior.p).unwrap().rownorm().unwrap();
//! assert!((literal.m[0][1] - 0.5).abs() < 1e-12);
//! assert!((literal.m[1][2] - 1.0).abs() < 1e-12);
//! ```

mod dist;
mod error;
mod matrix;

pub use dist::{entropy, Dist};
pub use error::ProbError;
pub use matrix::{round_to, safe_ln, Matrix};

/// Tolerance for checking that a probability vector sums to 1.
pub const PROB_TOLERANCE: f64 = 1e-6;

/// Most decimal places worth rounding an `f64` to.
pub const MAX_DIGITS: u32 = 15;
