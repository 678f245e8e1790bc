//! Marginalizing the pragmatic speaker over a space of lexica.

use std::collections::BTreeMap;

use pragmatics_lexicon::{Messages, NULL};
use pragmatics_prob::{Dist, Matrix};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::error::RsaError;
use crate::inference::best_inferences;
use crate::reasoner::{Reasoner, RsaMatrices};
use crate::report::ListenerReport;

/// Output of a lexical-uncertainty run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UncertaintyResult {
    pub messages: Vec<String>,
    pub states: Vec<String>,
    /// Listener after marginalization and any extra rounds, `[message, state]`.
    pub final_listener: Matrix,
    /// Speaker of the last extra round, `[state, message]`; absent when no
    /// extra rounds ran.
    pub final_speaker: Option<Matrix>,
    /// Number of lexica marginalized over.
    pub lexicon_count: usize,
}

impl UncertaintyResult {
    /// States tied for the most probable interpretation of each message.
    pub fn best_inferences(&self, digits: u32) -> Result<BTreeMap<String, Vec<(String, f64)>>, RsaError> {
        best_inferences(&self.final_listener, &self.messages, &self.states, digits)
    }

    /// Text table of the final listener.
    pub fn report(&self, digits: u32) -> ListenerReport<'_> {
        ListenerReport::new(self, digits)
    }

    /// The result as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, RsaError> {
        serde_json::to_string_pretty(self).map_err(|e| RsaError::Json {
            reason: e.to_string(),
        })
    }
}

/// A pragmatic listener uncertain about which lexicon the speaker uses.
///
/// The speaker is computed for every lexicon in the stream and accumulated,
/// weighted by the lexicon prior (or uniformly), then turned back into a
/// listener:
///
/// ```text
/// acc   = Σᵢ P(lexᵢ) · S(L0(lexᵢ))ᵀ
/// final = rownorm(acc ⊙ prior)
/// ```
///
/// # Example
///
/// ```rust
/// use pragmatics_prob::Matrix;
/// use pragmatics_rsa::{LexicalUncertaintyModel, ModelConfig};
///
/// let model = LexicalUncertaintyModel::new(
///     vec!["scored".into(), "aced".into(), "NULL".into()],
///     vec!["N".into(), "S".into(), "A".into()],
///     ModelConfig::default(),
/// ).unwrap();
///
/// let lexica = vec![
///     Matrix::new(vec![vec![0.0, 1.0, 1.0], vec![0.0, 0.0, 1.0], vec![1.0; 3]]).unwrap(),
///     Matrix::new(vec![vec![0.0, 1.0, 0.0], vec![0.0, 0.0, 1.0], vec![1.0; 3]]).unwrap(),
///     Matrix::new(vec![vec![0.0, 0.0, 1.0], vec![0.0, 0.0, 1.0], vec![1.0; 3]]).unwrap(),
/// ];
/// let result = model.run_matrices(lexica).unwrap();
/// assert_eq!(result.lexicon_count, 3);
/// assert!((result.final_listener.m[0][1] - 0.7054).abs() < 1e-4);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct LexicalUncertaintyModel {
    messages: Vec<String>,
    states: Vec<String>,
    reasoner: Reasoner,
    lexicon_prior: Option<Dist>,
    config: ModelConfig,
}

impl LexicalUncertaintyModel {
    /// A model with a flat state prior.
    ///
    /// Messages cost nothing, except a last message named `NULL`, which costs
    /// `config.null_cost`.
    pub fn new(
        messages: Vec<String>,
        states: Vec<String>,
        config: ModelConfig,
    ) -> Result<Self, RsaError> {
        if messages.is_empty() {
            return Err(RsaError::EmptyMessages);
        }
        if states.is_empty() {
            return Err(RsaError::EmptyStates);
        }
        config.validate()?;

        let mut costs = vec![0.0; messages.len()];
        if messages.last().map(String::as_str) == Some(NULL) {
            costs[messages.len() - 1] = config.null_cost;
        }
        let reasoner = Reasoner::new(Dist::uniform(states.len()), costs, config.temperature)?;

        Ok(Self {
            messages,
            states,
            reasoner,
            lexicon_prior: None,
            config,
        })
    }

    /// A model over an ordered message set, using each message's own cost.
    pub fn from_messages(
        messages: &Messages,
        states: Vec<String>,
        config: ModelConfig,
    ) -> Result<Self, RsaError> {
        let costs = messages.costs(config.null_cost);
        Self::new(messages.names(), states, config)?.with_costs(costs)
    }

    /// Replace the cost vector.
    pub fn with_costs(mut self, costs: Vec<f64>) -> Result<Self, RsaError> {
        if costs.len() != self.messages.len() {
            return Err(RsaError::InvalidConfig {
                reason: format!(
                    "{} costs for {} messages",
                    costs.len(),
                    self.messages.len()
                ),
            });
        }
        self.reasoner = Reasoner::new(
            self.reasoner.state_prior().clone(),
            costs,
            self.config.temperature,
        )?;
        Ok(self)
    }

    /// Replace the flat state prior.
    ///
    /// Every state needs positive prior mass: a run with a zero-prior state
    /// fails with [`RsaError::ZeroPriorState`].
    pub fn with_state_prior(mut self, prior: Dist) -> Result<Self, RsaError> {
        if prior.len() != self.states.len() {
            return Err(RsaError::InvalidConfig {
                reason: format!(
                    "state prior has {} entries for {} states",
                    prior.len(),
                    self.states.len()
                ),
            });
        }
        self.reasoner = Reasoner::new(
            prior,
            self.reasoner.costs().to_vec(),
            self.config.temperature,
        )?;
        Ok(self)
    }

    /// Weight lexica by `prior` instead of uniformly.
    ///
    /// The prior is indexed by position in the lexicon stream, so it must have
    /// exactly one entry per streamed lexicon.
    pub fn with_lexicon_prior(mut self, prior: Dist) -> Self {
        self.lexicon_prior = Some(prior);
        self
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    pub fn reasoner(&self) -> &Reasoner {
        &self.reasoner
    }

    /// Literal listener.
    pub fn l0(&self, lexicon: &Matrix) -> Result<Matrix, RsaError> {
        self.reasoner.l0(lexicon)
    }

    /// Pragmatic speaker.
    pub fn speaker(&self, listener: &Matrix) -> Result<Matrix, RsaError> {
        self.reasoner.speaker(listener)
    }

    /// Pragmatic listener.
    pub fn listener(&self, speaker: &Matrix) -> Result<Matrix, RsaError> {
        self.reasoner.listener(speaker)
    }

    /// Plain RSA on one lexicon.
    pub fn rsa(&self, lexicon: &Matrix) -> Result<RsaMatrices, RsaError> {
        self.check_lexicon(0, lexicon)?;
        self.reasoner.rsa(lexicon)
    }

    /// Marginalize over a stream of lexica, then run `extra_rounds` rounds.
    ///
    /// The stream is consumed once and never collected; any error it yields
    /// aborts the run.
    ///
    /// # Errors
    ///
    /// - A lexicon of the wrong shape or with a negative entry
    /// - A zero row in any normalization
    /// - An empty stream
    /// - A lexicon prior whose length differs from the number of lexica
    pub fn run<I, E>(&self, lexica: I) -> Result<UncertaintyResult, RsaError>
    where
        I: IntoIterator<Item = Result<Matrix, E>>,
        RsaError: From<E>,
    {
        let mut accumulator = Matrix::zeros(self.messages.len(), self.states.len());
        let mut count = 0usize;

        for (index, lexicon) in lexica.into_iter().enumerate() {
            let lexicon = lexicon?;
            self.check_lexicon(index, &lexicon)?;

            let weight = match &self.lexicon_prior {
                Some(prior) => prior.p.get(index).copied().ok_or(RsaError::LexiconPriorLength {
                    expected: prior.len(),
                    got: index + 1,
                })?,
                None => 1.0,
            };

            let speaker = self.speaker(&self.l0(&lexicon)?)?;
            accumulator.add_scaled(&speaker.transpose(), weight)?;
            count += 1;

            if self.config.progress_interval > 0 && count % self.config.progress_interval == 0 {
                debug!(lexica = count, "marginalizing");
            }
        }

        if count == 0 {
            return Err(RsaError::EmptyLexiconSpace);
        }
        match &self.lexicon_prior {
            Some(prior) if prior.len() != count => {
                return Err(RsaError::LexiconPriorLength {
                    expected: prior.len(),
                    got: count,
                });
            }
            Some(_) => {}
            None => accumulator = accumulator.map(|x| x / count as f64),
        }

        let mut listener = self.l0(&accumulator)?;
        let mut speaker = None;
        for _ in 0..self.config.extra_rounds {
            let s = self.speaker(&listener)?;
            listener = self.listener(&s)?;
            speaker = Some(s);
        }

        info!(
            lexica = count,
            extra_rounds = self.config.extra_rounds,
            "lexical uncertainty run complete"
        );

        Ok(UncertaintyResult {
            messages: self.messages.clone(),
            states: self.states.clone(),
            final_listener: listener,
            final_speaker: speaker,
            lexicon_count: count,
        })
    }

    /// [`run`](Self::run) over plain matrices.
    pub fn run_matrices<I>(&self, lexica: I) -> Result<UncertaintyResult, RsaError>
    where
        I: IntoIterator<Item = Matrix>,
    {
        self.run(lexica.into_iter().map(Ok::<Matrix, RsaError>))
    }

    fn check_lexicon(&self, index: usize, lexicon: &Matrix) -> Result<(), RsaError> {
        let expected = (self.messages.len(), self.states.len());
        if lexicon.shape() != expected {
            return Err(RsaError::LexiconShape {
                index,
                expected,
                got: lexicon.shape(),
            });
        }
        lexicon.check_non_negative()?;
        Ok(())
    }
}

/// Run the lexical-uncertainty model in one call.
///
/// `costs` defaults to zero with `config.null_cost` on a trailing `NULL`
/// message; `state_prior` defaults to flat; without `lexicon_prior` every
/// lexicon weighs the same.
pub fn run_uncertainty<I, E>(
    lexica: I,
    messages: Vec<String>,
    states: Vec<String>,
    costs: Option<Vec<f64>>,
    state_prior: Option<Dist>,
    lexicon_prior: Option<Dist>,
    config: ModelConfig,
) -> Result<UncertaintyResult, RsaError>
where
    I: IntoIterator<Item = Result<Matrix, E>>,
    RsaError: From<E>,
{
    let mut model = LexicalUncertaintyModel::new(messages, states, config)?;
    if let Some(costs) = costs {
        model = model.with_costs(costs)?;
    }
    if let Some(prior) = state_prior {
        model = model.with_state_prior(prior)?;
    }
    if let Some(prior) = lexicon_prior {
        model = model.with_lexicon_prior(prior);
    }
    model.run(lexica)
}
