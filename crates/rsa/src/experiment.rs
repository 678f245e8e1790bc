//! Experiment configuration: a fragment, its messages and refinements, and
//! model hyperparameters, loadable from JSON.

use std::collections::BTreeMap;
use std::path::Path;

use pragmatics_lexicon::{
    enumerate_worlds, Determiner, Domain, Enumeration, Fragment, LexiconSpace, Message, Messages,
    Refinement,
};
use pragmatics_prob::Dist;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::error::RsaError;
use crate::model::{LexicalUncertaintyModel, UncertaintyResult};
use crate::reasoner::RsaMatrices;

/// A family of messages over the fragment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageSpec {
    /// `subj(player)(made(obj(shot)))` for every pair of determiners.
    DoubleQuantifier {
        subject_dets: Vec<Determiner>,
        object_dets: Vec<Determiner>,
    },
    /// `subject(predicate)` for every pair.
    SubjectPredicate {
        subjects: Vec<String>,
        predicates: Vec<String>,
    },
    /// Messages spelled out one by one.
    Explicit(Vec<Message>),
}

fn default_levels() -> Vec<u8> {
    vec![0, 1, 2]
}

fn default_increasing() -> bool {
    true
}

/// Everything needed to reproduce one model run.
///
/// ```rust
/// use pragmatics_rsa::ExperimentConfig;
///
/// let config = ExperimentConfig::from_json_str(r#"{
///     "players": ["a"],
///     "shots": ["s1", "s2"],
///     "messages": [{"subject_predicate": {"subjects": ["PlayerA"], "predicates": ["scored", "aced"]}}],
///     "refinements": {"scored": "unconstrained"}
/// }"#).unwrap();
///
/// let result = config.run().unwrap();
/// assert_eq!(result.lexicon_count, 3);
/// assert_eq!(result.states, vec!["N", "S", "A"]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperimentConfig {
    #[serde(default)]
    pub name: String,
    pub players: Vec<String>,
    pub shots: Vec<String>,
    /// Shot-count levels each player ranges over.
    #[serde(default = "default_levels")]
    pub levels: Vec<u8>,
    /// Keep only worlds whose counts never decrease across players.
    #[serde(default = "default_increasing")]
    pub increasing: bool,
    pub messages: Vec<MessageSpec>,
    #[serde(default)]
    pub refinements: BTreeMap<String, Refinement>,
    #[serde(default)]
    pub enumeration: Enumeration,
    /// State prior weights in world order, normalized on use; flat when absent.
    #[serde(default)]
    pub state_prior: Option<Vec<f64>>,
    #[serde(default)]
    pub model: ModelConfig,
}

impl ExperimentConfig {
    /// Parse a configuration from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, RsaError> {
        serde_json::from_str(json).map_err(|e| RsaError::Json {
            reason: e.to_string(),
        })
    }

    /// Read and parse a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, RsaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| RsaError::ConfigRead {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json_str(&text)
    }

    /// The domain and worlds.
    pub fn fragment(&self) -> Result<Fragment, RsaError> {
        let domain = Domain::new(self.players.clone(), self.shots.clone())?;
        let worlds = enumerate_worlds(&self.levels, self.players.len(), self.increasing);
        Ok(Fragment::new(domain, worlds)?)
    }

    /// The ordered message set, `NULL` last.
    pub fn messages(&self, fragment: &Fragment) -> Messages {
        let mut messages = Vec::new();
        for spec in &self.messages {
            match spec {
                MessageSpec::DoubleQuantifier {
                    subject_dets,
                    object_dets,
                } => messages.extend(fragment.double_quantifier_messages(subject_dets, object_dets)),
                MessageSpec::SubjectPredicate {
                    subjects,
                    predicates,
                } => {
                    let subjects: Vec<&str> = subjects.iter().map(String::as_str).collect();
                    let predicates: Vec<&str> = predicates.iter().map(String::as_str).collect();
                    messages.extend(fragment.subject_predicate_messages(&subjects, &predicates));
                }
                MessageSpec::Explicit(explicit) => messages.extend(explicit.iter().cloned()),
            }
        }
        Messages::new(messages)
    }

    /// The lexicon space over the fragment.
    pub fn space(&self, fragment: &Fragment) -> Result<LexiconSpace, RsaError> {
        Ok(LexiconSpace::new(
            fragment.base_lexicon(),
            &self.refinements,
            self.messages(fragment),
            fragment.worlds().len(),
        )?)
    }

    /// The reasoner, with message costs and the configured state prior.
    pub fn model(&self, fragment: &Fragment) -> Result<LexicalUncertaintyModel, RsaError> {
        let model = LexicalUncertaintyModel::from_messages(
            &self.messages(fragment),
            fragment.state_names(),
            self.model.clone(),
        )?;
        match &self.state_prior {
            Some(weights) => model.with_state_prior(Dist::from_weights(weights.clone())?),
            None => Ok(model),
        }
    }

    /// Marginalize over the lexicon space.
    pub fn run(&self) -> Result<UncertaintyResult, RsaError> {
        let fragment = self.fragment()?;
        let space = self.space(&fragment)?;
        let model = self.model(&fragment)?;

        info!(
            experiment = %self.name,
            worlds = fragment.worlds().len(),
            messages = space.messages().len(),
            lexica = space.size(),
            "running lexical uncertainty model"
        );

        let mut stream = space.stream(&self.enumeration);
        let result = model.run(stream.by_ref())?;
        debug!(
            feasible = stream.yielded(),
            rejected = stream.rejected(),
            "lexicon stream consumed"
        );
        Ok(result)
    }

    /// Plain RSA on the unrefined lexicon, for comparison.
    pub fn run_baseline(&self) -> Result<RsaMatrices, RsaError> {
        let fragment = self.fragment()?;
        let space = self.space(&fragment)?;
        let model = self.model(&fragment)?;
        model.rsa(&space.base_matrix()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pragmatics_lexicon::LexiconError;
    use pragmatics_prob::ProbError;

    const SCALAR: &str = r#"{
        "name": "scalar",
        "players": ["a"],
        "shots": ["s1", "s2"],
        "messages": [
            {"subject_predicate": {"subjects": ["PlayerA"], "predicates": ["scored", "aced"]}}
        ],
        "refinements": {"scored": "unconstrained"}
    }"#;

    #[test]
    fn test_defaults() {
        let config = ExperimentConfig::from_json_str(SCALAR).unwrap();
        assert_eq!(config.levels, vec![0, 1, 2]);
        assert!(config.increasing);
        assert_eq!(config.enumeration, Enumeration::Full);
        assert_eq!(config.model, ModelConfig::default());
    }

    #[test]
    fn test_scalar_run() {
        let result = ExperimentConfig::from_json_str(SCALAR).unwrap().run().unwrap();
        assert_eq!(
            result.messages,
            vec!["PlayerA(aced)", "PlayerA(scored)", "NULL"]
        );
        let scored = &result.final_listener.m[1];
        assert!((scored[1] - 0.7054).abs() < 1e-4);
        assert!((scored[2] - 0.2946).abs() < 1e-4);
    }

    #[test]
    fn test_baseline_is_unrefined() {
        let baseline = ExperimentConfig::from_json_str(SCALAR)
            .unwrap()
            .run_baseline()
            .unwrap();
        assert!((baseline.literal.m[1][1] - 0.5).abs() < 1e-12);
        assert!((baseline.listener.m[1][1] - 0.7494).abs() < 1e-4);
    }

    #[test]
    fn test_explicit_messages_and_costs() {
        let json = r#"{
            "players": ["a"],
            "shots": ["s1"],
            "levels": [0, 1],
            "messages": [
                {"explicit": [
                    {"formula": {"subject": {"lexical": "PlayerA"}, "predicate": {"intransitive": "scored"}}, "cost": 1.5}
                ]}
            ]
        }"#;
        let config = ExperimentConfig::from_json_str(json).unwrap();
        let fragment = config.fragment().unwrap();
        let model = config.model(&fragment).unwrap();
        assert_eq!(model.reasoner().costs(), &[1.5, 5.0]);
        assert_eq!(config.run().unwrap().lexicon_count, 1);
    }

    #[test]
    fn test_state_prior_length_checked() {
        let mut config = ExperimentConfig::from_json_str(SCALAR).unwrap();
        config.state_prior = Some(vec![0.5, 0.5]);
        assert!(matches!(config.run(), Err(RsaError::InvalidConfig { .. })));
    }

    #[test]
    fn test_state_prior_weights_are_normalized() {
        let mut config = ExperimentConfig::from_json_str(SCALAR).unwrap();
        config.state_prior = Some(vec![2.0, 1.0, 1.0]);
        let fragment = config.fragment().unwrap();
        let model = config.model(&fragment).unwrap();
        assert_eq!(model.reasoner().state_prior().p, vec![0.5, 0.25, 0.25]);

        config.state_prior = Some(vec![0.0, 0.0, 0.0]);
        assert!(matches!(
            config.run(),
            Err(RsaError::Prob(ProbError::ZeroWeights))
        ));
    }

    #[test]
    fn test_bad_worlds() {
        let mut config = ExperimentConfig::from_json_str(SCALAR).unwrap();
        config.levels = vec![0, 3];
        assert!(matches!(
            config.run(),
            Err(RsaError::Lexicon(LexiconError::InvalidWorld { .. }))
        ));
    }

    #[test]
    fn test_oversized_domain_fails_fast() {
        let mut config = ExperimentConfig::from_json_str(SCALAR).unwrap();
        config.shots = (0..30).map(|i| format!("s{}", i)).collect();
        assert!(matches!(
            config.run(),
            Err(RsaError::Lexicon(LexiconError::TooManyEntities { noun: "shot", .. }))
        ));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(
            ExperimentConfig::from_json_str("{"),
            Err(RsaError::Json { .. })
        ));
        assert!(matches!(
            ExperimentConfig::from_path("/nonexistent/experiment.json"),
            Err(RsaError::ConfigRead { .. })
        ));
    }
}
