//! # Basketball Experiment
//!
//! The two-player double-quantifier experiment run end to end:
//! - Configuration loaded from JSON (string and file)
//! - Lexicon space streamed through the uncertainty model
//! - Best inferences and the text report

use pragmatics_lexicon::Enumeration;
use pragmatics_rsa::{ExperimentConfig, RsaError};

const CONFIG: &str = r#"{
    "name": "two-player double quantifiers",
    "players": ["a", "b"],
    "shots": ["s1", "s2"],
    "levels": [0, 1, 2],
    "increasing": true,
    "messages": [
        {"double_quantifier": {
            "subject_dets": ["every", "some", "exactly_one", "no"],
            "object_dets": ["every", "some", "no"]
        }}
    ],
    "refinements": {
        "some(player)": "unconstrained",
        "some(shot)": "unconstrained"
    },
    "model": {"null_cost": 5.0, "temperature": 1.0}
}"#;

fn config() -> ExperimentConfig {
    ExperimentConfig::from_json_str(CONFIG).unwrap()
}

fn row<'a>(result: &'a pragmatics_rsa::UncertaintyResult, message: &str) -> &'a [f64] {
    let i = result
        .messages
        .iter()
        .position(|m| m == message)
        .unwrap();
    &result.final_listener.m[i]
}

// ============================================================================
// Full enumeration
// ============================================================================

#[test]
fn test_lexicon_count() {
    let config = config();
    let fragment = config.fragment().unwrap();
    let space = config.space(&fragment).unwrap();
    // 7 refinements of each refinable quantifier
    assert_eq!(space.size(), 49);

    let result = config.run().unwrap();
    assert_eq!(result.lexicon_count, 30);
    assert_eq!(result.messages.len(), 13);
    assert_eq!(result.states, vec!["NN", "NS", "NA", "SS", "SA", "AA"]);
    assert!(result.final_listener.is_row_stochastic(1e-9));
}

#[test]
fn test_listener_values() {
    let result = config().run().unwrap();

    let every_some = row(&result, "every(player)(made(some(shot)))");
    assert!((every_some[3] - 0.5329).abs() < 1e-4);
    assert!((every_some[4] - 0.1459).abs() < 1e-4);
    assert!((every_some[5] - 0.3212).abs() < 1e-4);

    let some_some = row(&result, "some(player)(made(some(shot)))");
    assert_eq!(some_some[0], 0.0);
    assert!((some_some[4] - 0.2801).abs() < 1e-4);
}

#[test]
fn test_best_inferences() {
    let best = config().run().unwrap().best_inferences(4).unwrap();
    assert_eq!(best.len(), 13);
    let state = |message: &str| best[message][0].0.clone();

    // "every player made some of their shots" is heard as "not all of them"
    assert_eq!(state("every(player)(made(some(shot)))"), "SS");
    assert_eq!(state("some(player)(made(some(shot)))"), "SA");
    assert_eq!(state("exactly_one(player)(made(every(shot)))"), "SA");
    assert_eq!(state("every(player)(made(every(shot)))"), "AA");
    assert_eq!(best["every(player)(made(every(shot)))"][0].1, 1.0);
}

#[test]
fn test_report_mentions_every_message() {
    let result = config().run().unwrap();
    let text = result.report(3).to_string();
    assert!(text.starts_with("Lexica: 30\n"));
    for message in &result.messages {
        assert!(text.contains(message.as_str()));
    }
}

// ============================================================================
// Sampling and loading
// ============================================================================

#[test]
fn test_sampled_run_is_reproducible() {
    let mut config = config();
    config.enumeration = Enumeration::Sample { count: 20, seed: 42 };
    let first = config.run().unwrap();
    let second = config.run().unwrap();
    assert_eq!(first, second);
    assert!(first.lexicon_count <= 20);
    assert!(first.final_listener.is_row_stochastic(1e-9));
}

#[test]
fn test_sample_covering_space_matches_full_run() {
    let full = config().run().unwrap();
    let mut config = config();
    config.enumeration = Enumeration::Sample { count: 1000, seed: 3 };
    let sampled = config.run().unwrap();
    assert_eq!(sampled.lexicon_count, full.lexicon_count);
    assert!(sampled.final_listener.approx_eq(&full.final_listener, 1e-9));
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join("pragmatics-rsa-basketball.json");
    std::fs::write(&path, CONFIG).unwrap();
    let loaded = ExperimentConfig::from_path(&path).unwrap();
    std::fs::remove_file(&path).ok();
    assert_eq!(loaded, config());
}

#[test]
fn test_unknown_refinable_word() {
    let mut config = config();
    config
        .refinements
        .insert("most(player)".into(), pragmatics_lexicon::Refinement::Unconstrained);
    assert!(matches!(config.run(), Err(RsaError::Lexicon(_))));
}
