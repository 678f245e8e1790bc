//! Basketball Experiment
//!
//! Run with: cargo run -p pragmatics-rsa --example basketball [config.json]
//!
//! This example demonstrates:
//! - Loading an experiment from JSON (or using the built-in three-player setup)
//! - Literal semantics vs plain RSA vs lexical uncertainty
//! - Best inferences for every double-quantifier message
//!
//! Set RUST_LOG=debug for lexicon stream progress.

use pragmatics_rsa::{ExperimentConfig, RsaError};
use tracing_subscriber::{fmt, EnvFilter};

const DEFAULT_CONFIG: &str = r#"{
    "name": "three players, some refinable",
    "players": ["a", "b", "c"],
    "shots": ["s1", "s2"],
    "messages": [
        {"double_quantifier": {
            "subject_dets": ["every", "some", "exactly_one", "no"],
            "object_dets": ["every", "some", "no"]
        }}
    ],
    "refinements": {"some(player)": "unconstrained", "some(shot)": "unconstrained"},
    "model": {"extra_rounds": 1}
}"#;

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(env_filter).try_init();
}

fn main() -> Result<(), RsaError> {
    init_tracing();

    let config = match std::env::args().nth(1) {
        Some(path) => ExperimentConfig::from_path(path)?,
        None => ExperimentConfig::from_json_str(DEFAULT_CONFIG)?,
    };
    let digits = config.model.digits;

    println!("=== {} ===\n", config.name);

    let baseline = config.run_baseline()?;
    let result = config.run()?;

    println!("Literal vs RSA vs lexical uncertainty (most likely state)");
    println!("----------------------------------------------------------");
    let best = result.best_inferences(digits)?;
    for (i, message) in result.messages.iter().enumerate() {
        let argmax = |row: &[f64]| {
            row.iter()
                .enumerate()
                .fold((0, f64::NEG_INFINITY), |acc, (j, &x)| if x > acc.1 { (j, x) } else { acc })
                .0
        };
        let literal = &result.states[argmax(&baseline.literal.m[i])];
        let rsa = &result.states[argmax(&baseline.listener.m[i])];
        let uncertainty: Vec<&str> = best[message].iter().map(|(s, _)| s.as_str()).collect();
        println!(
            "  {:<40} {:>4} {:>4} {:>10}",
            message,
            literal,
            rsa,
            uncertainty.join("/")
        );
    }
    println!();

    println!("{}", result.report(digits));
    Ok(())
}
