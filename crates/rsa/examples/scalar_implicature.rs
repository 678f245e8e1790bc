//! Scalar and Manner Implicature
//!
//! Run with: cargo run -p pragmatics-rsa --example scalar_implicature
//!
//! This example demonstrates:
//! - Plain RSA on a single lexicon
//! - Lexical uncertainty over refinements of "scored"
//! - How the null cost sharpens interpretations
//! - Manner implicature from costs and a skewed state prior
//!
//! Set RUST_LOG=debug to see the lexicon stream being consumed.

use pragmatics_prob::{Dist, Matrix};
use pragmatics_rsa::{run_single_lexicon_rsa, LexicalUncertaintyModel, ModelConfig};
use tracing_subscriber::{fmt, EnvFilter};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt().with_env_filter(env_filter).try_init();
}

fn names(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|x| x.to_string()).collect()
}

fn main() {
    init_tracing();
    println!("=== Scalar and Manner Implicature ===\n");

    // -------------------------------------------------------------------------
    // 1. One lexicon
    // -------------------------------------------------------------------------
    println!("1. Plain RSA");
    println!("------------");

    // States: A made none (N), some but not all (S), all (A) of two shots
    let lexicon = Matrix::new(vec![
        vec![0.0, 1.0, 1.0], // A scored
        vec![0.0, 0.0, 1.0], // A aced
        vec![1.0, 1.0, 1.0], // NULL
    ])
    .unwrap();
    let rsa = run_single_lexicon_rsa(&lexicon, &Dist::uniform(3), &[0.0, 0.0, 5.0], 1.0).unwrap();
    println!("L0(S | scored) = {:.4}", rsa.literal.m[0][1]);
    println!("L(S | scored)  = {:.4}", rsa.listener.m[0][1]);
    println!();

    // -------------------------------------------------------------------------
    // 2. Lexical uncertainty
    // -------------------------------------------------------------------------
    println!("2. Lexical uncertainty over \"scored\"");
    println!("------------------------------------");

    let lexica: Vec<Matrix> = [[0.0, 1.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
        .iter()
        .map(|scored| {
            Matrix::new(vec![scored.to_vec(), vec![0.0, 0.0, 1.0], vec![1.0; 3]]).unwrap()
        })
        .collect();

    let model = LexicalUncertaintyModel::new(
        names(&["A scored", "A aced", "NULL"]),
        names(&["N", "S", "A"]),
        ModelConfig::default(),
    )
    .unwrap();
    let result = model.run_matrices(lexica.clone()).unwrap();
    println!("{}", result.report(4));

    // -------------------------------------------------------------------------
    // 3. Null cost
    // -------------------------------------------------------------------------
    println!("3. Row entropies as the null message gets costlier");
    println!("--------------------------------------------------");
    for null_cost in [0.0, 1.0, 5.0, 12.0] {
        let config = ModelConfig {
            null_cost,
            ..ModelConfig::default()
        };
        let entropies = LexicalUncertaintyModel::new(
            names(&["A scored", "A aced", "NULL"]),
            names(&["N", "S", "A"]),
            config,
        )
        .unwrap()
        .run_matrices(lexica.clone())
        .unwrap()
        .final_listener
        .row_entropies();
        println!("  cost {:>5.1}: {:?}", null_cost, entropies.iter().map(|h| format!("{:.4}", h)).collect::<Vec<_>>());
    }
    println!();

    // -------------------------------------------------------------------------
    // 4. Manner
    // -------------------------------------------------------------------------
    println!("4. Manner implicature");
    println!("---------------------");

    let (tt, tf, ft) = ([1.0, 1.0], [1.0, 0.0], [0.0, 1.0]);
    let mut manner = Vec::new();
    for short in [tt, tf, ft] {
        for long in [tt, tf, ft] {
            manner.push(Matrix::new(vec![short.to_vec(), long.to_vec(), vec![1.0, 1.0]]).unwrap());
        }
    }
    let config = ModelConfig {
        temperature: 2.0,
        extra_rounds: 3,
        ..ModelConfig::default()
    };
    let result = LexicalUncertaintyModel::new(
        names(&["short", "long", "NULL"]),
        names(&["usual", "unusual"]),
        config,
    )
    .and_then(|m| m.with_costs(vec![1.0, 2.0, 5.0]))
    .and_then(|m| m.with_state_prior(Dist::new(vec![2.0 / 3.0, 1.0 / 3.0])?))
    .and_then(|m| m.run_matrices(manner))
    .unwrap();
    println!("{}", result.report(4));
}
