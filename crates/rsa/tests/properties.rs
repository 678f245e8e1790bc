//! # Reasoner Properties
//!
//! Behavioral properties of the lexical-uncertainty listener:
//! - Every output distribution is row-stochastic
//! - Raising the null cost never makes interpretations vaguer
//! - Extra rounds leave a fixed point unchanged

use pragmatics_prob::{Dist, Matrix};
use pragmatics_rsa::{LexicalUncertaintyModel, ModelConfig, RsaError};

fn names(xs: &[&str]) -> Vec<String> {
    xs.iter().map(|x| x.to_string()).collect()
}

fn scalar_lexica() -> Vec<Matrix> {
    [[0.0, 1.0, 1.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
        .iter()
        .map(|scored| Matrix::new(vec![scored.to_vec(), vec![0.0, 0.0, 1.0], vec![1.0; 3]]).unwrap())
        .collect()
}

fn scalar_entropies(null_cost: f64) -> Vec<f64> {
    let config = ModelConfig {
        null_cost,
        ..ModelConfig::default()
    };
    LexicalUncertaintyModel::new(
        names(&["A scored", "A aced", "NULL"]),
        names(&["N", "S", "A"]),
        config,
    )
    .unwrap()
    .run_matrices(scalar_lexica())
    .unwrap()
    .final_listener
    .row_entropies()
}

// ============================================================================
// Null cost
// ============================================================================

#[test]
fn test_entropy_non_increasing_in_null_cost() {
    let sweep: Vec<Vec<f64>> = [0.0, 1.0, 5.0, 12.0]
        .iter()
        .map(|&c| scalar_entropies(c))
        .collect();

    for pair in sweep.windows(2) {
        for row in 0..3 {
            assert!(
                pair[1][row] <= pair[0][row] + 1e-12,
                "row {} entropy rose: {:?} -> {:?}",
                row,
                pair[0],
                pair[1]
            );
        }
    }

    assert!((sweep[0][0] - 0.64227).abs() < 1e-4);
    assert!((sweep[2][2] - 0.57237).abs() < 1e-4);
    assert!(sweep.iter().all(|h| h[1].abs() < 1e-12));
}

// ============================================================================
// Extra rounds
// ============================================================================

#[test]
fn test_fixed_point_is_stable_under_extra_rounds() {
    let identity = Matrix::new(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
    let run = |extra_rounds| {
        let config = ModelConfig {
            extra_rounds,
            ..ModelConfig::default()
        };
        LexicalUncertaintyModel::new(names(&["m1", "m2"]), names(&["w1", "w2"]), config)
            .unwrap()
            .run_matrices(vec![identity.clone()])
            .unwrap()
            .final_listener
    };

    let zero = run(0);
    assert!(zero.approx_eq(&identity, 1e-12));
    assert!(run(1).approx_eq(&zero, 1e-12));
    assert!(run(2).approx_eq(&zero, 1e-12));
}

#[test]
fn test_extra_rounds_sharpen_the_implicature() {
    let run = |extra_rounds| {
        let config = ModelConfig {
            extra_rounds,
            ..ModelConfig::default()
        };
        LexicalUncertaintyModel::new(
            names(&["A scored", "A aced", "NULL"]),
            names(&["N", "S", "A"]),
            config,
        )
        .unwrap()
        .run_matrices(scalar_lexica())
        .unwrap()
    };

    let mut previous = run(0).final_listener.m[0][1];
    for n in 1..5 {
        let result = run(n);
        let current = result.final_listener.m[0][1];
        assert!(current > previous);
        assert!(result.final_speaker.unwrap().is_row_stochastic(1e-9));
        previous = current;
    }
}

// ============================================================================
// Manner implicature
// ============================================================================

#[test]
fn test_manner_implicature() {
    // Short and long forms over a usual and an unusual state; the long form
    // costs more and the usual state is more likely.
    let (tt, tf, ft) = ([1.0, 1.0], [1.0, 0.0], [0.0, 1.0]);
    let mut lexica = Vec::new();
    for short in [tt, tf, ft] {
        for long in [tt, tf, ft] {
            lexica.push(Matrix::new(vec![short.to_vec(), long.to_vec(), vec![1.0, 1.0]]).unwrap());
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
    .unwrap()
    .with_costs(vec![1.0, 2.0, 5.0])
    .unwrap()
    .with_state_prior(Dist::new(vec![2.0 / 3.0, 1.0 / 3.0]).unwrap())
    .unwrap()
    .run_matrices(lexica)
    .unwrap();

    let l = &result.final_listener;
    assert!((l.m[0][0] - 0.70399).abs() < 1e-4);
    assert!((l.m[1][1] - 0.59140).abs() < 1e-4);
    // Short goes with usual, long with unusual
    assert!(l.m[0][0] > l.m[0][1]);
    assert!(l.m[1][1] > l.m[1][0]);
}

// ============================================================================
// Configuration errors
// ============================================================================

#[test]
fn test_configuration_errors() {
    assert!(matches!(
        LexicalUncertaintyModel::new(vec![], names(&["w"]), ModelConfig::default()),
        Err(RsaError::EmptyMessages)
    ));
    assert!(matches!(
        LexicalUncertaintyModel::new(names(&["m"]), vec![], ModelConfig::default()),
        Err(RsaError::EmptyStates)
    ));
    let model = LexicalUncertaintyModel::new(names(&["m", "NULL"]), names(&["w"]), ModelConfig::default())
        .unwrap();
    assert!(matches!(
        model.clone().with_costs(vec![0.0, -1.0]),
        Err(RsaError::NegativeCost { index: 1, .. })
    ));
    assert!(matches!(
        model.with_costs(vec![0.0]),
        Err(RsaError::InvalidConfig { .. })
    ));
    assert!(matches!(
        Dist::new(vec![0.5, 0.6]).map_err(RsaError::from),
        Err(RsaError::Prob(_))
    ));
}

// ============================================================================
// Property Tests
// ============================================================================

mod prop {
    use super::*;
    use proptest::collection;
    use proptest::prelude::*;

    const N_STATES: usize = 4;

    // Boolean message rows with at least one true state each, plus NULL.
    fn lexicon(rows: &[Vec<bool>]) -> Matrix {
        let mut m: Vec<Vec<f64>> = rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                let mut row: Vec<f64> = row.iter().map(|&b| if b { 1.0 } else { 0.0 }).collect();
                row[i % N_STATES] = 1.0;
                row
            })
            .collect();
        m.push(vec![1.0; N_STATES]);
        Matrix::new(m).unwrap()
    }

    proptest! {
        /// Every listener and speaker the model produces is row-stochastic.
        #[test]
        fn outputs_are_row_stochastic(
            lexica in collection::vec(
                collection::vec(collection::vec(any::<bool>(), N_STATES), 3),
                1..6,
            ),
            temperature in 0.1f64..5.0,
            null_cost in 0.0f64..10.0,
            extra_rounds in 0usize..3,
        ) {
            let config = ModelConfig { temperature, null_cost, extra_rounds, ..ModelConfig::default() };
            let model = LexicalUncertaintyModel::new(
                names(&["m1", "m2", "m3", "NULL"]),
                names(&["w1", "w2", "w3", "w4"]),
                config,
            ).unwrap();

            let result = model.run_matrices(lexica.iter().map(|rows| lexicon(rows))).unwrap();
            prop_assert_eq!(result.lexicon_count, lexica.len());
            prop_assert!(result.final_listener.is_row_stochastic(1e-9));
            prop_assert!(result.final_listener.m.iter().flatten().all(|x| x.is_finite()));
            if let Some(speaker) = result.final_speaker {
                prop_assert!(speaker.is_row_stochastic(1e-9));
            }
        }
    }
}
