//! Best inferences: the interpretations a listener settles on.

use std::collections::BTreeMap;

use pragmatics_prob::{round_to, Matrix, MAX_DIGITS};

use crate::error::RsaError;

/// For each message, every state attaining the row maximum, with its value
/// rounded to `digits`.
///
/// Values are rounded to `digits` before they are compared, so every state
/// tied at the maximum at that precision is returned, in state order.
///
/// # Example
///
/// ```rust
/// use pragmatics_prob::Matrix;
/// use pragmatics_rsa::best_inferences;
///
/// let listener = Matrix::new(vec![vec![0.25, 0.5, 0.25], vec![0.4, 0.2, 0.4]]).unwrap();
/// let messages = vec!["m1".to_string(), "m2".to_string()];
/// let states = vec!["N".to_string(), "S".to_string(), "A".to_string()];
///
/// let best = best_inferences(&listener, &messages, &states, 2).unwrap();
/// assert_eq!(best["m1"], vec![("S".to_string(), 0.5)]);
/// assert_eq!(best["m2"].len(), 2);
/// ```
pub fn best_inferences(
    final_listener: &Matrix,
    messages: &[String],
    states: &[String],
    digits: u32,
) -> Result<BTreeMap<String, Vec<(String, f64)>>, RsaError> {
    if digits > MAX_DIGITS {
        return Err(RsaError::InvalidConfig {
            reason: format!("at most {} digits are meaningful, got {}", MAX_DIGITS, digits),
        });
    }
    let expected = (messages.len(), states.len());
    if final_listener.shape() != expected {
        return Err(RsaError::InvalidConfig {
            reason: format!(
                "listener has shape {:?} for {} messages and {} states",
                final_listener.shape(),
                expected.0,
                expected.1
            ),
        });
    }

    let mut best = BTreeMap::new();
    for (message, row) in messages.iter().zip(&final_listener.m) {
        let rounded: Vec<f64> = row.iter().map(|&x| round_to(x, digits)).collect();
        let max = rounded.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let winners = states
            .iter()
            .zip(&rounded)
            .filter(|(_, &x)| x == max)
            .map(|(state, &x)| (state.clone(), x))
            .collect();
        best.insert(message.clone(), winners);
    }
    Ok(best)
}
