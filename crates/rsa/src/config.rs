//! Model hyperparameters.

use pragmatics_prob::MAX_DIGITS;
use serde::{Deserialize, Serialize};

use crate::error::RsaError;

/// Hyperparameters of a lexical-uncertainty run.
///
/// All fields have defaults, so a JSON config may name only what it changes:
///
/// ```rust
/// use pragmatics_rsa::ModelConfig;
///
/// let config: ModelConfig = serde_json::from_str(r#"{"extra_rounds": 1}"#).unwrap();
/// assert_eq!(config.extra_rounds, 1);
/// assert_eq!(config.null_cost, 5.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Speaker rationality (λ).
    pub temperature: f64,
    /// Cost of the null message.
    pub null_cost: f64,
    /// Rounds of plain speaker/listener reasoning after marginalization.
    pub extra_rounds: usize,
    /// Decimal places for reports and best inferences.
    pub digits: u32,
    /// Log progress every this many lexica; 0 disables progress events.
    pub progress_interval: usize,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            null_cost: 5.0,
            extra_rounds: 0,
            digits: 4,
            progress_interval: 100,
        }
    }
}

impl ModelConfig {
    /// Check ranges.
    pub fn validate(&self) -> Result<(), RsaError> {
        if !(self.temperature.is_finite() && self.temperature > 0.0) {
            return Err(RsaError::NonPositiveTemperature {
                value: self.temperature,
            });
        }
        if !(self.null_cost.is_finite() && self.null_cost >= 0.0) {
            return Err(RsaError::InvalidConfig {
                reason: format!("null cost must be finite and non-negative, got {}", self.null_cost),
            });
        }
        if self.digits > MAX_DIGITS {
            return Err(RsaError::InvalidConfig {
                reason: format!("at most {} digits are meaningful, got {}", MAX_DIGITS, self.digits),
            });
        }
        Ok(())
    }
}
