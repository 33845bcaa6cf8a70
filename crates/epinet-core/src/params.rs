//! Epidemic parameters

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Per-step SIR probabilities
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SirParams {
    /// Probability an infected vertex infects a susceptible neighbor in one step
    pub beta: f64,
    /// Probability an infected vertex recovers in one step
    pub gamma: f64,
}

impl Default for SirParams {
    fn default() -> Self {
        Self {
            beta: 0.01,
            gamma: 0.0476,
        }
    }
}

impl SirParams {
    /// Create validated parameters
    pub fn new(beta: f64, gamma: f64) -> Result<Self, ConfigError> {
        let params = Self { beta, gamma };
        params.validate()?;
        Ok(params)
    }

    /// Check `beta ∈ [0, 1]` and `gamma ∈ (0, 1]`
    ///
    /// `gamma = 0` would make the infectious period unbounded.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.beta) {
            return Err(ConfigError::InvalidBeta(self.beta));
        }
        if !(self.gamma > 0.0 && self.gamma <= 1.0) {
            return Err(ConfigError::InvalidGamma(self.gamma));
        }
        Ok(())
    }

    /// Mean number of steps a case stays infectious
    pub fn mean_infectious_period(&self) -> f64 {
        1.0 / self.gamma
    }

    /// Chance that at least one of `k` infected neighbors transmits in one step
    pub fn exposure_probability(&self, k: u32) -> f64 {
        if k == 0 {
            return 0.0;
        }
        let escape = (1.0 - self.beta).powi(k as i32);
        (1.0 - escape).clamp(0.0, 1.0)
    }
}
