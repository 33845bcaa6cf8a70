//! Run configuration for R0 estimation
//!
//! Loaded from TOML with every field optional except the epidemic
//! parameters' defaults:
//!
//! ```toml
//! beta = 0.05
//! gamma = 0.1
//! trials = 1000
//! seed = 7
//! parallel = true
//! threads = 4
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use epinet_core::{ConfigError, SirParams};

/// Parameters of one estimation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    #[serde(flatten)]
    pub params: SirParams,
    /// Number of trials (samples) to draw
    pub trials: usize,
    /// Master seed; drawn from the OS when absent
    pub seed: Option<u64>,
    /// Run trials on the rayon pool
    pub parallel: bool,
    /// Worker count for a dedicated pool; the global pool when absent
    pub threads: Option<usize>,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            params: SirParams::default(),
            trials: 100,
            seed: None,
            parallel: false,
            threads: None,
        }
    }
}

impl EstimatorConfig {
    /// Sequential configuration for the given parameters
    pub fn new(params: SirParams, trials: usize) -> Self {
        Self {
            params,
            trials,
            ..Self::default()
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Reject anything that would make a run meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.params.validate()?;
        if self.trials == 0 {
            return Err(ConfigError::ZeroTrials);
        }
        if self.threads == Some(0) {
            return Err(ConfigError::ZeroThreads);
        }
        Ok(())
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_document() {
        let config = EstimatorConfig::from_toml_str(
            "beta = 0.05\ngamma = 0.1\ntrials = 1000\nseed = 7\nparallel = true\nthreads = 4\n",
        )
        .unwrap();
        assert_eq!(config.params, SirParams { beta: 0.05, gamma: 0.1 });
        assert_eq!(config.trials, 1000);
        assert_eq!(config.seed, Some(7));
        assert!(config.parallel);
        assert_eq!(config.threads, Some(4));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = EstimatorConfig::from_toml_str("beta = 0.2\n").unwrap();
        assert_eq!(config.params.beta, 0.2);
        assert_eq!(config.params.gamma, SirParams::default().gamma);
        assert_eq!(config.trials, 100);
        assert_eq!(config.seed, None);
        assert!(!config.parallel);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            EstimatorConfig::from_toml_str("gamma = 0.0\n"),
            Err(ConfigError::InvalidGamma(_))
        ));
        assert!(matches!(
            EstimatorConfig::from_toml_str("trials = 0\n"),
            Err(ConfigError::ZeroTrials)
        ));
        assert!(matches!(
            EstimatorConfig::from_toml_str("threads = 0\n"),
            Err(ConfigError::ZeroThreads)
        ));
        assert!(matches!(
            EstimatorConfig::from_toml_str("beta = \"high\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_builder_helpers() {
        let config = EstimatorConfig::new(SirParams::new(0.3, 0.4).unwrap(), 10)
            .with_seed(1)
            .with_parallel(true)
            .with_threads(2);
        assert!(config.validate().is_ok());
        assert_eq!(config.seed, Some(1));
        assert_eq!(config.threads, Some(2));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.toml");
        std::fs::write(&path, "beta = 0.5\ngamma = 0.5\ntrials = 3\n").unwrap();
        assert_eq!(EstimatorConfig::load(&path).unwrap().trials, 3);

        assert!(matches!(
            EstimatorConfig::load(dir.path().join("missing.toml")),
            Err(ConfigError::Io(_))
        ));
    }
}
