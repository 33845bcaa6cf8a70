//! Aggregate statistics over R0 samples

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Mean, spread and distribution of a set of R0 samples
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct R0Summary {
    pub trials: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    pub min: u32,
    pub max: u32,
    /// Number of trials per observed R0 value
    pub frequencies: BTreeMap<u32, usize>,
}

impl R0Summary {
    /// Summarize `samples`; `None` if there are none
    pub fn from_samples(samples: &[u32]) -> Option<Self> {
        let min = *samples.iter().min()?;
        let max = *samples.iter().max()?;
        let n = samples.len() as f64;

        let mean = samples.iter().map(|&r| r as f64).sum::<f64>() / n;
        let variance = samples
            .iter()
            .map(|&r| (r as f64 - mean).powi(2))
            .sum::<f64>()
            / n;

        let mut frequencies = BTreeMap::new();
        for &r0 in samples {
            *frequencies.entry(r0).or_insert(0) += 1;
        }

        Some(Self {
            trials: samples.len(),
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
            frequencies,
        })
    }

    /// Share of trials with R0 = 0
    pub fn zero_fraction(&self) -> f64 {
        self.frequencies.get(&0).copied().unwrap_or(0) as f64 / self.trials as f64
    }

    /// Human-readable report with a frequency table
    pub fn render(&self) -> String {
        let mut output = String::new();
        output.push_str("=== R0 Estimate ===\n");
        output.push_str(&format!("  Trials:  {}\n", self.trials));
        output.push_str(&format!("  Mean:    {:.4}\n", self.mean));
        output.push_str(&format!("  Std dev: {:.4}\n", self.std_dev));
        output.push_str(&format!("  Range:   {} - {}\n", self.min, self.max));
        output.push_str(&format!("  No spread: {:.1}%\n", 100.0 * self.zero_fraction()));
        output.push_str("\n  R0  trials  share\n");
        for (r0, count) in &self.frequencies {
            output.push_str(&format!(
                "  {:>2}  {:>6}  {:>5.1}%\n",
                r0,
                count,
                100.0 * *count as f64 / self.trials as f64
            ));
        }
        output
    }
}
