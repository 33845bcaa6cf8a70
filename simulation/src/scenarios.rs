//! Pre-defined R0 scenarios
//!
//! Small, fully determined runs that double as sanity checks for the engine.

use tracing::{info, info_span};

use epinet_core::{EpinetResult, SirParams, VertexId};
use epinet_logging::spans;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::EstimatorConfig;
use crate::estimator::{R0Estimator, RunReport};
use crate::sir::{SirTrial, StepOutcome, TrialOutcome};
use crate::summary::R0Summary;
use crate::topology::TopologyBuilder;

/// Patient zero in the middle of a five-vertex path
///
/// ```text
/// 0 - 1 - [2] - 3 - 4
/// ```
///
/// With `beta = gamma = 1` patient zero is infectious for exactly one step
/// and infects both contacts in it, so R0 = 2.
pub fn run_path_scenario(seed: u64) -> EpinetResult<TrialOutcome> {
    let span = info_span!(spans::SCENARIO, name = "path");
    let _enter = span.enter();
    info!("=== Running Path Scenario ===");

    let graph = TopologyBuilder::new(5).line();
    println!("{}", graph.describe());

    let params = SirParams::new(1.0, 1.0)?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut trial = SirTrial::new(&graph, VertexId(2), params, &mut rng)?;

    println!(
        "\n--- Patient zero: 2, infectious for {} step(s) ---",
        trial.patient_zero().infectious_period
    );
    loop {
        let outcome = trial.step(&mut rng);
        let counts = trial.state_counts();
        println!(
            "  Step {} ({} dynamics): R0 so far {} | S={} I={} R={}",
            trial.current_step(),
            trial.dynamics_steps(),
            trial.patient_zero().direct_infections,
            counts.susceptible,
            counts.infected,
            counts.recovered
        );
        match outcome {
            StepOutcome::Continue => {}
            StepOutcome::EarlyExit => {
                println!("  No susceptible contacts left");
                break;
            }
            StepOutcome::Finished => break,
        }
    }

    let outcome = trial.finish();
    println!("\n=== Result: R0 = {} ===", outcome.r0);
    info!(r0 = outcome.r0, "Path scenario complete");
    Ok(outcome)
}

/// A lone vertex with no contacts
///
/// Every trial draws the isolated vertex as its base, finds no neighbor to
/// promote to patient zero and records R0 = 0 without simulating.
pub fn run_isolated_scenario(trials: usize, seed: u64) -> EpinetResult<RunReport> {
    let span = info_span!(spans::SCENARIO, name = "isolated");
    let _enter = span.enter();
    info!("=== Running Isolated Vertex Scenario ===");

    let graph = TopologyBuilder::new(1).line();
    println!("{}", graph.describe());

    let config = EstimatorConfig::new(SirParams::new(1.0, 0.5)?, trials).with_seed(seed);
    let report = R0Estimator::new(&graph, config)?.run()?;

    println!(
        "\n=== Result: {} trial(s), {} without a patient zero, samples {:?} ===",
        report.records.len(),
        report.degenerate_count(),
        report.samples()
    );
    Ok(report)
}

/// Mean R0 on a ring for increasing `beta`
///
/// Shows transmission probability driving R0 from 0 up to the ring degree.
pub fn run_beta_sweep_scenario(
    vertices: usize,
    gamma: f64,
    trials: usize,
    seed: u64,
) -> EpinetResult<Vec<(f64, R0Summary)>> {
    let span = info_span!(spans::SCENARIO, name = "beta_sweep");
    let _enter = span.enter();
    info!("=== Running Beta Sweep Scenario ===");

    let graph = TopologyBuilder::new(vertices).ring();
    let mut rows = Vec::new();

    println!("\n  beta    mean R0   std dev");
    for step in 0..=10 {
        let beta = step as f64 / 10.0;
        let config = EstimatorConfig::new(SirParams::new(beta, gamma)?, trials).with_seed(seed);
        let report = R0Estimator::new(&graph, config)?.run()?;
        if let Some(summary) = report.summary() {
            println!("  {:.1}  {:>9.4}  {:>8.4}", beta, summary.mean, summary.std_dev);
            rows.push((beta, summary));
        }
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_scenario() {
        let outcome = run_path_scenario(0).unwrap();
        assert_eq!(outcome.r0, 2);
        assert_eq!(outcome.infection_time, 1);
    }

    #[test]
    fn test_isolated_scenario() {
        let report = run_isolated_scenario(5, 0).unwrap();
        assert_eq!(report.samples(), vec![0; 5]);
        assert_eq!(report.degenerate_count(), 5);
    }

    #[test]
    fn test_beta_sweep_endpoints() {
        let rows = run_beta_sweep_scenario(12, 0.5, 30, 4).unwrap();
        assert_eq!(rows.len(), 11);
        assert_eq!(rows[0].1.mean, 0.0);
        assert_eq!(rows[10].1.mean, 2.0);
    }
}
