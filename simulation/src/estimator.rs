//! Monte-Carlo trial orchestration
//!
//! Each trial picks a vertex uniformly at random, then one of its neighbors
//! uniformly at random as patient zero. Sampling through a neighbor favors
//! well-connected vertices the way contact tracing does. A base vertex with
//! no neighbors yields R0 = 0 without simulating anything.
//!
//! Every trial gets its own `StdRng` seeded from a master stream, so a run
//! is reproducible from its seed and gives the same samples whether trials
//! run sequentially or on the rayon pool.

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, debug_span, info, info_span, warn};

use epinet_core::{
    ConfigError, ContactGraph, ContactNetwork, EpinetResult, GraphError, SirParams, VertexId,
};
use epinet_logging::spans;

use crate::config::EstimatorConfig;
use crate::sir::{SirTrial, TrialOutcome};
use crate::summary::R0Summary;

/// One trial of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialRecord {
    pub trial: usize,
    /// Vertex drawn uniformly from the whole graph
    pub base_vertex: VertexId,
    /// Simulation result; `None` when the base vertex had no neighbors
    pub outcome: Option<TrialOutcome>,
}

impl TrialRecord {
    pub fn r0(&self) -> u32 {
        self.outcome.as_ref().map_or(0, |o| o.r0)
    }

    pub fn patient_zero(&self) -> Option<VertexId> {
        self.outcome.as_ref().map(|o| o.patient_zero)
    }

    /// Whether the trial was settled without running the simulator
    pub fn is_degenerate(&self) -> bool {
        self.outcome.is_none()
    }
}

/// All trials of a run, in trial order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Master seed the run can be replayed from
    pub seed: u64,
    pub records: Vec<TrialRecord>,
}

impl RunReport {
    /// R0 samples in trial order
    pub fn samples(&self) -> Vec<u32> {
        self.records.iter().map(TrialRecord::r0).collect()
    }

    pub fn degenerate_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_degenerate()).count()
    }

    pub fn summary(&self) -> Option<R0Summary> {
        R0Summary::from_samples(&self.samples())
    }
}

/// Runs R0 trials against a shared, read-only graph
pub struct R0Estimator<'g> {
    graph: &'g ContactGraph,
    config: EstimatorConfig,
}

impl<'g> R0Estimator<'g> {
    /// Validate `config` against `graph` before any trial runs
    pub fn new(graph: &'g ContactGraph, config: EstimatorConfig) -> EpinetResult<Self> {
        config.validate()?;
        if graph.vertex_count() == 0 {
            return Err(GraphError::Empty.into());
        }
        Ok(Self { graph, config })
    }

    pub fn config(&self) -> &EstimatorConfig {
        &self.config
    }

    pub fn graph(&self) -> &'g ContactGraph {
        self.graph
    }

    /// Run every trial and collect the records
    pub fn run(&self) -> EpinetResult<RunReport> {
        let SirParams { beta, gamma } = self.config.params;
        let span = info_span!(
            spans::ESTIMATE_R0,
            trials = self.config.trials,
            beta,
            gamma,
            parallel = self.config.parallel
        );
        let _enter = span.enter();

        let seed = self.config.seed.unwrap_or_else(|| rand::rng().random());
        info!(
            seed,
            vertices = self.graph.vertex_count(),
            edges = self.graph.edge_count(),
            mean_infectious_period = self.config.params.mean_infectious_period(),
            "Starting R0 estimation"
        );

        if self.graph.edge_count() == 0 {
            warn!("Graph has no edges; every trial will report R0 = 0");
        }
        if self.config.threads.is_some() && !self.config.parallel {
            warn!("Thread count ignored for a sequential run");
        }

        let seeds = trial_seeds(seed, self.config.trials);
        let records = if self.config.parallel {
            self.run_parallel(&seeds)?
        } else {
            seeds
                .iter()
                .enumerate()
                .map(|(trial, &trial_seed)| self.run_trial(trial, trial_seed))
                .collect::<EpinetResult<Vec<_>>>()?
        };

        let report = RunReport { seed, records };
        if let Some(summary) = report.summary() {
            info!(
                mean = summary.mean,
                std_dev = summary.std_dev,
                max = summary.max,
                degenerate = report.degenerate_count(),
                "R0 estimation complete"
            );
        }
        Ok(report)
    }

    fn run_parallel(&self, seeds: &[u64]) -> EpinetResult<Vec<TrialRecord>> {
        let run = || {
            seeds
                .par_iter()
                .enumerate()
                .map(|(trial, &trial_seed)| self.run_trial(trial, trial_seed))
                .collect::<EpinetResult<Vec<_>>>()
        };

        match self.config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|e| ConfigError::ThreadPool(e.to_string()))?;
                pool.install(run)
            }
            None => run(),
        }
    }

    /// Run a single trial from its own seed
    pub fn run_trial(&self, trial: usize, seed: u64) -> EpinetResult<TrialRecord> {
        let span = debug_span!(spans::RUN_TRIAL, trial);
        let _enter = span.enter();

        let mut rng = StdRng::seed_from_u64(seed);
        let base_vertex = VertexId(rng.random_range(0..self.graph.vertex_count()));

        let Some(&patient_zero) = self.graph.neighbor_slice(base_vertex).choose(&mut rng) else {
            debug!(base = %base_vertex, "Base vertex has no contacts, R0 = 0");
            return Ok(TrialRecord {
                trial,
                base_vertex,
                outcome: None,
            });
        };

        let outcome =
            SirTrial::new(self.graph, patient_zero, self.config.params, &mut rng)?.run(&mut rng);
        debug!(
            base = %base_vertex,
            patient_zero = %patient_zero,
            r0 = outcome.r0,
            infection_time = outcome.infection_time,
            view_size = outcome.view_size,
            "Trial finished"
        );

        Ok(TrialRecord {
            trial,
            base_vertex,
            outcome: Some(outcome),
        })
    }
}

/// Per-trial seeds drawn from the master seed
fn trial_seeds(seed: u64, trials: usize) -> Vec<u64> {
    let mut master = StdRng::seed_from_u64(seed);
    (0..trials).map(|_| master.random()).collect()
}

/// Estimate R0 with `trial_count` sequential trials from an OS-drawn seed
pub fn estimate_r0(
    graph: &ContactGraph,
    beta: f64,
    gamma: f64,
    trial_count: usize,
) -> EpinetResult<Vec<u32>> {
    let config = EstimatorConfig::new(SirParams::new(beta, gamma)?, trial_count);
    Ok(R0Estimator::new(graph, config)?.run()?.samples())
}

/// Estimate R0 with `trial_count` sequential trials, reproducibly from `seed`
pub fn estimate_r0_seeded(
    graph: &ContactGraph,
    beta: f64,
    gamma: f64,
    trial_count: usize,
    seed: u64,
) -> EpinetResult<Vec<u32>> {
    let config = EstimatorConfig::new(SirParams::new(beta, gamma)?, trial_count).with_seed(seed);
    Ok(R0Estimator::new(graph, config)?.run()?.samples())
}
