//! # epinet simulation
//!
//! Monte-Carlo estimation of the basic reproduction number (R0) of an SIR
//! epidemic on a contact network.
//!
//! ## Overview
//!
//! Each trial seeds a single case and counts how many contacts that case
//! infects *directly* while it is infectious. Key features:
//!
//! - **Size-biased seeding**: patient zero is a random neighbor of a random vertex
//! - **Neighborhood pruning**: a trial only simulates the ball around patient
//!   zero that its infectious period can influence
//! - **Synchronous dynamics**: the rest of the neighborhood evolves by
//!   standard discrete-time SIR, all vertices updated at once
//! - **Reproducible runs**: per-trial random streams derived from one seed,
//!   identical whether trials run sequentially or in parallel
//!
//! ## Architecture
//!
//! - **Topology** (`topology.rs`): fixture graphs and edge-list loading
//! - **Pruning** (`pruning.rs`): restriction of the graph to a neighborhood
//! - **SIR** (`sir.rs`): the single-trial engine
//! - **Estimator** (`estimator.rs`): trial orchestration, sequential or rayon
//! - **Summary** (`summary.rs`): mean, spread and frequency table of samples
//! - **Scenarios** (`scenarios.rs`): small fully determined runs
//!
//! ## Example
//!
//! ```rust,ignore
//! use epinet_simulation::*;
//!
//! let graph = TopologyBuilder::new(200).ring();
//! let config = EstimatorConfig::new(SirParams::new(0.3, 0.2)?, 1000).with_seed(7);
//! let report = R0Estimator::new(&graph, config)?.run()?;
//!
//! let summary = report.summary().unwrap();
//! println!("{}", summary.render());
//! ```

pub mod config;
pub mod estimator;
pub mod pruning;
pub mod scenarios;
pub mod sir;
pub mod summary;
pub mod topology;

pub use config::EstimatorConfig;
pub use estimator::{R0Estimator, RunReport, TrialRecord, estimate_r0, estimate_r0_seeded};
pub use pruning::{prune, pruning_radius, unprune};
pub use sir::{
    InfectiousPeriod, PatientZero, SirTrial, StateCounts, StepOutcome, TrialOutcome, simulate,
    simulate_detailed, synchronous_step,
};
pub use summary::R0Summary;
pub use topology::{
    MAX_EDGE_LIST_VERTEX, TopologyBuilder, from_edges, load_edge_list, parse_edge_list,
};

pub use epinet_core::{
    ConfigError, ContactGraph, ContactNetwork, EpinetError, EpinetResult, GraphError, GraphView,
    InfectionState, SirParams, VertexId, VertexRole,
};
