//! R0 Estimation Property Tests
//!
//! Checks the behavior of the estimator and the trial engine end to end:
//! - Transmission corners (beta = 0, beta = 1) and monotonicity in beta
//! - Degenerate seeds and isolated vertices
//! - State invariants observed between steps
//! - Bounded trial duration
//! - Reproducibility across sequential and parallel runs
//!
//! Every run uses a fixed seed.

use std::collections::HashSet;

use rand::SeedableRng;
use rand::rngs::StdRng;

use epinet_simulation::{
    ContactGraph, ContactNetwork, EstimatorConfig, InfectionState, R0Estimator, RunReport,
    SirParams, SirTrial, StepOutcome, TopologyBuilder, VertexId, VertexRole, from_edges,
    scenarios, simulate,
};

// ============================================================================
// Helpers
// ============================================================================

fn run(graph: &ContactGraph, beta: f64, gamma: f64, trials: usize, seed: u64) -> RunReport {
    epinet_logging::init_testing();
    let config = EstimatorConfig::new(SirParams::new(beta, gamma).unwrap(), trials).with_seed(seed);
    R0Estimator::new(graph, config).unwrap().run().unwrap()
}

fn mean(samples: &[u32]) -> f64 {
    samples.iter().map(|&r| r as f64).sum::<f64>() / samples.len() as f64
}

fn random_graph(vertices: usize, edge_probability: f64, seed: u64) -> ContactGraph {
    let mut rng = StdRng::seed_from_u64(seed);
    TopologyBuilder::new(vertices).random(edge_probability, &mut rng).unwrap()
}

// ============================================================================
// Transmission
// ============================================================================

#[test]
fn test_mean_r0_non_decreasing_in_beta() {
    let graph = TopologyBuilder::new(30).ring();
    let means: Vec<f64> = [0.0, 0.1, 0.3, 0.6, 1.0]
        .iter()
        .map(|&beta| mean(&run(&graph, beta, 0.3, 400, 11).samples()))
        .collect();

    assert_eq!(means[0], 0.0);
    assert_eq!(means[4], 2.0);
    for pair in means.windows(2) {
        assert!(pair[0] <= pair[1], "mean R0 decreased: {:?}", means);
    }
}

#[test]
fn test_zero_beta_gives_zero_everywhere() {
    let graphs = [
        TopologyBuilder::new(10).complete(),
        TopologyBuilder::new(25).star(),
        random_graph(60, 0.1, 5),
    ];
    for graph in &graphs {
        for gamma in [0.05, 0.5, 1.0] {
            let report = run(graph, 0.0, gamma, 50, 3);
            assert!(report.samples().iter().all(|&r0| r0 == 0));
        }
    }
}

#[test]
fn test_r0_never_exceeds_patient_zero_degree() {
    let graph = random_graph(80, 0.08, 8);
    let report = run(&graph, 0.6, 0.1, 200, 21);
    for record in &report.records {
        if let Some(outcome) = &record.outcome {
            assert!(outcome.r0 as usize <= graph.degree(outcome.patient_zero));
        }
    }
}

// ============================================================================
// Degenerate seeds
// ============================================================================

#[test]
fn test_isolated_base_vertex_skips_simulation() {
    // Edge 0 - 1 plus eight isolated vertices
    let mut graph = from_edges(&[(0, 1)]);
    for _ in 0..8 {
        graph.add_vertex();
    }

    let report = run(&graph, 1.0, 1.0, 200, 4);
    let mut saw_degenerate = false;
    let mut saw_simulated = false;
    for record in &report.records {
        if graph.degree(record.base_vertex) == 0 {
            assert!(record.outcome.is_none());
            assert_eq!(record.r0(), 0);
            saw_degenerate = true;
        } else {
            let outcome = record.outcome.as_ref().unwrap();
            assert_eq!(outcome.r0, 1);
            saw_simulated = true;
        }
    }
    assert!(saw_degenerate && saw_simulated);
}

#[test]
fn test_single_isolated_vertex() {
    let report = scenarios::run_isolated_scenario(3, 9).unwrap();
    assert_eq!(report.samples(), vec![0, 0, 0]);
    assert!(report.records.iter().all(|r| r.base_vertex == VertexId(0)));
}

#[test]
fn test_path_scenario_yields_two() {
    let graph = TopologyBuilder::new(5).line();
    let params = SirParams::new(1.0, 1.0).unwrap();
    for seed in 0..20 {
        let mut rng = StdRng::seed_from_u64(seed);
        assert_eq!(simulate(&graph, VertexId(2), params, &mut rng).unwrap(), 2);
    }
}

// ============================================================================
// State invariants and duration
// ============================================================================

#[test]
fn test_states_stay_valid_between_steps() {
    let graph = random_graph(150, 0.04, 13);
    let params = SirParams::new(0.35, 0.15).unwrap();
    let mut rng = StdRng::seed_from_u64(13);

    for vertex in (0..150).step_by(7).map(VertexId) {
        if graph.degree(vertex) == 0 {
            continue;
        }
        let mut trial = SirTrial::new(&graph, vertex, params, &mut rng).unwrap();
        let mut recovered: HashSet<usize> = HashSet::new();

        loop {
            let outcome = trial.step(&mut rng);

            let roles = trial.roles();
            assert_eq!(roles.iter().filter(|r| **r == VertexRole::PatientZero).count(), 1);
            for (slot, role) in roles.iter().enumerate() {
                if let Some(state) = role.state() {
                    assert!(InfectionState::from_code(state.code()).is_some());
                    if recovered.contains(&slot) {
                        assert_eq!(state, InfectionState::Recovered, "slot {slot} left R");
                    }
                    if state == InfectionState::Recovered {
                        recovered.insert(slot);
                    }
                }
            }

            if outcome != StepOutcome::Continue {
                break;
            }
        }
    }
}

#[test]
fn test_dynamics_steps_bounded_by_infection_time() {
    let graph = random_graph(120, 0.05, 17);
    for (beta, gamma) in [(0.1, 0.1), (0.5, 0.3), (1.0, 0.05), (0.0, 0.2)] {
        let report = run(&graph, beta, gamma, 150, 17);
        for outcome in report.records.iter().filter_map(|r| r.outcome.as_ref()) {
            if outcome.early_exit {
                assert!(outcome.dynamics_steps < outcome.infection_time);
            } else {
                assert_eq!(outcome.dynamics_steps, outcome.infection_time);
            }
            assert!(outcome.infection_time >= 1);
            assert_eq!(outcome.radius, 1 + outcome.infection_time / 2);
        }
    }
}

#[test]
fn test_graph_untouched_by_trials() {
    let graph = random_graph(100, 0.05, 23);
    let before = graph.clone();

    let report = run(&graph, 0.5, 0.2, 100, 23);
    assert_eq!(report.records.len(), 100);
    assert_eq!(graph, before);
    assert!(!graph.is_restricted());
    assert_eq!(graph.vertices().count(), 100);

    let mut rng = StdRng::seed_from_u64(23);
    let hub = graph.vertices().max_by_key(|v| graph.degree(*v)).unwrap();
    let trial = SirTrial::new(&graph, hub, SirParams::new(0.5, 0.2).unwrap(), &mut rng).unwrap();
    assert!(trial.view().is_restricted());
    let outcome = trial.run(&mut rng);
    assert!(outcome.view_size <= graph.vertex_count());
    assert_eq!(graph, before);
}

// ============================================================================
// Reproducibility
// ============================================================================

#[test]
fn test_same_seed_same_samples() {
    let graph = random_graph(90, 0.06, 31);
    let a = run(&graph, 0.3, 0.2, 120, 31);
    let b = run(&graph, 0.3, 0.2, 120, 31);
    assert_eq!(a.records, b.records);
}

#[test]
fn test_parallel_matches_sequential() {
    let graph = random_graph(90, 0.06, 37);
    let params = SirParams::new(0.3, 0.2).unwrap();

    let sequential = run(&graph, 0.3, 0.2, 120, 37);
    let parallel = R0Estimator::new(
        &graph,
        EstimatorConfig::new(params, 120).with_seed(37).with_parallel(true),
    )
    .unwrap()
    .run()
    .unwrap();

    assert_eq!(sequential.samples(), parallel.samples());
    assert_eq!(sequential.records, parallel.records);
}
