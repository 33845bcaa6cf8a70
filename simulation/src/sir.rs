//! Single-trial SIR engine
//!
//! A trial runs on a pruned neighborhood of patient zero:
//! - Patient zero stays infectious for a fixed, pre-sampled number of steps
//! - Each step, its susceptible contacts are exposed directly and every
//!   success counts towards R0
//! - The rest of the neighborhood then advances one synchronous SIR step
//!
//! [`SirTrial`] exposes the loop step by step; [`simulate`] runs it to the end.

use std::collections::BTreeMap;

use rand::Rng;
use rand_distr::{Distribution, Geometric};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use epinet_core::{
    ConfigError, ContactGraph, ContactNetwork, EpinetResult, GraphView, InfectionState,
    SirParams, VertexId, VertexRole,
};

use crate::pruning::{prune, pruning_radius, unprune};

/// Distribution of patient zero's infectious period
///
/// Number of Bernoulli(`gamma`) trials up to and including the first
/// recovery, so the smallest value is 1.
#[derive(Debug, Clone)]
pub struct InfectiousPeriod {
    failures: Geometric,
}

impl InfectiousPeriod {
    pub fn new(gamma: f64) -> Result<Self, ConfigError> {
        if !(gamma > 0.0 && gamma <= 1.0) {
            return Err(ConfigError::InvalidGamma(gamma));
        }
        let failures = Geometric::new(gamma).map_err(|_| ConfigError::InvalidGamma(gamma))?;
        Ok(Self { failures })
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        self.failures.sample(rng).saturating_add(1)
    }
}

/// One synchronous step of SIR dynamics over `view`
///
/// `roles` is indexed by view slot. Every infected member recovers with
/// probability `gamma`; every susceptible member with `k` infected neighbors
/// is infected with probability `1 - (1 - beta)^k`. All decisions read the
/// incoming roles and the result is returned as a fresh vector. Patient zero
/// takes no part: it neither transmits nor can be infected here.
pub fn synchronous_step<R: Rng + ?Sized>(
    view: &GraphView<'_>,
    roles: &[VertexRole],
    params: &SirParams,
    rng: &mut R,
) -> Vec<VertexRole> {
    let mut next = roles.to_vec();
    // Ordered so random draws happen in a reproducible order
    let mut pressure: BTreeMap<usize, u32> = BTreeMap::new();

    for (slot, role) in roles.iter().enumerate() {
        if !role.is_infected() {
            continue;
        }
        for neighbor in view.neighbor_slots(slot) {
            if roles[neighbor].is_susceptible() {
                *pressure.entry(neighbor).or_insert(0) += 1;
            }
        }
        if rng.random_bool(params.gamma) {
            next[slot] = transition(*role, InfectionState::Recovered);
        }
    }

    for (slot, infected_neighbors) in pressure {
        if rng.random_bool(params.exposure_probability(infected_neighbors)) {
            next[slot] = transition(roles[slot], InfectionState::Infected);
        }
    }

    next
}

/// Apply a SIR transition to an ordinary vertex
///
/// # Panics
///
/// Panics when asked to move patient zero or on a transition SIR forbids.
fn transition(role: VertexRole, next: InfectionState) -> VertexRole {
    match role {
        VertexRole::Member(state) => VertexRole::Member(state.advance(next)),
        VertexRole::PatientZero => panic!("patient zero entered the population dynamics"),
    }
}

/// Bookkeeping for the seeded case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientZero {
    pub vertex: VertexId,
    /// Steps patient zero stays infectious
    pub infectious_period: u64,
    /// Contacts infected directly by patient zero so far
    pub direct_infections: u32,
}

/// What a call to [`SirTrial::step`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// More steps remain
    Continue,
    /// No susceptible contact of patient zero is left
    EarlyExit,
    /// Patient zero's infectious period is over
    Finished,
}

/// Final S/I/R counts among ordinary vertices of a view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateCounts {
    pub susceptible: usize,
    pub infected: usize,
    pub recovered: usize,
}

/// Result of one simulated trial
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialOutcome {
    /// Direct secondary infections caused by patient zero
    pub r0: u32,
    pub patient_zero: VertexId,
    pub infection_time: u64,
    pub radius: u64,
    /// Vertices in the pruned neighborhood, patient zero included
    pub view_size: usize,
    /// Population-dynamics steps actually executed
    pub dynamics_steps: u64,
    pub early_exit: bool,
    pub final_counts: StateCounts,
}

/// A single SIR trial on the pruned neighborhood of patient zero
#[derive(Debug)]
pub struct SirTrial<'g> {
    view: GraphView<'g>,
    params: SirParams,
    /// Indexed by view slot
    roles: Vec<VertexRole>,
    patient_zero: PatientZero,
    /// Slots of patient zero's visible neighbors
    contacts: Vec<usize>,
    radius: u64,
    step: u64,
    dynamics_steps: u64,
    early_exit: bool,
    finished: bool,
}

impl<'g> SirTrial<'g> {
    /// Set up a trial, sampling patient zero's infectious period from `gamma`
    pub fn new<R: Rng + ?Sized>(
        graph: &'g ContactGraph,
        patient_zero: VertexId,
        params: SirParams,
        rng: &mut R,
    ) -> EpinetResult<Self> {
        params.validate()?;
        let infection_time = InfectiousPeriod::new(params.gamma)?.sample(rng);
        Self::with_infection_time(graph, patient_zero, params, infection_time)
    }

    /// Set up a trial with a fixed infectious period for patient zero
    ///
    /// A period of 0 is raised to 1: patient zero always gets one direct
    /// exposure phase.
    pub fn with_infection_time(
        graph: &'g ContactGraph,
        patient_zero: VertexId,
        params: SirParams,
        infection_time: u64,
    ) -> EpinetResult<Self> {
        params.validate()?;
        let infection_time = infection_time.max(1);
        let radius = pruning_radius(infection_time);
        let view = prune(graph, patient_zero, radius)?;

        let mut roles = vec![VertexRole::default(); view.len()];
        let root_slot = view.slot(patient_zero).unwrap_or(0);
        roles[root_slot] = VertexRole::PatientZero;
        let contacts: Vec<usize> = view.neighbor_slots(root_slot).collect();

        debug!(
            patient_zero = %patient_zero,
            infection_time,
            radius,
            view_size = view.len(),
            contacts = contacts.len(),
            "Trial prepared"
        );

        Ok(Self {
            view,
            params,
            roles,
            patient_zero: PatientZero {
                vertex: patient_zero,
                infectious_period: infection_time,
                direct_infections: 0,
            },
            contacts,
            radius,
            step: 0,
            dynamics_steps: 0,
            early_exit: false,
            finished: false,
        })
    }

    /// Advance one step: direct exposure, early-exit check, then dynamics
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> StepOutcome {
        if self.finished {
            return if self.early_exit {
                StepOutcome::EarlyExit
            } else {
                StepOutcome::Finished
            };
        }

        self.step += 1;

        for &slot in &self.contacts {
            if self.roles[slot].is_susceptible() && rng.random_bool(self.params.beta) {
                self.roles[slot] = transition(self.roles[slot], InfectionState::Infected);
                self.patient_zero.direct_infections += 1;
            }
        }

        if !self.contacts.iter().any(|&slot| self.roles[slot].is_susceptible()) {
            trace!(
                step = self.step,
                r0 = self.patient_zero.direct_infections,
                "No susceptible contacts left"
            );
            self.early_exit = true;
            self.finished = true;
            return StepOutcome::EarlyExit;
        }

        let period = self.patient_zero.infectious_period;
        if self.params.beta == 0.0 {
            // Nobody can ever be infected, so the remaining steps change nothing
            self.dynamics_steps += period - self.step + 1;
            self.step = period;
            self.finished = true;
            return StepOutcome::Finished;
        }

        self.roles = synchronous_step(&self.view, &self.roles, &self.params, rng);
        self.dynamics_steps += 1;
        trace!(step = self.step, r0 = self.patient_zero.direct_infections, "Step complete");

        if self.step >= period {
            self.finished = true;
            StepOutcome::Finished
        } else {
            StepOutcome::Continue
        }
    }

    /// Step until patient zero stops being infectious or runs out of contacts
    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> TrialOutcome {
        while !self.is_finished() {
            self.step(rng);
        }
        self.finish()
    }

    /// Lift the restriction and report the trial
    pub fn finish(self) -> TrialOutcome {
        let outcome = TrialOutcome {
            r0: self.patient_zero.direct_infections,
            patient_zero: self.patient_zero.vertex,
            infection_time: self.patient_zero.infectious_period,
            radius: self.radius,
            view_size: self.view.len(),
            dynamics_steps: self.dynamics_steps,
            early_exit: self.early_exit,
            final_counts: self.state_counts(),
        };
        let graph = unprune(self.view);
        trace!(vertices = graph.vertex_count(), "Restriction lifted");
        outcome
    }

    /// Role of `vertex`, if it lies inside the pruned neighborhood
    pub fn role_of(&self, vertex: VertexId) -> Option<VertexRole> {
        self.view.slot(vertex).map(|slot| self.roles[slot])
    }

    /// Roles in view slot order
    pub fn roles(&self) -> &[VertexRole] {
        &self.roles
    }

    pub fn view(&self) -> &GraphView<'g> {
        &self.view
    }

    pub fn patient_zero(&self) -> &PatientZero {
        &self.patient_zero
    }

    /// Steps taken so far
    pub fn current_step(&self) -> u64 {
        self.step
    }

    pub fn dynamics_steps(&self) -> u64 {
        self.dynamics_steps
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn state_counts(&self) -> StateCounts {
        let mut counts = StateCounts::default();
        for role in &self.roles {
            match role.state() {
                Some(InfectionState::Susceptible) => counts.susceptible += 1,
                Some(InfectionState::Infected) => counts.infected += 1,
                Some(InfectionState::Recovered) => counts.recovered += 1,
                None => {}
            }
        }
        counts
    }
}

/// Run one trial seeded at `patient_zero` and return its R0
pub fn simulate<R: Rng + ?Sized>(
    graph: &ContactGraph,
    patient_zero: VertexId,
    params: SirParams,
    rng: &mut R,
) -> EpinetResult<u32> {
    Ok(simulate_detailed(graph, patient_zero, params, rng)?.r0)
}

/// Run one trial seeded at `patient_zero` and return the full outcome
pub fn simulate_detailed<R: Rng + ?Sized>(
    graph: &ContactGraph,
    patient_zero: VertexId,
    params: SirParams,
    rng: &mut R,
) -> EpinetResult<TrialOutcome> {
    Ok(SirTrial::new(graph, patient_zero, params, rng)?.run(rng))
}
