//! Infection states and per-vertex roles
//!
//! Ordinary vertices carry one of the three SIR labels. Patient zero is not
//! folded into those labels: it has its own [`VertexRole::PatientZero`]
//! marker, which keeps it out of the generic population dynamics while its
//! direct infections are tracked separately by the trial engine.

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// SIR compartment of an ordinary vertex
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum InfectionState {
    #[default]
    #[display("S")]
    Susceptible = 0,
    #[display("I")]
    Infected = 1,
    #[display("R")]
    Recovered = 2,
}

impl InfectionState {
    /// Numeric label (0 = S, 1 = I, 2 = R)
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Susceptible),
            1 => Some(Self::Infected),
            2 => Some(Self::Recovered),
            _ => None,
        }
    }

    /// Whether SIR dynamics allow moving from `self` to `next` in one step
    ///
    /// Recovery is absorbing and nobody skips the infected stage.
    pub fn can_become(self, next: InfectionState) -> bool {
        use InfectionState::*;
        matches!(
            (self, next),
            (Susceptible, Susceptible)
                | (Susceptible, Infected)
                | (Infected, Infected)
                | (Infected, Recovered)
                | (Recovered, Recovered)
        )
    }

    /// Move to `next`, panicking on a transition SIR forbids
    ///
    /// An illegal transition is a modelling bug, never bad luck.
    pub fn advance(self, next: InfectionState) -> InfectionState {
        assert!(
            self.can_become(next),
            "illegal infection transition {} -> {}",
            self,
            next
        );
        next
    }
}

/// What a vertex is within a single trial
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VertexRole {
    /// The seeded case; its infections are counted, not simulated generically
    PatientZero,
    /// Everyone else
    Member(InfectionState),
}

impl VertexRole {
    /// SIR state of an ordinary vertex; `None` for patient zero
    pub fn state(self) -> Option<InfectionState> {
        match self {
            Self::PatientZero => None,
            Self::Member(state) => Some(state),
        }
    }

    pub fn is_susceptible(self) -> bool {
        self == Self::Member(InfectionState::Susceptible)
    }

    pub fn is_infected(self) -> bool {
        self == Self::Member(InfectionState::Infected)
    }

    pub fn is_recovered(self) -> bool {
        self == Self::Member(InfectionState::Recovered)
    }
}

impl Default for VertexRole {
    fn default() -> Self {
        Self::Member(InfectionState::Susceptible)
    }
}
