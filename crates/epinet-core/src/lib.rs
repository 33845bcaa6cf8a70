//! # epinet core
//!
//! Shared building blocks for estimating R0 on contact networks.
//!
//! ## Key Traits
//!
//! - [`ContactNetwork`]: read access common to the full graph and its views
//!
//! ## Key Types
//!
//! - [`ContactGraph`]: undirected adjacency-list contact network
//! - [`GraphView`]: immutable vertex restriction over a borrowed graph
//! - [`InfectionState`] / [`VertexRole`]: SIR labels and the patient-zero role
//! - [`SirParams`]: validated transmission and recovery probabilities
//! - [`EpinetError`]: top-level error wrapping config and graph failures

pub mod error;
pub mod graph;
pub mod params;
pub mod state;
pub mod view;

// Re-export main types
pub use error::*;
pub use graph::*;
pub use params::*;
pub use state::*;
pub use view::*;
