//! Error types for epinet

use thiserror::Error;

/// Top-level error type for epinet
#[derive(Debug, Error)]
pub enum EpinetError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),
}

/// Errors in run parameters, reported before any trial executes
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("beta must lie in [0, 1], got {0}")]
    InvalidBeta(f64),

    #[error("gamma must lie in (0, 1], got {0}")]
    InvalidGamma(f64),

    #[error("trial count must be at least 1")]
    ZeroTrials,

    #[error("thread count must be at least 1")]
    ZeroThreads,

    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(String),
}

/// Errors related to graph construction and lookup
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("vertex {vertex} out of range for graph with {vertex_count} vertices")]
    VertexOutOfRange { vertex: usize, vertex_count: usize },

    #[error("graph has no vertices")]
    Empty,

    #[error("edge probability must lie in [0, 1], got {0}")]
    InvalidEdgeProbability(f64),

    #[error("malformed edge on line {line}: {reason}")]
    MalformedEdge { line: usize, reason: String },

    #[error("edge list I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for epinet operations
pub type EpinetResult<T> = Result<T, EpinetError>;
