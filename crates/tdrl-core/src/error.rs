//! Error types for the TD learning core

use thiserror::Error;

/// Core error type for RL operations
#[derive(Error, Debug)]
pub enum RLError {
    /// Invalid construction parameters, reported before any simulation
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Action index outside of the world's action range
    #[error("Invalid action {action}: the world has {nb_actions} actions")]
    InvalidAction { action: usize, nb_actions: usize },

    /// Invalid state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Dimension mismatch
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Action probabilities that do not form a probability simplex
    #[error("Invalid action distribution: {0}")]
    InvalidDistribution(String),

    /// Operation that needs at least one observed state
    #[error("Episode has no state")]
    EmptyEpisode,

    /// Environment-related errors
    #[error("Environment error: {0}")]
    Environment(String),

    /// Model-related errors
    #[error("Model error: {0}")]
    Model(String),

    /// Bridge peer went away or broke the protocol
    #[error("Bridge error: {0}")]
    Bridge(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl RLError {
    /// Shorthand for a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result type alias for RL operations
pub type Result<T> = std::result::Result<T, RLError>;
