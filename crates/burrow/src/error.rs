//! # Simulation Errors

use thiserror::Error;

use burrow_core::BurrowError;

/// Errors raised while loading a config or assembling a simulation.
#[derive(Error, Debug)]
pub enum SimulationError {
    /// World, generator or agent setup failed.
    #[error(transparent)]
    World(#[from] BurrowError),

    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for `SimulationConfig`.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Result type for simulation setup.
pub type SimulationResult<T> = Result<T, SimulationError>;
