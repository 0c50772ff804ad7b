// src/error.rs

use crate::types::AgentId;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HysteresisError {
    #[error("invalid bounds: lower bound {lower} must be below upper bound {upper}")]
    InvalidBounds { lower: f64, upper: f64 },

    #[error("invalid threshold {0}: thresholds must be finite and positive")]
    InvalidThreshold(f64),

    #[error("population {0} is empty")]
    EmptyPopulation(String),

    #[error("bounds of layer {layer} in population {population} are not ascending")]
    UnsortedBounds { population: String, layer: usize },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("agent {0} is not registered with any population")]
    UnknownAgent(AgentId),

    #[error("simulation stalled after {0} consecutive failed rounds")]
    Stalled(usize),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HysteresisError>;
