// src/lib.rs

// === 1. Declare all the top-level modules ===
pub mod agents;
pub mod config;
pub mod error;
pub mod market;
pub mod population;
pub mod simulators;
pub mod types;

// === 2. Re-export the public-facing components ===

// --- From `agents` ---
pub use agents::agent_trait::{Position, Trader};
pub use agents::exogenous_agent::ExogenousAgent;
pub use agents::threshold_agent::ThresholdAgent;
pub use agents::trend_agent::{Tracking, TrendAgent};

// --- From our `market` engine ---
pub use market::{Market, ParticipantCounts, Participants};

// --- From `population` ---
pub use population::{
    AgentPopulation, ExogenousPopulation, Populations, ThresholdPopulation, TrackingSnapshot, TrendPopulation,
};

// --- From `simulators` ---
pub use simulators::market_trait::Marketable;
pub use simulators::noise::NoiseGenerator;
pub use simulators::price_search::{PriceSearch, RoundFailure, Settlement};
pub use simulators::simulation::{RoundRecord, Simulation, SimulationSummary};

// --- Config, errors and types ---
pub use config::SimulationConfig;
pub use error::{HysteresisError, Result};
pub use types::{AgentId, AgentKind, AgentState, Intent, Side};
