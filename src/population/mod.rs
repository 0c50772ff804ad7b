// src/population/mod.rs

pub mod agent_population;
pub mod density;
pub mod threshold;
pub mod trend;

pub use agent_population::{
    AgentPopulation, EXOGENOUS_POPULATION, ExogenousPopulation, ThresholdPopulation, TrackingSnapshot,
    TrendPopulation,
};

use crate::market::Market;

/// The strategic side of the market: both populations that re-ballot at
/// every trial price and persist across rounds.
#[derive(Debug, Clone)]
pub struct Populations {
    pub threshold: ThresholdPopulation,
    pub trend: TrendPopulation,
}

impl Populations {
    pub fn new(threshold: ThresholdPopulation, trend: TrendPopulation) -> Self {
        Self { threshold, trend }
    }

    pub fn len(&self) -> usize {
        self.threshold.len() + self.trend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.threshold.is_empty() && self.trend.is_empty()
    }

    pub fn held_units(&self) -> usize {
        self.threshold.held_units() + self.trend.held_units()
    }

    /// Threshold agents first, then trend agents.
    pub fn ballot(&mut self, price: f64, market: &mut Market) -> usize {
        self.threshold.ballot(price, market) + self.trend.ballot(price, market)
    }
}
