// src/agents/threshold_agent.rs

use super::agent_trait::{Position, Trader};
use crate::error::{HysteresisError, Result};
use crate::types::{AgentId, AgentKind, AgentState};
use std::cmp::Ordering;

/// A non-ideal relay: buys at or below `lower_bound`, sells at or above
/// `upper_bound`, and ignores every price in between.
#[derive(Debug, Clone)]
pub struct ThresholdAgent {
    id: AgentId,
    position: Position,
    lower_bound: f64,
    upper_bound: f64,
}

impl ThresholdAgent {
    /// Agents that start in `WantToSell` are taken to have bought at their lower bound.
    pub fn new(slot: usize, state: AgentState, lower_bound: f64, upper_bound: f64) -> Result<Self> {
        if lower_bound.partial_cmp(&upper_bound) != Some(Ordering::Less) {
            return Err(HysteresisError::InvalidBounds {
                lower: lower_bound,
                upper: upper_bound,
            });
        }
        Ok(Self {
            id: AgentId::new(AgentKind::Threshold, slot),
            position: Position::new(state, lower_bound),
            lower_bound,
            upper_bound,
        })
    }

    pub fn lower_bound(&self) -> f64 {
        self.lower_bound
    }

    pub fn upper_bound(&self) -> f64 {
        self.upper_bound
    }
}

impl Trader for ThresholdAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn position(&self) -> &Position {
        &self.position
    }

    fn position_mut(&mut self) -> &mut Position {
        &mut self.position
    }

    fn buying_signal(&self, price: f64) -> bool {
        self.state() == AgentState::WantToBuy && price <= self.lower_bound
    }

    fn selling_signal(&self, price: f64) -> bool {
        self.state() == AgentState::WantToSell && price >= self.upper_bound
    }

    fn span(&self) -> (f64, f64) {
        (self.lower_bound, self.upper_bound)
    }
}
