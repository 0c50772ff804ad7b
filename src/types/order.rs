// src/types/order.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a single-unit intent registered with the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

/// Every agent is in exactly one of these states. There is no terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentState {
    WantToBuy,
    WantToSell,
}

/// The closed set of strategies an agent can follow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgentKind {
    /// Bistable relay, one Preisach element.
    Threshold,
    /// Running-extremum tracker, one Prandtl–Ishlinskii element.
    Trend,
    /// Injected, non-strategic flow for a single round.
    Exogenous,
}

/// Identity of an agent: its kind plus its slot inside the population of that kind.
///
/// A market serves one population per kind, so `(kind, slot)` is unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AgentId {
    pub kind: AgentKind,
    pub slot: u32,
}

impl AgentId {
    pub fn new(kind: AgentKind, slot: usize) -> Self {
        Self {
            kind,
            slot: slot as u32,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.slot as usize
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.kind.label(), self.slot)
    }
}

/// A pending intent: what the agent wants to do and the trial price it saw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intent {
    pub side: Side,
    pub price: f64,
}
