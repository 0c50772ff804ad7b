// src/agents/trend_agent.rs

use super::agent_trait::{Position, Trader};
use crate::error::{HysteresisError, Result};
use crate::types::{AgentId, AgentKind, AgentState};

/// The running extremes a trend agent has seen. Only the one that matches
/// the agent's state is ever set.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tracking {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

/// A play-type element: buys once the price has risen `buying_threshold`
/// above the lowest price seen since its last sale, and sells once it has
/// fallen `selling_threshold` below the highest price seen since its last purchase.
#[derive(Debug, Clone)]
pub struct TrendAgent {
    id: AgentId,
    position: Position,
    buying_threshold: f64,
    selling_threshold: f64,
    tracking: Tracking,
}

impl TrendAgent {
    pub fn new(
        slot: usize,
        state: AgentState,
        buying_threshold: f64,
        selling_threshold: f64,
        entry_price: f64,
    ) -> Result<Self> {
        for threshold in [buying_threshold, selling_threshold] {
            if !threshold.is_finite() || threshold <= 0.0 {
                return Err(HysteresisError::InvalidThreshold(threshold));
            }
        }
        Ok(Self {
            id: AgentId::new(AgentKind::Trend, slot),
            position: Position::new(state, entry_price),
            buying_threshold,
            selling_threshold,
            tracking: Tracking::default(),
        })
    }

    pub fn buying_threshold(&self) -> f64 {
        self.buying_threshold
    }

    pub fn selling_threshold(&self) -> f64 {
        self.selling_threshold
    }

    pub fn tracking(&self) -> Tracking {
        self.tracking
    }

    pub fn tracked_min(&self) -> Option<f64> {
        self.tracking.min
    }

    pub fn tracked_max(&self) -> Option<f64> {
        self.tracking.max
    }

    /// Updates the running extreme of the current phase.
    ///
    /// Panics if the extreme of the other phase is set: tracking ran out of phase.
    pub fn track(&mut self, price: f64) {
        match self.state() {
            AgentState::WantToBuy => {
                assert!(
                    self.tracking.max.is_none(),
                    "{}: tracked_max must be None while in WantToBuy",
                    self.id
                );
                self.tracking.min = Some(self.tracking.min.map_or(price, |min| min.min(price)));
            }
            AgentState::WantToSell => {
                assert!(
                    self.tracking.min.is_none(),
                    "{}: tracked_min must be None while in WantToSell",
                    self.id
                );
                self.tracking.max = Some(self.tracking.max.map_or(price, |max| max.max(price)));
            }
        }
    }

    /// Puts back extremes captured earlier in the same phase.
    pub fn restore_tracking(&mut self, tracking: Tracking) {
        let consistent = match self.state() {
            AgentState::WantToBuy => tracking.max.is_none(),
            AgentState::WantToSell => tracking.min.is_none(),
        };
        assert!(
            consistent,
            "{}: snapshot {:?} does not match state {:?}",
            self.id,
            tracking,
            self.state()
        );
        self.tracking = tracking;
    }
}

impl Trader for TrendAgent {
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
        self.state() == AgentState::WantToBuy
            && self
                .tracking
                .min
                .is_some_and(|min| price - min >= self.buying_threshold)
    }

    fn selling_signal(&self, price: f64) -> bool {
        self.state() == AgentState::WantToSell
            && self
                .tracking
                .max
                .is_some_and(|max| max - price >= self.selling_threshold)
    }

    fn observe(&mut self, price: f64) {
        self.track(price);
    }

    // The trade price seeds the next phase.
    fn after_buy(&mut self, price: f64) {
        self.tracking = Tracking {
            min: None,
            max: Some(price),
        };
    }

    fn after_sell(&mut self, price: f64) {
        self.tracking = Tracking {
            min: Some(price),
            max: None,
        };
    }

    fn span(&self) -> (f64, f64) {
        (
            self.buying_threshold.min(self.selling_threshold),
            self.buying_threshold.max(self.selling_threshold),
        )
    }
}
