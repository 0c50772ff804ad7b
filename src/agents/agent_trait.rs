// src/agents/agent_trait.rs

use crate::market::Market;
use crate::types::{AgentId, AgentState, Side};

/// The single unit an agent may hold, plus its trading record.
///
/// `held_price` is `Some` exactly while the agent is in `WantToSell`.
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    state: AgentState,
    held_price: Option<f64>,
    profits: Vec<f64>,
}

impl Position {
    /// Agents that start out holding a unit must say what they paid for it.
    pub fn new(state: AgentState, entry_price: f64) -> Self {
        let held_price = match state {
            AgentState::WantToSell => Some(entry_price),
            AgentState::WantToBuy => None,
        };
        Self {
            state,
            held_price,
            profits: Vec::new(),
        }
    }

    pub fn state(&self) -> AgentState {
        self.state
    }

    pub fn held_price(&self) -> Option<f64> {
        self.held_price
    }

    pub fn profits(&self) -> &[f64] {
        &self.profits
    }

    fn settle_buy(&mut self, price: f64) {
        assert_eq!(
            self.state,
            AgentState::WantToBuy,
            "commit_buy on an agent that already holds a unit"
        );
        self.held_price = Some(price);
        self.state = AgentState::WantToSell;
    }

    fn settle_sell(&mut self, price: f64) {
        assert_eq!(
            self.state,
            AgentState::WantToSell,
            "commit_sell on an agent that holds nothing"
        );
        let paid = self
            .held_price
            .take()
            .expect("an agent in WantToSell always has a held price");
        self.profits.push(price - paid);
        self.state = AgentState::WantToBuy;
    }
}

/// The interface shared by every strategy.
///
/// Implementors supply the signal predicates; submission and commit are
/// provided so that the state machine is identical for all kinds.
pub trait Trader {
    fn id(&self) -> AgentId;
    fn position(&self) -> &Position;
    fn position_mut(&mut self) -> &mut Position;

    /// Pure: would this agent buy at `price` right now?
    fn buying_signal(&self, price: f64) -> bool;
    /// Pure: would this agent sell at `price` right now?
    fn selling_signal(&self, price: f64) -> bool;

    /// Runs before every signal evaluation made through `submit_*`.
    fn observe(&mut self, _price: f64) {}

    /// Strategy bookkeeping after the position has been settled.
    fn after_buy(&mut self, _price: f64) {}
    fn after_sell(&mut self, _price: f64) {}

    /// The `(low, high)` parameters that place this agent in its population,
    /// bounds for relays and thresholds for trackers.
    fn span(&self) -> (f64, f64);

    fn state(&self) -> AgentState {
        self.position().state()
    }

    fn held_price(&self) -> Option<f64> {
        self.position().held_price()
    }

    fn profits(&self) -> &[f64] {
        self.position().profits()
    }

    fn holds_unit(&self) -> bool {
        self.state() == AgentState::WantToSell
    }

    /// Registers a buy intent if the signal passes. The agent itself is not
    /// mutated until the market commits.
    fn submit_buy(&mut self, price: f64, market: &mut Market) -> bool {
        self.observe(price);
        if !self.buying_signal(price) {
            return false;
        }
        market.submit(self.id(), Side::Buy, price);
        true
    }

    fn submit_sell(&mut self, price: f64, market: &mut Market) -> bool {
        self.observe(price);
        if !self.selling_signal(price) {
            return false;
        }
        market.submit(self.id(), Side::Sell, price);
        true
    }

    fn commit_buy(&mut self, price: f64) {
        self.position_mut().settle_buy(price);
        self.after_buy(price);
    }

    fn commit_sell(&mut self, price: f64) {
        self.position_mut().settle_sell(price);
        self.after_sell(price);
    }

    fn commit(&mut self, side: Side, price: f64) {
        match side {
            Side::Buy => self.commit_buy(price),
            Side::Sell => self.commit_sell(price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_starts_holding_only_when_selling() {
        let buyer = Position::new(AgentState::WantToBuy, 7.0);
        let seller = Position::new(AgentState::WantToSell, 7.0);

        assert_eq!(buyer.held_price(), None);
        assert_eq!(seller.held_price(), Some(7.0));
    }

    #[test]
    fn test_position_round_trip_records_profit() {
        let mut position = Position::new(AgentState::WantToBuy, 0.0);

        position.settle_buy(4.0);
        position.settle_sell(9.5);

        assert_eq!(position.state(), AgentState::WantToBuy);
        assert_eq!(position.held_price(), None);
        assert_eq!(position.profits(), &[5.5]);
    }

    #[test]
    #[should_panic(expected = "already holds")]
    fn test_double_buy_is_fatal() {
        let mut position = Position::new(AgentState::WantToBuy, 0.0);
        position.settle_buy(1.0);
        position.settle_buy(2.0);
    }
}
