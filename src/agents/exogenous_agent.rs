// src/agents/exogenous_agent.rs

use super::agent_trait::{Position, Trader};
use crate::types::{AgentId, AgentKind, AgentState};

/// Injected demand or supply for a single round. Always ready to act in
/// the state it was created in; it has no thresholds.
#[derive(Debug, Clone)]
pub struct ExogenousAgent {
    id: AgentId,
    position: Position,
}

impl ExogenousAgent {
    pub fn new(slot: usize, state: AgentState, price: f64) -> Self {
        Self {
            id: AgentId::new(AgentKind::Exogenous, slot),
            position: Position::new(state, price),
        }
    }
}

impl Trader for ExogenousAgent {
    fn id(&self) -> AgentId {
        self.id
    }

    fn position(&self) -> &Position {
        &self.position
    }

    fn position_mut(&mut self) -> &mut Position {
        &mut self.position
    }

    fn buying_signal(&self, _price: f64) -> bool {
        self.state() == AgentState::WantToBuy
    }

    fn selling_signal(&self, _price: f64) -> bool {
        self.state() == AgentState::WantToSell
    }

    fn span(&self) -> (f64, f64) {
        (f64::NEG_INFINITY, f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::Market;

    #[test]
    fn test_signals_follow_state_only() {
        let buyer = ExogenousAgent::new(0, AgentState::WantToBuy, 0.0);
        let seller = ExogenousAgent::new(1, AgentState::WantToSell, 0.0);

        for price in [-1e6, 0.0, 1e6] {
            assert!(buyer.buying_signal(price));
            assert!(!buyer.selling_signal(price));
            assert!(seller.selling_signal(price));
            assert!(!seller.buying_signal(price));
        }
    }

    #[test]
    fn test_buy_and_sell() {
        let mut market = Market::new();
        let mut buyer = ExogenousAgent::new(0, AgentState::WantToBuy, 0.0);
        assert!(buyer.submit_buy(4.0, &mut market));
        buyer.commit_buy(4.0);
        assert_eq!(buyer.held_price(), Some(4.0));
        assert_eq!(buyer.state(), AgentState::WantToSell);

        let mut seller = ExogenousAgent::new(1, AgentState::WantToSell, 4.0);
        assert!(seller.submit_sell(4.0, &mut market));
        seller.commit_sell(4.0);
        assert_eq!(seller.held_price(), None);
        assert_eq!(seller.state(), AgentState::WantToBuy);
        assert_eq!(seller.profits(), &[0.0]);
    }
}
