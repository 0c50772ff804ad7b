// src/agents/polling.rs

//! Replays a price path against a single agent, outside of any round.

use super::agent_trait::Trader;
use crate::market::Market;
use log::debug;

/// Offers every price as a buy attempt and then a sell attempt, committing
/// on the spot whenever the agent's own signal passes. Returns the number of trades.
pub fn poll<A: Trader>(agent: &mut A, prices: &[f64]) -> usize {
    let mut market = Market::new();
    let mut trades = 0;

    for &price in prices {
        if agent.submit_buy(price, &mut market) {
            agent.commit_buy(price);
            market.reset();
            trades += 1;
            debug!("{} bought at {}", agent.id(), price);
        }
        if agent.submit_sell(price, &mut market) {
            agent.commit_sell(price);
            market.reset();
            trades += 1;
            debug!("{} sold at {}, profit {:?}", agent.id(), price, agent.profits().last());
        }
    }

    trades
}
