// src/market.rs

use crate::agents::agent_trait::Trader;
use crate::error::{HysteresisError, Result};
use crate::population::{ExogenousPopulation, ThresholdPopulation, TrackingSnapshot, TrendPopulation};
use crate::types::{AgentId, AgentKind, Intent, Side};
use log::debug;
use serde::Serialize;
use std::collections::HashMap;

/// The clearing engine. Collects the intents of one ballot, keeps the
/// buy and sell tallies, and either commits them at a price or rolls them back.
///
/// One round is open at a time; the owner of the market drives it.
#[derive(Debug, Default)]
pub struct Market {
    pending: HashMap<AgentId, Intent>,
    buy_count: usize,
    sell_count: usize,
    settled_prices: Vec<f64>,
}

/// Mutable access to every population an id in `pending` can refer to.
pub struct Participants<'a> {
    pub threshold: &'a mut ThresholdPopulation,
    pub trend: &'a mut TrendPopulation,
    pub exogenous: &'a mut ExogenousPopulation,
}

impl Participants<'_> {
    pub fn contains(&self, id: AgentId) -> bool {
        match id.kind {
            AgentKind::Threshold => self.threshold.get(id).is_some(),
            AgentKind::Trend => self.trend.get(id).is_some(),
            AgentKind::Exogenous => self.exogenous.get(id).is_some(),
        }
    }

    pub fn trader_mut(&mut self, id: AgentId) -> Option<&mut dyn Trader> {
        match id.kind {
            AgentKind::Threshold => self.threshold.get_mut(id).map(|a| a as &mut dyn Trader),
            AgentKind::Trend => self.trend.get_mut(id).map(|a| a as &mut dyn Trader),
            AgentKind::Exogenous => self.exogenous.get_mut(id).map(|a| a as &mut dyn Trader),
        }
    }
}

/// Who took part in a committed ballot, by kind and side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ParticipantCounts {
    pub threshold_buyers: usize,
    pub threshold_sellers: usize,
    pub trend_buyers: usize,
    pub trend_sellers: usize,
    pub exogenous_buyers: usize,
    pub exogenous_sellers: usize,
}

impl ParticipantCounts {
    fn record(&mut self, kind: AgentKind, side: Side) {
        let slot = match (kind, side) {
            (AgentKind::Threshold, Side::Buy) => &mut self.threshold_buyers,
            (AgentKind::Threshold, Side::Sell) => &mut self.threshold_sellers,
            (AgentKind::Trend, Side::Buy) => &mut self.trend_buyers,
            (AgentKind::Trend, Side::Sell) => &mut self.trend_sellers,
            (AgentKind::Exogenous, Side::Buy) => &mut self.exogenous_buyers,
            (AgentKind::Exogenous, Side::Sell) => &mut self.exogenous_sellers,
        };
        *slot += 1;
    }

    pub fn buyers(&self) -> usize {
        self.threshold_buyers + self.trend_buyers + self.exogenous_buyers
    }

    pub fn sellers(&self) -> usize {
        self.threshold_sellers + self.trend_sellers + self.exogenous_sellers
    }
}

impl Market {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an intent whose signal already passed. A second submission
    /// by the same agent replaces the first.
    pub fn submit(&mut self, id: AgentId, side: Side, price: f64) {
        if let Some(previous) = self.pending.insert(id, Intent { side, price }) {
            self.uncount(previous.side);
        }
        match side {
            Side::Buy => self.buy_count += 1,
            Side::Sell => self.sell_count += 1,
        }
    }

    fn uncount(&mut self, side: Side) {
        match side {
            Side::Buy => self.buy_count -= 1,
            Side::Sell => self.sell_count -= 1,
        }
    }

    /// Supply and demand balance in number of units. Prices are not matched.
    pub fn exchangable(&self) -> bool {
        self.buy_count == self.sell_count
    }

    /// `buy_count - sell_count`.
    pub fn imbalance(&self) -> i64 {
        self.buy_count as i64 - self.sell_count as i64
    }

    pub fn buy_count(&self) -> usize {
        self.buy_count
    }

    pub fn sell_count(&self) -> usize {
        self.sell_count
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn pending(&self) -> impl Iterator<Item = (&AgentId, &Intent)> {
        self.pending.iter()
    }

    pub fn settled_prices(&self) -> &[f64] {
        &self.settled_prices
    }

    pub fn last_price(&self) -> Option<f64> {
        self.settled_prices.last().copied()
    }

    /// Settles every pending intent at `price` and appends it to the history.
    ///
    /// All ids are checked first; on an unknown id nothing is mutated.
    pub fn commit(&mut self, price: f64, participants: &mut Participants) -> Result<ParticipantCounts> {
        if let Some(id) = self.pending.keys().find(|id| !participants.contains(**id)) {
            return Err(HysteresisError::UnknownAgent(*id));
        }

        let mut counts = ParticipantCounts::default();
        for (id, intent) in self.pending.drain() {
            let trader = participants
                .trader_mut(id)
                .ok_or(HysteresisError::UnknownAgent(id))?;
            trader.commit(intent.side, price);
            counts.record(id.kind, intent.side);
        }

        self.buy_count = 0;
        self.sell_count = 0;
        self.settled_prices.push(price);
        debug!(
            "committed at {:.4}: {} buyers, {} sellers",
            price,
            counts.buyers(),
            counts.sellers()
        );
        Ok(counts)
    }

    /// Rolls back a failed trial: drops every strategic intent and puts the
    /// trend agents' extremes back to `snapshot`. Exogenous intents stay.
    /// Returns how many intents were dropped.
    pub fn restore(&mut self, trend: &mut TrendPopulation, snapshot: &TrackingSnapshot) -> usize {
        let before = self.pending.len();
        let (mut buys, mut sells) = (0, 0);
        self.pending.retain(|id, intent| {
            if !id.kind.is_strategic() {
                return true;
            }
            match intent.side {
                Side::Buy => buys += 1,
                Side::Sell => sells += 1,
            }
            false
        });
        self.buy_count -= buys;
        self.sell_count -= sells;

        trend.restore_tracking(snapshot);
        before - self.pending.len()
    }

    /// Drops everything pending, exogenous intents included.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.buy_count = 0;
        self.sell_count = 0;
    }

    #[cfg(test)]
    pub(crate) fn recount(&self) -> (usize, usize) {
        let buys = self.pending.values().filter(|i| i.side == Side::Buy).count();
        (buys, self.pending.len() - buys)
    }
}
