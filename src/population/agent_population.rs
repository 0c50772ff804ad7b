// src/population/agent_population.rs

use crate::agents::agent_trait::Trader;
use crate::agents::exogenous_agent::ExogenousAgent;
use crate::agents::threshold_agent::ThresholdAgent;
use crate::agents::trend_agent::{TrendAgent, Tracking};
use crate::error::{HysteresisError, Result};
use crate::market::Market;
use crate::types::{AgentId, AgentState};
use std::ops::Range;

pub const EXOGENOUS_POPULATION: &str = "exogenous";

/// A homogeneous set of agents, grouped into layers that share a generation rule.
///
/// Agents are stored flat; an agent's slot in its id is its index here.
/// Inside every layer both ends of the span are non-decreasing, so the lowest
/// and highest bound of a layer are its first and last agents.
#[derive(Debug, Clone)]
pub struct AgentPopulation<A> {
    name: String,
    agents: Vec<A>,
    layers: Vec<Range<usize>>,
}

pub type ThresholdPopulation = AgentPopulation<ThresholdAgent>;
pub type TrendPopulation = AgentPopulation<TrendAgent>;
pub type ExogenousPopulation = AgentPopulation<ExogenousAgent>;

/// Trend extremes captured at the start of a round, indexed by slot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TrackingSnapshot(Vec<Tracking>);

impl TrackingSnapshot {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<A: Trader> AgentPopulation<A> {
    /// Builds a population from its layers. Empty layers are dropped.
    ///
    /// Fails if there are no agents, if slots do not match positions, or if
    /// a layer's bounds are not ascending.
    pub fn from_layers(name: impl Into<String>, layers: Vec<Vec<A>>) -> Result<Self> {
        let name = name.into();
        let mut agents = Vec::new();
        let mut ranges = Vec::new();

        for layer in layers.into_iter().filter(|layer| !layer.is_empty()) {
            let start = agents.len();
            agents.extend(layer);
            ranges.push(start..agents.len());
        }

        if agents.is_empty() {
            return Err(HysteresisError::EmptyPopulation(name));
        }

        let kind = agents[0].id().kind;
        for (index, agent) in agents.iter().enumerate() {
            let id = agent.id();
            if id.kind != kind || id.index() != index {
                return Err(HysteresisError::InvalidConfig(format!(
                    "population {name}: agent {id} sits at slot {index}"
                )));
            }
        }

        for (layer, range) in ranges.iter().enumerate() {
            let ascending = agents[range.clone()].windows(2).all(|pair| {
                let (low_a, high_a) = pair[0].span();
                let (low_b, high_b) = pair[1].span();
                low_a <= low_b && high_a <= high_b
            });
            if !ascending {
                return Err(HysteresisError::UnsortedBounds {
                    population: name,
                    layer,
                });
            }
        }

        Ok(Self {
            name,
            agents,
            layers: ranges,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layer(&self, index: usize) -> &[A] {
        &self.agents[self.layers[index].clone()]
    }

    pub fn agents(&self) -> &[A] {
        &self.agents
    }

    pub fn get(&self, id: AgentId) -> Option<&A> {
        self.agents.get(id.index()).filter(|agent| agent.id() == id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut A> {
        self.agents.get_mut(id.index()).filter(|agent| agent.id() == id)
    }

    /// Units currently held, i.e. agents in `WantToSell`.
    pub fn held_units(&self) -> usize {
        self.agents.iter().filter(|agent| agent.holds_unit()).count()
    }

    /// Lowest lower bound of a layer, read off its first agent.
    pub fn lowest_bound(&self, layer: usize) -> f64 {
        self.agents[self.layers[layer].start].span().0
    }

    /// Highest upper bound of a layer, read off its last agent.
    pub fn highest_bound(&self, layer: usize) -> f64 {
        self.agents[self.layers[layer].end - 1].span().1
    }

    pub fn min_bound(&self) -> f64 {
        (0..self.layers.len())
            .map(|layer| self.lowest_bound(layer))
            .fold(f64::INFINITY, f64::min)
    }

    pub fn max_bound(&self) -> f64 {
        (0..self.layers.len())
            .map(|layer| self.highest_bound(layer))
            .fold(f64::NEG_INFINITY, f64::max)
    }

    pub fn min_width(&self) -> f64 {
        self.agents
            .iter()
            .map(|agent| agent.span().1 - agent.span().0)
            .fold(f64::INFINITY, f64::min)
    }

    pub fn max_width(&self) -> f64 {
        self.agents
            .iter()
            .map(|agent| agent.span().1 - agent.span().0)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Every agent re-evaluates its own signals at `price`; those whose signal
    /// passes register with the market. Returns how many submitted.
    pub fn ballot(&mut self, price: f64, market: &mut Market) -> usize {
        let mut submitted = 0;
        for agent in self.agents.iter_mut() {
            if agent.submit_buy(price, market) {
                submitted += 1;
            }
            if agent.submit_sell(price, market) {
                submitted += 1;
            }
        }
        submitted
    }
}

impl AgentPopulation<ExogenousAgent> {
    /// `count` exogenous agents, all in `state`, for one round's shock.
    pub fn shock(state: AgentState, count: usize, price: f64) -> Self {
        let agents: Vec<ExogenousAgent> = (0..count)
            .map(|slot| ExogenousAgent::new(slot, state, price))
            .collect();
        let layers = if agents.is_empty() { Vec::new() } else { vec![0..agents.len()] };
        Self {
            name: EXOGENOUS_POPULATION.to_string(),
            agents,
            layers,
        }
    }
}

impl AgentPopulation<TrendAgent> {
    pub fn snapshot_tracking(&self) -> TrackingSnapshot {
        TrackingSnapshot(self.agents.iter().map(TrendAgent::tracking).collect())
    }

    /// Reverts every agent's extremes to the snapshot.
    pub fn restore_tracking(&mut self, snapshot: &TrackingSnapshot) {
        assert_eq!(
            snapshot.len(),
            self.agents.len(),
            "snapshot was taken from a different population"
        );
        for (agent, tracking) in self.agents.iter_mut().zip(snapshot.0.iter()) {
            agent.restore_tracking(*tracking);
        }
    }
}
