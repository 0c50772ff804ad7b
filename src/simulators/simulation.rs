// src/simulators/simulation.rs

use super::market_trait::Marketable;
use super::noise::NoiseGenerator;
use super::price_search::{PriceSearch, RoundFailure};
use crate::agents::agent_trait::Trader;
use crate::config::SimulationConfig;
use crate::error::{HysteresisError, Result};
use crate::market::{Market, ParticipantCounts};
use crate::population::{Populations, threshold, trend};
use log::{error, info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;

/// One settled round.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundRecord {
    pub index: usize,
    pub noise: i64,
    pub start_price: f64,
    pub price: f64,
    pub iterations: usize,
    /// Strategic units held after the commit.
    pub held_units: usize,
    /// Running sum of the shocks of settled rounds.
    pub cumulative_noise: i64,
    pub participants: ParticipantCounts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationSummary {
    pub settled_rounds: usize,
    pub failed_rounds: usize,
    pub final_price: f64,
    pub threshold_agents: usize,
    pub trend_agents: usize,
    pub held_units: usize,
    pub threshold_profit: f64,
    pub trend_profit: f64,
    pub settled_prices: Vec<f64>,
    pub rounds: Vec<RoundRecord>,
}

/// Owns one run: the market, both strategic populations and the shock
/// source. Rounds are played strictly one after another.
pub struct Simulation {
    config: SimulationConfig,
    market: Market,
    populations: Populations,
    noise: NoiseGenerator,
    search: PriceSearch,
    records: Vec<RoundRecord>,
    current_price: f64,
    cumulative_noise: i64,
    failed_rounds: usize,
    consecutive_failures: usize,
    last_failed_noise: Option<i64>,
}

impl Simulation {
    pub fn new(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let threshold = threshold::generate(&config.threshold, &mut rng)?;
        let inventory = config
            .trend
            .total_inventory
            .unwrap_or_else(|| threshold.held_units());
        let trend = trend::generate(&config.trend, inventory, config.initial_price)?;
        let noise = NoiseGenerator::new(&config.noise, rng)?;

        Ok(Self {
            search: PriceSearch::new(config.price_step, config.max_iterations),
            current_price: config.initial_price,
            populations: Populations::new(threshold, trend),
            market: Market::new(),
            noise,
            records: Vec::new(),
            cumulative_noise: 0,
            failed_rounds: 0,
            consecutive_failures: 0,
            last_failed_noise: None,
            config,
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn market(&self) -> &Market {
        &self.market
    }

    pub fn populations(&self) -> &Populations {
        &self.populations
    }

    pub fn records(&self) -> &[RoundRecord] {
        &self.records
    }

    pub fn failed_rounds(&self) -> usize {
        self.failed_rounds
    }

    /// Plays one round. `Ok(None)` is a failed round; the next one pushes
    /// the other way and restarts from the last settled price.
    pub fn play_round(&mut self) -> Result<Option<&RoundRecord>> {
        let noise = match self.last_failed_noise {
            Some(failed) => self.noise.next_opposite(failed)?,
            None => self.noise.next_noise()?,
        };
        let start_price = self.current_price;

        match self
            .search
            .run(&mut self.populations, &mut self.market, noise, start_price)
        {
            Ok(settlement) => {
                self.consecutive_failures = 0;
                self.last_failed_noise = None;
                self.current_price = settlement.price;
                self.cumulative_noise += noise;

                let record = RoundRecord {
                    index: self.records.len(),
                    noise,
                    start_price,
                    price: settlement.price,
                    iterations: settlement.iterations,
                    held_units: self.populations.held_units(),
                    cumulative_noise: self.cumulative_noise,
                    participants: settlement.participants,
                };
                info!(
                    "round {}: shock {}, settled at {:.4} after {} trials, {} units held",
                    record.index, noise, record.price, record.iterations, record.held_units
                );
                self.records.push(record);
                Ok(self.records.last())
            }
            Err(RoundFailure::Commit(e)) => Err(e),
            Err(failure) => {
                warn!("round {} failed: {failure}", self.records.len());
                self.failed_rounds += 1;
                self.consecutive_failures += 1;
                self.last_failed_noise = Some(noise);
                self.current_price = self.market.last_price().unwrap_or(self.config.initial_price);

                if self.consecutive_failures > self.config.max_consecutive_failures {
                    error!(
                        "giving up after {} failed rounds in a row",
                        self.consecutive_failures
                    );
                    return Err(HysteresisError::Stalled(self.consecutive_failures));
                }
                Ok(None)
            }
        }
    }

    /// Plays until `number_of_transactions` rounds have settled.
    pub fn run(&mut self) -> Result<&[RoundRecord]> {
        while self.records.len() < self.config.number_of_transactions {
            self.play_round()?;
        }
        info!(
            "simulation done: {} settled rounds, {} failed, final price {:.4}",
            self.records.len(),
            self.failed_rounds,
            self.current_price
        );
        Ok(&self.records)
    }

    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            settled_rounds: self.records.len(),
            failed_rounds: self.failed_rounds,
            final_price: self.current_price,
            threshold_agents: self.populations.threshold.len(),
            trend_agents: self.populations.trend.len(),
            held_units: self.populations.held_units(),
            threshold_profit: realized_profit(self.populations.threshold.agents()),
            trend_profit: realized_profit(self.populations.trend.agents()),
            settled_prices: self.market.settled_prices().to_vec(),
            rounds: self.records.clone(),
        }
    }
}

fn realized_profit<A: Trader>(agents: &[A]) -> f64 {
    agents.iter().flat_map(|agent| agent.profits()).sum()
}

impl Marketable for Simulation {
    fn step(&mut self) -> Result<f64> {
        let settled = self.records.len();
        while self.records.len() == settled {
            self.play_round()?;
        }
        Ok(self.current_price)
    }

    fn current_price(&self) -> f64 {
        self.current_price
    }

    fn reset(&mut self) -> Result<()> {
        *self = Simulation::new(self.config.clone())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{NoiseConfig, ThresholdPopulationConfig, TrendPopulationConfig};

    fn small_config(seed: u64) -> SimulationConfig {
        SimulationConfig {
            seed: Some(seed),
            number_of_transactions: 5,
            price_step: 0.05,
            max_iterations: 2_000,
            threshold: ThresholdPopulationConfig {
                width_max: 6.0,
                max_relays: 8,
                ..ThresholdPopulationConfig::default()
            },
            trend: TrendPopulationConfig {
                beta_max: 6.0,
                ..TrendPopulationConfig::default()
            },
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn test_trend_inventory_follows_threshold_stock() {
        let simulation = Simulation::new(small_config(1)).unwrap();
        let populations = simulation.populations();

        let stock = populations.threshold.held_units() as f64;
        let trend = populations.trend.held_units() as f64;
        assert!(trend > 0.0);
        assert!((trend - stock).abs() <= 0.25 * stock + 5.0, "trend {trend}, stock {stock}");
    }

    #[test]
    fn test_step_appends_one_settled_price() {
        // Arrange
        let mut simulation = Simulation::new(small_config(2)).unwrap();

        // Act
        let price = simulation.step().unwrap();

        // Assert
        assert_eq!(simulation.records().len(), 1);
        assert_eq!(simulation.market().settled_prices(), &[price]);
        assert_eq!(simulation.current_price(), price);
        assert_eq!(simulation.market().pending_len(), 0);
    }

    #[test]
    fn test_reset_replays_the_same_run() {
        let mut simulation = Simulation::new(small_config(3)).unwrap();
        let first: Vec<f64> = (0..3).map(|_| simulation.step().unwrap()).collect();

        simulation.reset().unwrap();
        let second: Vec<f64> = (0..3).map(|_| simulation.step().unwrap()).collect();

        assert_eq!(first, second);
        assert_eq!(simulation.records().len(), 3);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = SimulationConfig {
            max_iterations: 0,
            ..SimulationConfig::default()
        };
        assert!(matches!(
            Simulation::new(config),
            Err(HysteresisError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_noise_without_an_opposite_direction_is_rejected() {
        let mut config = small_config(6);
        config.noise = NoiseConfig { mu: 4.0, sigma: 0.5 };
        assert!(matches!(
            Simulation::new(config),
            Err(HysteresisError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_stalls_when_nothing_can_settle() {
        let config = SimulationConfig {
            price_step: 1e-9,
            max_iterations: 1,
            max_consecutive_failures: 3,
            ..small_config(4)
        };
        let mut simulation = Simulation::new(config).unwrap();

        let err = simulation.run().unwrap_err();

        assert!(matches!(err, HysteresisError::Stalled(4)));
        assert_eq!(simulation.failed_rounds(), 4);
        assert!(simulation.market().settled_prices().is_empty());
    }
}
