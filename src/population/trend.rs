// src/population/trend.rs

//! Trend-tracking populations approximating a Prandtl–Ishlinskii kernel.

use super::agent_population::TrendPopulation;
use super::density::{GammaDensity, grid};
use crate::agents::trend_agent::TrendAgent;
use crate::config::TrendPopulationConfig;
use crate::error::Result;
use crate::types::AgentState;
use log::info;

pub const TREND_POPULATION: &str = "trend";

/// One bucket of agents per threshold on the grid. A bucket at threshold β
/// holds `round(2 * total_inventory * pdf(β) * step)` agents. Holding and
/// not holding alternate by slot across the whole population, so it holds
/// about `total_inventory` units. Holders are taken to have bought at `entry_price`.
pub fn generate(
    config: &TrendPopulationConfig,
    total_inventory: usize,
    entry_price: f64,
) -> Result<TrendPopulation> {
    let density = GammaDensity::new(config.beta_shape, config.beta_scale)?;

    let mut layers = Vec::new();
    let mut next_slot = 0;

    for beta in grid(config.beta_min, config.beta_max, config.beta_step)
        .into_iter()
        .filter(|beta| *beta > 0.0)
    {
        let bucket =
            (2.0 * total_inventory as f64 * density.pdf(beta) * config.beta_step).round() as usize;
        let agents = (0..bucket)
            .map(|i| {
                let state = if (next_slot + i) % 2 == 0 {
                    AgentState::WantToSell
                } else {
                    AgentState::WantToBuy
                };
                TrendAgent::new(next_slot + i, state, beta, beta, entry_price)
            })
            .collect::<Result<Vec<_>>>()?;
        next_slot += agents.len();
        layers.push(agents);
    }

    let population = TrendPopulation::from_layers(TREND_POPULATION, layers)?;
    info!(
        "{} population: {} agents, {} units held, thresholds [{:.3}, {:.3}]",
        population.name(),
        population.len(),
        population.held_units(),
        population.min_bound(),
        population.max_bound()
    );
    Ok(population)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agents::agent_trait::Trader;
    use crate::error::HysteresisError;

    #[test]
    fn test_holds_about_the_requested_inventory() {
        let config = TrendPopulationConfig::default();
        let population = generate(&config, 200, 0.0).unwrap();

        let held = population.held_units() as f64;
        assert!((held - 200.0).abs() < 20.0, "held {held}");
        assert_eq!(population.held_units(), population.len().div_ceil(2));
    }

    #[test]
    fn test_odd_buckets_do_not_skew_the_split() {
        // Far tail: many buckets of a single agent.
        let config = TrendPopulationConfig {
            beta_max: 40.0,
            ..TrendPopulationConfig::default()
        };
        let population = generate(&config, 30, 0.0).unwrap();

        let held = population.held_units();
        let empty_handed = population.len() - held;
        assert!(held == empty_handed || held == empty_handed + 1, "{held} vs {empty_handed}");
        for (slot, agent) in population.agents().iter().enumerate() {
            assert_eq!(agent.holds_unit(), slot % 2 == 0);
        }
    }

    #[test]
    fn test_thresholds_are_positive_and_bucketed() {
        let config = TrendPopulationConfig::default();
        let population = generate(&config, 100, 0.0).unwrap();

        assert!(population.min_bound() > 0.0);
        assert!(population.max_bound() <= config.beta_max);
        for layer in 0..population.layer_count() {
            let agents = population.layer(layer);
            let beta = agents[0].buying_threshold();
            assert!(agents.iter().all(|a| a.buying_threshold() == beta));
            assert!(agents.iter().all(|a| a.selling_threshold() == beta));
        }
    }

    #[test]
    fn test_holders_start_at_entry_price_without_extremes() {
        let population = generate(&TrendPopulationConfig::default(), 50, 3.5).unwrap();
        for agent in population.agents() {
            assert_eq!(agent.tracked_min(), None);
            assert_eq!(agent.tracked_max(), None);
            match agent.state() {
                AgentState::WantToSell => assert_eq!(agent.held_price(), Some(3.5)),
                AgentState::WantToBuy => assert_eq!(agent.held_price(), None),
            }
        }
    }

    #[test]
    fn test_zero_inventory_is_an_empty_population() {
        let err = generate(&TrendPopulationConfig::default(), 0, 0.0).unwrap_err();
        assert!(matches!(err, HysteresisError::EmptyPopulation(_)));
    }
}
