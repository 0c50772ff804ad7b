// src/population/threshold.rs

//! Layered relay populations approximating a Preisach kernel.

use super::agent_population::ThresholdPopulation;
use super::density::{GammaDensity, grid, relay_count};
use crate::agents::threshold_agent::ThresholdAgent;
use crate::config::{MIN_DECAY, ThresholdPopulationConfig};
use crate::error::{HysteresisError, Result};
use crate::types::AgentState;
use log::{debug, info};
use rand::Rng;
use rand_distr::{Distribution, Gamma, Uniform};

pub const THRESHOLD_POPULATION: &str = "threshold";

/// One stack of `relays` relays of equal `width` around `base`.
///
/// Agent `i` gets `lower = base + (i - relays / 2) * width` and
/// `upper = lower + width`; it starts holding a unit iff `lower >= 0`.
/// Slots are assigned from `first_slot` upwards.
pub fn layer(first_slot: usize, base: f64, width: f64, relays: usize) -> Result<Vec<ThresholdAgent>> {
    let half = (relays / 2) as f64;
    (0..relays)
        .map(|i| {
            let lower = base + (i as f64 - half) * width;
            let state = if lower >= 0.0 {
                AgentState::WantToSell
            } else {
                AgentState::WantToBuy
            };
            ThresholdAgent::new(first_slot + i, state, lower, lower + width)
        })
        .collect()
}

/// Lays widths on the configured grid, weights each by the width density,
/// and stacks one layer per draw of decay and base offset.
pub fn generate<R: Rng + ?Sized>(
    config: &ThresholdPopulationConfig,
    rng: &mut R,
) -> Result<ThresholdPopulation> {
    let width_density = GammaDensity::new(config.width_shape, config.width_scale)?;
    let decay_distribution = Gamma::new(config.decay_shape, config.decay_scale)
        .map_err(|e| HysteresisError::InvalidConfig(format!("decay density: {e}")))?;

    let mut layers = Vec::new();
    let mut next_slot = 0;

    for width in grid(config.width_min, config.width_max, config.width_step) {
        let count = (config.width_weight * width_density.pdf(width)).round() as usize + config.width_floor;

        for _ in 0..count {
            let decay = (config.decay_weight * decay_distribution.sample(rng)).max(MIN_DECAY);
            let base = if config.offset_spread > 0.0 {
                Uniform::new_inclusive(-config.offset_spread, config.offset_spread).sample(rng)
            } else {
                0.0
            };
            let relays = relay_count(decay, config.saturation, config.max_relays);
            debug!(
                "threshold layer: width {:.3}, decay {:.3}, base {:.3}, relays {}",
                width, decay, base, relays
            );

            let agents = layer(next_slot, base, width, relays)?;
            next_slot += agents.len();
            layers.push(agents);
        }
    }

    let population = ThresholdPopulation::from_layers(THRESHOLD_POPULATION, layers)?;
    info!(
        "{} population: {} agents in {} layers, {} units held, bounds [{:.3}, {:.3}]",
        population.name(),
        population.len(),
        population.layer_count(),
        population.held_units(),
        population.min_bound(),
        population.max_bound()
    );
    Ok(population)
}
