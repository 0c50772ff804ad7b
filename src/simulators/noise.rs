// src/simulators/noise.rs

use crate::config::{NOISE_MAX_DRAWS, NoiseConfig};
use crate::error::{HysteresisError, Result};
use rand::rngs::StdRng;
use rand_distr::{Distribution, Normal};

/// Draws the per-round exogenous shock: a normal sample rounded to the
/// nearest integer, never zero. Negative is net buying, positive net selling.
pub struct NoiseGenerator {
    rng: StdRng,
    normal_dist: Normal<f64>,
    max_draws: usize,
}

impl NoiseGenerator {
    pub fn new(config: &NoiseConfig, rng: StdRng) -> Result<Self> {
        config.validate()?;
        let normal_dist = Normal::new(config.mu, config.sigma)
            .map_err(|e| HysteresisError::InvalidConfig(format!("noise: {e}")))?;
        Ok(Self {
            rng,
            normal_dist,
            max_draws: NOISE_MAX_DRAWS,
        })
    }

    /// Caps how many samples a single shock may take before giving up.
    pub fn with_max_draws(mut self, max_draws: usize) -> Self {
        self.max_draws = max_draws;
        self
    }

    pub fn next_noise(&mut self) -> Result<i64> {
        self.draw(|_| true)
    }

    /// A shock pushing the other way from `failed`.
    pub fn next_opposite(&mut self, failed: i64) -> Result<i64> {
        self.draw(|noise| noise.signum() != failed.signum())
    }

    fn draw(&mut self, accept: impl Fn(i64) -> bool) -> Result<i64> {
        for _ in 0..self.max_draws {
            let noise = self.normal_dist.sample(&mut self.rng).round() as i64;
            if noise != 0 && accept(noise) {
                return Ok(noise);
            }
        }
        Err(HysteresisError::InvalidConfig(format!(
            "no acceptable noise in {} draws from {:?}",
            self.max_draws, self.normal_dist
        )))
    }
}
