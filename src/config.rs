// src/config.rs

//! A centralized place for tuning simulation parameters.

use crate::error::{HysteresisError, Result};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, Normal};
use std::fs;
use std::path::Path;

// --- Run ---
pub const DEFAULT_SEED: u64 = 123;
pub const NUMBER_OF_TRANSACTIONS: usize = 100;
pub const INITIAL_PRICE: f64 = 0.0;
pub const PRICE_STEP: f64 = 0.001;
pub const MAX_ITERATIONS: usize = 5_000;
// A failed round flips the next shock's direction, so long failure streaks mean a stuck market.
pub const MAX_CONSECUTIVE_FAILURES: usize = 50;

// --- Noise (exogenous shock per round) ---
pub const NOISE_MU: f64 = 0.0;
pub const NOISE_SIGMA: f64 = 0.5;
// Each direction must round to a nonzero shock at least this often.
pub const NOISE_MIN_TAIL: f64 = 1e-3;
// Bound on |mu| and sigma; a shock materializes one agent per unit.
pub const NOISE_MAX_SPREAD: f64 = 1_000.0;
pub const NOISE_MAX_DRAWS: usize = 100_000;

// --- Threshold population (Preisach kernel) ---
pub const WIDTH_MIN: f64 = 1.0;
pub const WIDTH_MAX: f64 = 20.0;
pub const WIDTH_STEP: f64 = 1.0;
pub const WIDTH_SHAPE: f64 = 7.5;
pub const WIDTH_SCALE: f64 = 1.0;
pub const WIDTH_WEIGHT: f64 = 20.0;
pub const WIDTH_FLOOR: usize = 2;
pub const DECAY_SHAPE: f64 = 2.0;
pub const DECAY_SCALE: f64 = 2.0;
pub const DECAY_WEIGHT: f64 = 0.25;
pub const MIN_DECAY: f64 = 1e-3;
pub const OFFSET_SPREAD: f64 = 1.0;
pub const SATURATION: f64 = 0.95;
pub const MAX_RELAYS: usize = 64;

// --- Trend population (Prandtl–Ishlinskii kernel) ---
pub const BETA_MIN: f64 = 0.0;
pub const BETA_MAX: f64 = 20.0;
pub const BETA_STEP: f64 = 0.5;
pub const BETA_SHAPE: f64 = 2.0;
pub const BETA_SCALE: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoiseConfig {
    pub mu: f64,
    pub sigma: f64,
}

impl NoiseConfig {
    /// Both a buying and a selling shock must be reachable, so that a failed
    /// round can always be followed by one pushing the other way.
    pub fn validate(&self) -> Result<()> {
        ensure(
            self.mu.is_finite() && self.mu.abs() <= NOISE_MAX_SPREAD,
            format!("noise mu must be finite and at most {NOISE_MAX_SPREAD} in magnitude"),
        )?;
        ensure(
            positive(self.sigma) && self.sigma <= NOISE_MAX_SPREAD,
            format!("noise sigma must be positive and at most {NOISE_MAX_SPREAD}"),
        )?;

        let normal = Normal::new(self.mu, self.sigma)
            .map_err(|e| HysteresisError::InvalidConfig(format!("noise: {e}")))?;
        // round() maps [0.5, inf) to a positive shock and (-inf, -0.5] to a negative one.
        let buying = normal.cdf(-0.5);
        let selling = normal.sf(0.5);
        ensure(
            buying >= NOISE_MIN_TAIL && selling >= NOISE_MIN_TAIL,
            format!(
                "noise (mu {}, sigma {}) gives buying shocks with probability {buying:.2e} \
                 and selling shocks with {selling:.2e}; both need at least {NOISE_MIN_TAIL}",
                self.mu, self.sigma
            ),
        )
    }
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            mu: NOISE_MU,
            sigma: NOISE_SIGMA,
        }
    }
}

/// Layer widths are laid on a grid and weighted by a gamma density; each
/// layer's relay count comes from its sampled decay and the target saturation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdPopulationConfig {
    pub width_min: f64,
    pub width_max: f64,
    pub width_step: f64,
    pub width_shape: f64,
    pub width_scale: f64,
    pub width_weight: f64,
    pub width_floor: usize,
    pub decay_shape: f64,
    pub decay_scale: f64,
    pub decay_weight: f64,
    pub offset_spread: f64,
    pub saturation: f64,
    pub max_relays: usize,
}

impl Default for ThresholdPopulationConfig {
    fn default() -> Self {
        Self {
            width_min: WIDTH_MIN,
            width_max: WIDTH_MAX,
            width_step: WIDTH_STEP,
            width_shape: WIDTH_SHAPE,
            width_scale: WIDTH_SCALE,
            width_weight: WIDTH_WEIGHT,
            width_floor: WIDTH_FLOOR,
            decay_shape: DECAY_SHAPE,
            decay_scale: DECAY_SCALE,
            decay_weight: DECAY_WEIGHT,
            offset_spread: OFFSET_SPREAD,
            saturation: SATURATION,
            max_relays: MAX_RELAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendPopulationConfig {
    pub beta_min: f64,
    pub beta_max: f64,
    pub beta_step: f64,
    pub beta_shape: f64,
    pub beta_scale: f64,
    /// Units the trend population should hold. `None` matches the threshold population.
    pub total_inventory: Option<usize>,
}

impl Default for TrendPopulationConfig {
    fn default() -> Self {
        Self {
            beta_min: BETA_MIN,
            beta_max: BETA_MAX,
            beta_step: BETA_STEP,
            beta_shape: BETA_SHAPE,
            beta_scale: BETA_SCALE,
            total_inventory: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub seed: Option<u64>,
    pub number_of_transactions: usize,
    pub initial_price: f64,
    pub price_step: f64,
    pub max_iterations: usize,
    pub max_consecutive_failures: usize,
    pub noise: NoiseConfig,
    pub threshold: ThresholdPopulationConfig,
    pub trend: TrendPopulationConfig,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: Some(DEFAULT_SEED),
            number_of_transactions: NUMBER_OF_TRANSACTIONS,
            initial_price: INITIAL_PRICE,
            price_step: PRICE_STEP,
            max_iterations: MAX_ITERATIONS,
            max_consecutive_failures: MAX_CONSECUTIVE_FAILURES,
            noise: NoiseConfig::default(),
            threshold: ThresholdPopulationConfig::default(),
            trend: TrendPopulationConfig::default(),
        }
    }
}

fn ensure(condition: bool, message: impl Into<String>) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(HysteresisError::InvalidConfig(message.into()))
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl SimulationConfig {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        ensure(self.initial_price.is_finite(), "initial_price must be finite")?;
        ensure(positive(self.price_step), "price_step must be positive")?;
        ensure(self.max_iterations > 0, "max_iterations must be at least 1")?;
        self.noise.validate()?;

        let t = &self.threshold;
        ensure(
            positive(t.width_min) && t.width_min <= t.width_max,
            "threshold widths must satisfy 0 < width_min <= width_max",
        )?;
        ensure(positive(t.width_step), "width_step must be positive")?;
        ensure(
            positive(t.width_shape) && positive(t.width_scale),
            "width density needs a positive shape and scale",
        )?;
        ensure(
            t.width_weight >= 0.0 && t.width_weight.is_finite(),
            "width_weight must be non-negative",
        )?;
        ensure(
            positive(t.decay_shape) && positive(t.decay_scale) && positive(t.decay_weight),
            "decay density needs a positive shape, scale and weight",
        )?;
        ensure(
            t.offset_spread >= 0.0 && t.offset_spread.is_finite(),
            "offset_spread must be non-negative",
        )?;
        ensure(
            t.saturation > 0.0 && t.saturation < 1.0,
            "saturation must lie strictly between 0 and 1",
        )?;
        ensure(t.max_relays > 0, "max_relays must be at least 1")?;

        let d = &self.trend;
        ensure(
            d.beta_min.is_finite() && d.beta_min < d.beta_max,
            "trend thresholds must satisfy beta_min < beta_max",
        )?;
        ensure(positive(d.beta_step), "beta_step must be positive")?;
        ensure(
            positive(d.beta_shape) && positive(d.beta_scale),
            "beta density needs a positive shape and scale",
        )?;
        Ok(())
    }
}
