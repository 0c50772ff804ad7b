// src/simulators/market_trait.rs

use crate::error::Result;

/// A trait for any object that can simulate a market price.
/// This allows for a pluggable simulation engine.
pub trait Marketable {
    /// Advances the simulation to its next settled price.
    fn step(&mut self) -> Result<f64>;

    /// Returns the current price without advancing the simulation.
    fn current_price(&self) -> f64;

    /// Resets the simulation to its initial state.
    fn reset(&mut self) -> Result<()>;
}
