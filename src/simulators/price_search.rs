// src/simulators/price_search.rs

use crate::error::HysteresisError;
use crate::market::{Market, ParticipantCounts, Participants};
use crate::population::{ExogenousPopulation, Populations};
use crate::types::AgentState;
use log::{debug, warn};
use thiserror::Error;

/// Why a round ended without a price. Apart from `Commit`, every failure
/// leaves agents and market exactly as they were before the round.
#[derive(Error, Debug)]
pub enum RoundFailure {
    #[error("net buying shock but no strategic agent holds a unit")]
    NoSellers,

    #[error("net selling shock but every strategic agent already holds a unit")]
    NoBuyers,

    #[error("no settlement within {iterations} trials (last trial price {last_price})")]
    Exhausted { iterations: usize, last_price: f64 },

    #[error("commit failed: {0}")]
    Commit(#[from] HysteresisError),
}

/// The outcome of a settled round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settlement {
    pub price: f64,
    /// Stepped trials it took, the settling one included.
    pub iterations: usize,
    /// `buy_count - sell_count` at the settling trial.
    pub imbalance: i64,
    pub participants: ParticipantCounts,
}

/// Walks the trial price away from the start in the direction the shock
/// pushes it, one `price_step` at a time, until supply and demand balance
/// or the imbalance crosses zero.
#[derive(Debug, Clone, Copy)]
pub struct PriceSearch {
    pub price_step: f64,
    pub max_iterations: usize,
}

impl PriceSearch {
    pub fn new(price_step: f64, max_iterations: usize) -> Self {
        Self {
            price_step,
            max_iterations,
        }
    }

    /// Runs one round for a nonzero `noise` starting at `start_price`.
    ///
    /// Panics if `noise` is zero.
    pub fn run(
        &self,
        populations: &mut Populations,
        market: &mut Market,
        noise: i64,
        start_price: f64,
    ) -> Result<Settlement, RoundFailure> {
        assert_ne!(noise, 0, "a round needs a nonzero shock");

        let held = populations.held_units();
        if noise < 0 && held == 0 {
            warn!("shock {noise}: nobody holds a unit");
            return Err(RoundFailure::NoSellers);
        }
        if noise > 0 && held == populations.len() {
            warn!("shock {noise}: everybody already holds a unit");
            return Err(RoundFailure::NoBuyers);
        }

        let state = if noise < 0 {
            AgentState::WantToBuy
        } else {
            AgentState::WantToSell
        };
        let mut exogenous = ExogenousPopulation::shock(state, noise.unsigned_abs() as usize, start_price);
        exogenous.ballot(start_price, market);

        // Buying pushes the price up.
        let direction = if noise < 0 { 1.0 } else { -1.0 };
        let snapshot = populations.trend.snapshot_tracking();

        populations.ballot(start_price, market);
        let mut previous = market.imbalance();
        market.restore(&mut populations.trend, &snapshot);
        debug!("shock {noise} at {start_price:.4}: opening imbalance {previous}");

        let mut price = start_price;
        for iteration in 1..=self.max_iterations {
            price += direction * self.price_step;
            populations.ballot(price, market);

            let imbalance = market.imbalance();
            let crossed = previous != 0 && previous.signum() * imbalance.signum() <= 0;
            if market.exchangable() || crossed {
                let participants = market.commit(
                    price,
                    &mut Participants {
                        threshold: &mut populations.threshold,
                        trend: &mut populations.trend,
                        exogenous: &mut exogenous,
                    },
                )?;
                return Ok(Settlement {
                    price,
                    iterations: iteration,
                    imbalance,
                    participants,
                });
            }

            let dropped = market.restore(&mut populations.trend, &snapshot);
            debug!("trial {iteration} at {price:.4}: imbalance {imbalance}, rolled back {dropped}");
            previous = imbalance;
        }

        market.restore(&mut populations.trend, &snapshot);
        market.reset();
        warn!(
            "shock {noise}: no settlement within {} trials from {start_price:.4}",
            self.max_iterations
        );
        Err(RoundFailure::Exhausted {
            iterations: self.max_iterations,
            last_price: price,
        })
    }
}
