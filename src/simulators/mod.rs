// src/simulators/mod.rs

pub mod market_trait;
pub mod noise;
pub mod price_search;
pub mod simulation;
