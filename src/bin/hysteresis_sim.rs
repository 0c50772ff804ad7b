// src/bin/hysteresis_sim.rs
//! Runs one simulation and prints its summary as JSON.
//!
//! Usage: hysteresis_sim [config.json]   (log level via RUST_LOG)

use hysteresis_market::{Result, Simulation, SimulationConfig};
use log::error;
use std::env;
use std::process::ExitCode;

fn run() -> Result<()> {
    let config = match env::args().nth(1) {
        Some(path) => SimulationConfig::from_json_file(path)?,
        None => SimulationConfig::default(),
    };

    let mut simulation = Simulation::new(config)?;
    simulation.run()?;
    println!("{}", serde_json::to_string_pretty(&simulation.summary())?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
