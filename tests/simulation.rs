// tests/simulation.rs

use hysteresis_market::config::{ThresholdPopulationConfig, TrendPopulationConfig};
use hysteresis_market::{AgentState, Marketable, Simulation, SimulationConfig, Trader};

fn small_config(seed: u64) -> SimulationConfig {
    SimulationConfig {
        seed: Some(seed),
        number_of_transactions: 12,
        price_step: 0.05,
        max_iterations: 2_000,
        threshold: ThresholdPopulationConfig {
            width_max: 8.0,
            max_relays: 12,
            ..ThresholdPopulationConfig::default()
        },
        trend: TrendPopulationConfig {
            beta_max: 8.0,
            ..TrendPopulationConfig::default()
        },
        ..SimulationConfig::default()
    }
}

#[test]
fn test_full_run_settles_every_round() {
    // Arrange
    let config = small_config(123);
    let mut simulation = Simulation::new(config.clone()).unwrap();

    // Act
    let records = simulation.run().unwrap().to_vec();

    // Assert
    assert_eq!(records.len(), config.number_of_transactions);
    let prices: Vec<f64> = records.iter().map(|r| r.price).collect();
    assert_eq!(simulation.market().settled_prices(), prices.as_slice());
    assert_eq!(simulation.market().pending_len(), 0);
    for (index, record) in records.iter().enumerate() {
        assert_eq!(record.index, index);
        assert_ne!(record.noise, 0);
        assert!(record.iterations >= 1 && record.iterations <= config.max_iterations);
    }
    for pair in records.windows(2) {
        assert_eq!(pair[1].start_price, pair[0].price, "rounds chain off the last settled price");
    }
}

#[test]
fn test_strategic_inventory_moves_with_the_trades() {
    let mut simulation = Simulation::new(small_config(7)).unwrap();
    let mut held = simulation.populations().held_units() as i64;

    for _ in 0..8 {
        simulation.step().unwrap();
        let record = simulation.records().last().unwrap();
        let p = &record.participants;
        let bought = (p.threshold_buyers + p.trend_buyers) as i64;
        let sold = (p.threshold_sellers + p.trend_sellers) as i64;

        held += bought - sold;
        assert_eq!(record.held_units as i64, held);
        assert_eq!(simulation.populations().held_units() as i64, held);
        // The exogenous side is all on one side of the book.
        assert!(p.exogenous_buyers == 0 || p.exogenous_sellers == 0);
        assert_eq!((p.exogenous_buyers + p.exogenous_sellers) as i64, record.noise.abs());
    }
}

#[test]
fn test_agents_stay_consistent_after_a_run() {
    let mut simulation = Simulation::new(small_config(42)).unwrap();
    simulation.run().unwrap();
    let populations = simulation.populations();

    for agent in populations.threshold.agents() {
        assert_eq!(agent.held_price().is_some(), agent.state() == AgentState::WantToSell);
    }
    for agent in populations.trend.agents() {
        assert_eq!(agent.held_price().is_some(), agent.state() == AgentState::WantToSell);
        match agent.state() {
            AgentState::WantToBuy => assert!(agent.tracked_max().is_none()),
            AgentState::WantToSell => assert!(agent.tracked_min().is_none()),
        }
    }
}

#[test]
fn test_same_seed_same_prices() {
    let mut a = Simulation::new(small_config(99)).unwrap();
    let mut b = Simulation::new(small_config(99)).unwrap();

    a.run().unwrap();
    b.run().unwrap();

    assert_eq!(a.market().settled_prices(), b.market().settled_prices());
    assert_eq!(a.summary(), b.summary());
}

#[test]
fn test_summary_serializes_to_json() {
    let mut simulation = Simulation::new(small_config(5)).unwrap();
    simulation.run().unwrap();

    let json = serde_json::to_value(simulation.summary()).unwrap();

    assert_eq!(json["settled_rounds"], 12);
    assert_eq!(json["settled_prices"].as_array().unwrap().len(), 12);
    assert!(json["rounds"][0]["participants"]["threshold_buyers"].is_u64());
}

#[test]
fn test_config_loads_from_json_file() {
    let path = std::env::temp_dir().join(format!("hysteresis-config-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "seed": 8, "number_of_transactions": 3, "price_step": 0.05 }"#).unwrap();

    let config = SimulationConfig::from_json_file(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.seed, Some(8));
    assert_eq!(config.number_of_transactions, 3);
    assert_eq!(config.max_iterations, SimulationConfig::default().max_iterations);
}
