//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use ev_charge_sim::config::ScenarioConfig;
use ev_charge_sim::sim::engine::Engine;
use ev_charge_sim::sim::result::ResultSet;
use ev_charge_sim::sim::types::SimulationConfig;

/// Reference vehicle: 40 kWh at 20% on a 7 kW charger.
pub fn compact_config() -> SimulationConfig {
    SimulationConfig::new(40.0, 20.0, 7.0)
}

/// Runs `config` with the default curves and rules.
pub fn run_default(config: SimulationConfig) -> ResultSet {
    Engine::with_defaults(config)
        .expect("config should be valid")
        .run()
}

/// Runs a built-in preset through the full config pipeline.
pub fn run_preset(name: &str) -> ResultSet {
    let scenario = ScenarioConfig::from_preset(name).expect("preset should exist");
    Engine::new(
        scenario.simulation_config(),
        scenario.signal_generator(),
        scenario.controller(),
    )
    .expect("preset should be valid")
    .run()
}
