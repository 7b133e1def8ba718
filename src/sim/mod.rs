/// Simulation clock for step management.
pub mod clock;
pub mod controller;
pub mod engine;
pub mod kpi;
pub mod result;
/// Grid-load and solar signal synthesis.
pub mod signals;
pub mod state;
pub mod types;

use crate::error::SimError;

use self::engine::Engine;
use self::result::ResultSet;
use self::types::SimulationConfig;

/// Runs one simulation with the default signals and rule set.
///
/// # Errors
///
/// Returns [`SimError::InvalidConfiguration`] without running any step if
/// the configuration is invalid.
pub fn run(config: SimulationConfig) -> Result<ResultSet, SimError> {
    Ok(Engine::with_defaults(config)?.run())
}
