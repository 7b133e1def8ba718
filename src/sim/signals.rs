//! Exogenous signal synthesis: building load and solar production per step.

use crate::devices::{Device, GridLoad, SolarPv};

use super::clock::Clock;
use super::types::{ExogenousSample, TimeStep};

/// Produces the grid-load and solar series the controller reacts to.
///
/// `sample` is a pure function of the step, so the generator can be shared
/// between runs and the whole table can be precomputed up front.
#[derive(Debug, Clone, Default)]
pub struct SignalGenerator {
    grid_load: GridLoad,
    solar: SolarPv,
}

impl SignalGenerator {
    pub fn new(grid_load: GridLoad, solar: SolarPv) -> Self {
        Self { grid_load, solar }
    }

    /// Exogenous values at one step.
    pub fn sample(&self, step: &TimeStep) -> ExogenousSample {
        ExogenousSample {
            grid_load_kw: self.grid_load.power_kw(step),
            solar_prod_kw: self.solar.power_kw(step),
        }
    }

    /// Samples every step of the clock's horizon.
    pub fn table(&self, clock: &Clock) -> Vec<ExogenousSample> {
        (0..clock.total_steps())
            .map(|i| self.sample(&clock.step_at(i)))
            .collect()
    }

    /// Type names of the grid-load and solar sources, for logging.
    pub fn source_names(&self) -> [&'static str; 2] {
        [self.grid_load.device_type(), self.solar.device_type()]
    }

    pub fn grid_load(&self) -> &GridLoad {
        &self.grid_load
    }

    pub fn solar(&self) -> &SolarPv {
        &self.solar
    }
}
