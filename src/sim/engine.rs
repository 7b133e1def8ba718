//! Simulation engine that drives signals, controller and battery integration.

use tracing::{debug, info, trace, warn};

use crate::error::SimError;

use super::clock::Clock;
use super::controller::{Controller, RuleBasedController};
use super::result::ResultSet;
use super::signals::SignalGenerator;
use super::state::SimulationState;
use super::types::{SimulationConfig, StepResult, TimeStep};

/// Simulation engine owning the configuration, signal source and controller.
///
/// Generic over `C: Controller` for static dispatch. The engine itself holds
/// no run state: every call to [`Engine::run`] starts from a fresh
/// [`SimulationState`], so repeated runs are independent and identical.
pub struct Engine<C: Controller> {
    config: SimulationConfig,
    signals: SignalGenerator,
    controller: C,
}

impl Engine<RuleBasedController> {
    /// Engine with default signal curves and the default rule set.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] if `config` is invalid.
    pub fn with_defaults(config: SimulationConfig) -> Result<Self, SimError> {
        Self::new(config, SignalGenerator::default(), RuleBasedController::default())
    }
}

impl<C: Controller> Engine<C> {
    /// Creates a new simulation engine.
    ///
    /// # Arguments
    ///
    /// * `config` - Run configuration
    /// * `signals` - Grid-load and solar source
    /// * `controller` - Charging controller
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] before anything runs if the
    /// configuration violates any invariant.
    pub fn new(
        config: SimulationConfig,
        signals: SignalGenerator,
        controller: C,
    ) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            config,
            signals,
            controller,
        })
    }

    /// Fresh state at the configured initial SoC.
    pub fn initial_state(&self) -> SimulationState {
        SimulationState::new(&self.config)
    }

    /// Executes one step against `state` and returns its record.
    ///
    /// # Arguments
    ///
    /// * `state` - Run state, advanced in place
    /// * `step` - Step to execute
    pub fn step(&self, state: &mut SimulationState, step: TimeStep) -> StepResult {
        // 1. Exogenous signals
        let sample = self.signals.sample(&step);

        // 2. Controller decision on the SoC before this step
        let decision = self
            .controller
            .decide(&step, &sample, state.soc_percent(), &self.config);

        // 3. Integrate SoC
        let stored_kwh = state.advance(step.index, decision.power_kw, self.config.dt_hours());

        trace!(
            step = step.index,
            rule = %decision.rule,
            power_kw = decision.power_kw,
            soc_percent = state.soc_percent(),
            "step"
        );

        StepResult {
            step: step.index,
            time: step.time_of_day(),
            grid_load_kw: sample.grid_load_kw,
            solar_prod_kw: sample.solar_prod_kw,
            charging_power_kw: decision.power_kw,
            soc_percent: state.soc_percent(),
            rule: decision.rule,
            saturated: decision.saturated,
            stored_kwh,
        }
    }

    /// Executes every step of the horizon and returns the result set.
    ///
    /// Never stops early: after completion the remaining steps still run with
    /// zero charging power.
    pub fn run(&self) -> ResultSet {
        let mut clock = Clock::new(self.config.horizon_minutes, self.config.step_minutes);
        let mut state = self.initial_state();
        let mut rows = Vec::with_capacity(clock.total_steps());

        debug!(
            capacity_kwh = self.config.battery_capacity_kwh,
            initial_soc_percent = self.config.initial_soc_percent,
            max_charging_kw = self.config.max_charging_kw,
            steps = clock.total_steps(),
            sources = ?self.signals.source_names(),
            "starting run"
        );

        clock.run(|step| rows.push(self.step(&mut state, step)));

        let result = ResultSet::new(
            self.config.clone(),
            rows,
            state.completion_step(),
            state.energy_delivered_kwh(),
        );

        match result.completion().step() {
            Some(step) => info!(
                step,
                time = %result.completion_label(),
                energy_kwh = result.energy_delivered_kwh(),
                "battery full"
            ),
            None => warn!(
                final_soc_percent = result.final_soc_percent(),
                "full charge not reached within horizon"
            ),
        }

        result
    }

    /// Returns a reference to the simulation configuration.
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn signals(&self) -> &SignalGenerator {
        &self.signals
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }
}
