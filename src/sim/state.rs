use crate::devices::EvBattery;

use super::types::SimulationConfig;

/// Mutable run state, owned by the engine for the duration of one run.
#[derive(Debug, Clone)]
pub struct SimulationState {
    battery: EvBattery,
    /// Cumulative energy stored in the battery (kWh), never decreasing.
    energy_delivered_kwh: f64,
    /// First step at which SoC reached 100%; set once, never reset.
    completion_step: Option<usize>,
}

impl SimulationState {
    /// Initial state for a validated configuration.
    pub fn new(config: &SimulationConfig) -> Self {
        Self {
            battery: EvBattery::new(config.battery_capacity_kwh, config.initial_soc_percent),
            energy_delivered_kwh: 0.0,
            completion_step: None,
        }
    }

    pub fn soc_percent(&self) -> f64 {
        self.battery.soc_percent()
    }

    pub fn energy_delivered_kwh(&self) -> f64 {
        self.energy_delivered_kwh
    }

    pub fn completion_step(&self) -> Option<usize> {
        self.completion_step
    }

    /// Integrates one step of charging and records completion.
    ///
    /// # Returns
    ///
    /// Energy stored during this step (kWh).
    pub fn advance(&mut self, step_index: usize, power_kw: f64, dt_hours: f64) -> f64 {
        let stored_kwh = self.battery.charge(power_kw, dt_hours);
        self.energy_delivered_kwh += stored_kwh;

        if self.completion_step.is_none() && self.battery.is_full() {
            self.completion_step = Some(step_index);
        }
        stored_kwh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_is_recorded_once() {
        let cfg = SimulationConfig::new(1.0, 99.0, 60.0);
        let mut state = SimulationState::new(&cfg);

        state.advance(3, 60.0, 1.0 / 60.0);
        assert_eq!(state.completion_step(), Some(3));
        assert_eq!(state.soc_percent(), 100.0);

        state.advance(4, 0.0, 1.0 / 60.0);
        state.advance(5, 60.0, 1.0 / 60.0);
        assert_eq!(state.completion_step(), Some(3));
    }

    #[test]
    fn full_start_completes_on_first_step() {
        let cfg = SimulationConfig::new(40.0, 100.0, 7.0);
        let mut state = SimulationState::new(&cfg);
        assert_eq!(state.completion_step(), None);

        state.advance(0, 0.0, 1.0 / 60.0);
        assert_eq!(state.completion_step(), Some(0));
        assert_eq!(state.energy_delivered_kwh(), 0.0);
    }

    #[test]
    fn delivered_energy_accumulates() {
        let cfg = SimulationConfig::new(40.0, 0.0, 6.0);
        let mut state = SimulationState::new(&cfg);
        for t in 0..60 {
            state.advance(t, 6.0, 1.0 / 60.0);
        }
        assert!((state.energy_delivered_kwh() - 6.0).abs() < 1e-9);
        assert!((state.soc_percent() - 15.0).abs() < 1e-9);
    }
}
