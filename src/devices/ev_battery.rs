use crate::sim::types::FULL_SOC_PERCENT;

/// The traction battery of the vehicle on the charger.
///
/// `EvBattery` tracks state of charge in percent and integrates charging
/// power over a step. Energy that would push SoC past 100% is not storable
/// and is discarded; it is never carried into the next step.
#[derive(Debug, Clone)]
pub struct EvBattery {
    /// Battery capacity in kilowatt-hours.
    pub capacity_kwh: f64,

    /// State of charge in percent (0.0 to 100.0).
    soc_percent: f64,
}

impl EvBattery {
    /// Creates a battery at the given state of charge.
    ///
    /// # Arguments
    ///
    /// * `capacity_kwh` - Battery capacity in kWh (must be > 0)
    /// * `soc_percent` - Initial state of charge in percent (0.0 to 100.0)
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero/negative or SoC out of range. Callers
    /// validate the run configuration first.
    pub fn new(capacity_kwh: f64, soc_percent: f64) -> Self {
        assert!(capacity_kwh > 0.0);
        assert!((0.0..=FULL_SOC_PERCENT).contains(&soc_percent));
        Self {
            capacity_kwh,
            soc_percent,
        }
    }

    pub fn soc_percent(&self) -> f64 {
        self.soc_percent
    }

    pub fn is_full(&self) -> bool {
        self.soc_percent >= FULL_SOC_PERCENT
    }

    /// Energy still needed to reach full charge (kWh).
    pub fn headroom_kwh(&self) -> f64 {
        (FULL_SOC_PERCENT - self.soc_percent) / FULL_SOC_PERCENT * self.capacity_kwh
    }

    /// Charges at `power_kw` for `dt_hours`.
    ///
    /// # Returns
    ///
    /// Energy actually stored (kWh), which is less than `power_kw * dt_hours`
    /// only on the step that fills the battery.
    pub fn charge(&mut self, power_kw: f64, dt_hours: f64) -> f64 {
        let offered_kwh = power_kw.max(0.0) * dt_hours;
        if offered_kwh <= 0.0 {
            return 0.0;
        }

        let headroom_kwh = self.headroom_kwh();
        let next = self.soc_percent + offered_kwh / self.capacity_kwh * FULL_SOC_PERCENT;
        self.soc_percent = next.min(FULL_SOC_PERCENT);

        if next >= FULL_SOC_PERCENT {
            headroom_kwh
        } else {
            offered_kwh
        }
    }
}
