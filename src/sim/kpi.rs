//! Post-hoc KPI computation from a finished run.

use std::fmt;

use chrono::NaiveTime;
use serde::Serialize;

use super::result::ResultSet;
use super::types::{ChargingRule, hhmm};

/// Aggregate key performance indicators derived from a complete run.
///
/// Computed post-hoc from the [`ResultSet`] so reported metrics always agree
/// with the step data.
#[derive(Debug, Clone, Serialize)]
pub struct KpiReport {
    /// Energy drawn by the charger (kWh, sum of power * dt).
    pub energy_drawn_kwh: f64,
    /// Energy that ended up stored in the battery (kWh).
    pub energy_stored_kwh: f64,
    /// Energy drawn while following solar production (kWh).
    pub solar_priority_kwh: f64,
    /// Energy drawn inside the evening peak window (kWh).
    pub peak_limit_kwh: f64,
    /// Energy drawn at the off-peak rate (kWh).
    pub off_peak_kwh: f64,
    /// Share of drawn energy charged under solar priority (percent).
    pub solar_share_pct: f64,
    /// Highest charging power of the run (kW).
    pub peak_charging_kw: f64,
    /// Minutes with non-zero charging power.
    pub charging_minutes: usize,
    /// Highest building grid load (kW).
    pub peak_grid_load_kw: f64,
    /// Time of day of the highest grid load.
    #[serde(with = "hhmm")]
    pub peak_grid_load_time: NaiveTime,
    /// SoC after the last step (percent).
    pub final_soc_percent: f64,
    /// Completion time (`HH:MM`) or the not-reached label.
    pub completion: String,
}

impl KpiReport {
    /// Computes all KPIs from a run's result set.
    pub fn from_result(result: &ResultSet) -> Self {
        let cfg = result.config();
        let dt_hours = cfg.dt_hours();

        let mut drawn = 0.0_f64;
        let mut solar_priority = 0.0_f64;
        let mut peak_limit = 0.0_f64;
        let mut off_peak = 0.0_f64;
        let mut peak_charging = 0.0_f64;
        let mut charging_steps = 0_usize;
        let mut peak_grid = 0.0_f64;
        let mut peak_grid_time = NaiveTime::default();

        for r in result.rows() {
            let kwh = r.charging_power_kw * dt_hours;
            drawn += kwh;

            match r.rule {
                ChargingRule::SolarPriority => solar_priority += kwh,
                ChargingRule::PeakLimit => peak_limit += kwh,
                ChargingRule::OffPeak => off_peak += kwh,
            }

            peak_charging = peak_charging.max(r.charging_power_kw);
            if r.charging_power_kw > 0.0 {
                charging_steps += 1;
            }

            if r.grid_load_kw > peak_grid {
                peak_grid = r.grid_load_kw;
                peak_grid_time = r.time;
            }
        }

        let solar_share_pct = if drawn > 0.0 {
            100.0 * solar_priority / drawn
        } else {
            0.0
        };

        Self {
            energy_drawn_kwh: drawn,
            energy_stored_kwh: result.energy_delivered_kwh(),
            solar_priority_kwh: solar_priority,
            peak_limit_kwh: peak_limit,
            off_peak_kwh: off_peak,
            solar_share_pct,
            peak_charging_kw: peak_charging,
            charging_minutes: charging_steps * cfg.step_minutes,
            peak_grid_load_kw: peak_grid,
            peak_grid_load_time: peak_grid_time,
            final_soc_percent: result.final_soc_percent(),
            completion: result.completion_label(),
        }
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(f, "Completion:            {}", self.completion)?;
        writeln!(f, "Final SoC:             {:.1}%", self.final_soc_percent)?;
        writeln!(
            f,
            "Energy drawn:          {:.2} kWh ({:.2} kWh stored)",
            self.energy_drawn_kwh, self.energy_stored_kwh
        )?;
        writeln!(
            f,
            "  solar priority:      {:.2} kWh ({:.1}%)",
            self.solar_priority_kwh, self.solar_share_pct
        )?;
        writeln!(f, "  peak limited:        {:.2} kWh", self.peak_limit_kwh)?;
        writeln!(f, "  off-peak:            {:.2} kWh", self.off_peak_kwh)?;
        writeln!(f, "Peak charging power:   {:.2} kW", self.peak_charging_kw)?;
        writeln!(f, "Charging time:         {} min", self.charging_minutes)?;
        write!(
            f,
            "Peak grid load:        {:.2} kW at {}",
            self.peak_grid_load_kw,
            self.peak_grid_load_time.format("%H:%M")
        )
    }
}
