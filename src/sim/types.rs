//! Core simulation types: configuration, per-step samples, decisions and records.

use std::fmt;

use chrono::{NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, SimError};

/// Minutes in one simulated day.
pub const MINUTES_PER_DAY: usize = 24 * 60;

/// Default simulation horizon (one day).
pub const DEFAULT_HORIZON_MINUTES: usize = MINUTES_PER_DAY;

/// Default step length (one minute).
pub const DEFAULT_STEP_MINUTES: usize = 1;

/// Longest accepted horizon (one week).
pub const MAX_HORIZON_MINUTES: usize = 7 * MINUTES_PER_DAY;

/// Fully charged battery level.
pub const FULL_SOC_PERCENT: f64 = 100.0;

/// Immutable per-run configuration.
///
/// Validated once by [`SimulationConfig::validate`] before any step runs; the
/// engine never reads any other source of parameters during a run.
///
/// # Examples
///
/// ```
/// use ev_charge_sim::sim::types::SimulationConfig;
///
/// let cfg = SimulationConfig::new(40.0, 20.0, 7.0);
/// assert_eq!(cfg.total_steps(), 1440);
/// assert!((cfg.dt_hours() - 1.0 / 60.0).abs() < 1e-12);
/// assert!(cfg.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Usable battery capacity (kWh, > 0).
    pub battery_capacity_kwh: f64,
    /// State of charge at the start of the run (percent, 0 to 100).
    pub initial_soc_percent: f64,
    /// Charger power limit (kW, > 0).
    pub max_charging_kw: f64,
    /// Simulated duration in minutes.
    pub horizon_minutes: usize,
    /// Duration of one step in minutes (must divide `horizon_minutes`).
    pub step_minutes: usize,
}

impl SimulationConfig {
    /// Creates a one-day, one-minute-resolution configuration.
    ///
    /// # Arguments
    ///
    /// * `battery_capacity_kwh` - Battery capacity in kWh
    /// * `initial_soc_percent` - Initial state of charge in percent
    /// * `max_charging_kw` - Charger power limit in kW
    pub fn new(battery_capacity_kwh: f64, initial_soc_percent: f64, max_charging_kw: f64) -> Self {
        Self {
            battery_capacity_kwh,
            initial_soc_percent,
            max_charging_kw,
            horizon_minutes: DEFAULT_HORIZON_MINUTES,
            step_minutes: DEFAULT_STEP_MINUTES,
        }
    }

    /// Returns a copy with a different horizon and step length.
    pub fn with_horizon(mut self, horizon_minutes: usize, step_minutes: usize) -> Self {
        self.horizon_minutes = horizon_minutes;
        self.step_minutes = step_minutes;
        self
    }

    /// Duration of one step in hours.
    pub fn dt_hours(&self) -> f64 {
        self.step_minutes as f64 / 60.0
    }

    /// Number of steps in the horizon.
    pub fn total_steps(&self) -> usize {
        if self.step_minutes == 0 {
            return 0;
        }
        self.horizon_minutes / self.step_minutes
    }

    /// Checks every configuration invariant.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidConfiguration`] listing every violated
    /// constraint. Non-finite values are rejected alongside non-positive ones.
    pub fn validate(&self) -> Result<(), SimError> {
        let mut errors = Vec::new();

        if !(self.battery_capacity_kwh.is_finite() && self.battery_capacity_kwh > 0.0) {
            errors.push(ConfigError::new(
                "battery_capacity_kwh",
                format!("must be a finite value > 0, got {}", self.battery_capacity_kwh),
            ));
        }
        if !(self.max_charging_kw.is_finite() && self.max_charging_kw > 0.0) {
            errors.push(ConfigError::new(
                "max_charging_kw",
                format!("must be a finite value > 0, got {}", self.max_charging_kw),
            ));
        }
        if !(0.0..=FULL_SOC_PERCENT).contains(&self.initial_soc_percent) {
            errors.push(ConfigError::new(
                "initial_soc_percent",
                format!("must be in [0, 100], got {}", self.initial_soc_percent),
            ));
        }
        if self.step_minutes == 0 {
            errors.push(ConfigError::new("step_minutes", "must be > 0"));
        }
        if self.horizon_minutes == 0 {
            errors.push(ConfigError::new("horizon_minutes", "must be > 0"));
        }
        if self.horizon_minutes > MAX_HORIZON_MINUTES {
            errors.push(ConfigError::new(
                "horizon_minutes",
                format!(
                    "must be <= {MAX_HORIZON_MINUTES}, got {}",
                    self.horizon_minutes
                ),
            ));
        }
        if self.step_minutes > 0 && self.horizon_minutes % self.step_minutes != 0 {
            errors.push(ConfigError::new(
                "step_minutes",
                format!(
                    "must divide horizon_minutes ({} % {} != 0)",
                    self.horizon_minutes, self.step_minutes
                ),
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SimError::InvalidConfiguration(errors))
        }
    }
}

/// One discrete simulation tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeStep {
    /// Step index in `[0, total_steps)`.
    pub index: usize,
    /// Minute of the day this step starts at, in `[0, 1440)`.
    pub minute_of_day: usize,
}

impl TimeStep {
    /// Builds the step at `index` for a run with the given step length.
    pub fn new(index: usize, step_minutes: usize) -> Self {
        Self {
            index,
            minute_of_day: (index * step_minutes) % MINUTES_PER_DAY,
        }
    }

    /// Hours since midnight as a fraction.
    pub fn hour_of_day(&self) -> f64 {
        self.minute_of_day as f64 / 60.0
    }

    /// Wall-clock time of day this step starts at.
    pub fn time_of_day(&self) -> NaiveTime {
        NaiveTime::default() + TimeDelta::minutes(self.minute_of_day as i64)
    }
}

/// Exogenous signals for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExogenousSample {
    /// Building grid load (kW, >= 0).
    pub grid_load_kw: f64,
    /// On-site solar production (kW, >= 0).
    pub solar_prod_kw: f64,
}

/// Rule that produced a charging decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargingRule {
    /// Solar production above the threshold; charge from solar.
    SolarPriority,
    /// Inside the evening peak-load window; power capped.
    PeakLimit,
    /// Everything else; charge at the charger limit.
    OffPeak,
}

impl ChargingRule {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SolarPriority => "solar_priority",
            Self::PeakLimit => "peak_limit",
            Self::OffPeak => "off_peak",
        }
    }
}

impl fmt::Display for ChargingRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Controller output for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChargingDecision {
    /// Charging power (kW), within `[0, max_charging_kw]`.
    pub power_kw: f64,
    /// Rule selected before the full-battery override.
    pub rule: ChargingRule,
    /// Whether the full-battery override forced power to zero.
    pub saturated: bool,
}

/// Complete record of one simulation step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepResult {
    /// Step index.
    pub step: usize,
    /// Time of day the step starts at.
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    /// Building grid load (kW).
    pub grid_load_kw: f64,
    /// Solar production (kW).
    pub solar_prod_kw: f64,
    /// Charging power decided for this step (kW).
    pub charging_power_kw: f64,
    /// State of charge after this step (percent).
    pub soc_percent: f64,
    /// Rule that selected the charging power.
    pub rule: ChargingRule,
    /// Whether the full-battery override applied.
    pub saturated: bool,
    /// Energy actually stored in the battery during this step (kWh).
    pub stored_kwh: f64,
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>4} ({}) | grid={:>6.2} kW  solar={:>6.2} kW | charge={:>6.2} kW [{}] | SoC={:>5.1}%",
            self.step,
            self.time.format("%H:%M"),
            self.grid_load_kw,
            self.solar_prod_kw,
            self.charging_power_kw,
            self.rule,
            self.soc_percent,
        )
    }
}

/// Serializes a time of day as `HH:MM`.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::Serializer;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format("%H:%M"))
    }
}
