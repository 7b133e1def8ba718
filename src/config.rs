//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::devices::grid_load::{DEFAULT_GRID_AMP_KW, DEFAULT_GRID_BASE_KW, DEFAULT_GRID_PEAK_MINUTE};
use crate::devices::solar::{
    DEFAULT_SOLAR_NOON_MINUTE, DEFAULT_SOLAR_PEAK_KW, DEFAULT_SOLAR_SIGMA_HOURS,
    DEFAULT_SUNRISE_MINUTE, DEFAULT_SUNSET_MINUTE,
};
use crate::devices::{GridLoad, SolarPv};
use crate::error::ConfigError;
use crate::sim::controller::{
    PEAK_CHARGING_CAP_KW, PEAK_WINDOW_END_MINUTE, PEAK_WINDOW_START_MINUTE,
    RuleBasedController, SOLAR_PRIORITY_THRESHOLD_KW,
};
use crate::sim::signals::SignalGenerator;
use crate::sim::types::{
    DEFAULT_HORIZON_MINUTES, DEFAULT_STEP_MINUTES, MINUTES_PER_DAY, SimulationConfig,
};

/// Seed offset for the solar noise stream to avoid correlation with the load.
const SOLAR_SEED_OFFSET: u64 = 57;

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the `default` preset. Load from TOML
/// with [`ScenarioConfig::from_toml_file`] or use [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Vehicle and charger parameters (the user-facing inputs).
    #[serde(default)]
    pub vehicle: VehicleConfig,
    /// Horizon and step length.
    #[serde(default)]
    pub simulation: HorizonConfig,
    /// Building load curve.
    #[serde(default)]
    pub grid_load: GridLoadConfig,
    /// Solar production curve.
    #[serde(default)]
    pub solar: SolarConfig,
    /// Charging rule thresholds.
    #[serde(default)]
    pub controller: ControllerConfig,
    /// Optional stochastic variation of the signals.
    #[serde(default)]
    pub noise: NoiseConfig,
}

/// Vehicle and charger parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VehicleConfig {
    /// Battery capacity (kWh).
    pub capacity_kwh: f64,
    /// Initial state of charge (percent).
    pub initial_soc_percent: f64,
    /// Charger power limit (kW).
    pub max_charging_kw: f64,
}

impl Default for VehicleConfig {
    fn default() -> Self {
        Self {
            capacity_kwh: 60.0,
            initial_soc_percent: 20.0,
            max_charging_kw: 22.0,
        }
    }
}

/// Horizon and step length.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HorizonConfig {
    /// Simulated duration (minutes).
    pub horizon_minutes: usize,
    /// Step length (minutes, must divide the horizon).
    pub step_minutes: usize,
}

impl Default for HorizonConfig {
    fn default() -> Self {
        Self {
            horizon_minutes: DEFAULT_HORIZON_MINUTES,
            step_minutes: DEFAULT_STEP_MINUTES,
        }
    }
}

/// Building load curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridLoadConfig {
    /// Average load (kW).
    pub base_kw: f64,
    /// Daily swing (kW).
    pub amp_kw: f64,
    /// Minute of the day with the highest load.
    pub peak_minute: usize,
}

impl Default for GridLoadConfig {
    fn default() -> Self {
        Self {
            base_kw: DEFAULT_GRID_BASE_KW,
            amp_kw: DEFAULT_GRID_AMP_KW,
            peak_minute: DEFAULT_GRID_PEAK_MINUTE,
        }
    }
}

/// Solar production curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolarConfig {
    /// Clear-sky peak (kW).
    pub kw_peak: f64,
    /// Minute of solar noon.
    pub noon_minute: usize,
    /// Bell width (hours).
    pub sigma_hours: f64,
    /// Sunrise minute (inclusive).
    pub sunrise_minute: usize,
    /// Sunset minute (exclusive).
    pub sunset_minute: usize,
}

impl Default for SolarConfig {
    fn default() -> Self {
        Self {
            kw_peak: DEFAULT_SOLAR_PEAK_KW,
            noon_minute: DEFAULT_SOLAR_NOON_MINUTE,
            sigma_hours: DEFAULT_SOLAR_SIGMA_HOURS,
            sunrise_minute: DEFAULT_SUNRISE_MINUTE,
            sunset_minute: DEFAULT_SUNSET_MINUTE,
        }
    }
}

/// Charging rule thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControllerConfig {
    /// Solar production above which charging follows the array (kW).
    pub solar_threshold_kw: f64,
    /// Peak-window start minute (inclusive).
    pub peak_start_minute: usize,
    /// Peak-window end minute (exclusive).
    pub peak_end_minute: usize,
    /// Charging cap inside the peak window (kW).
    pub peak_cap_kw: f64,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            solar_threshold_kw: SOLAR_PRIORITY_THRESHOLD_KW,
            peak_start_minute: PEAK_WINDOW_START_MINUTE,
            peak_end_minute: PEAK_WINDOW_END_MINUTE,
            peak_cap_kw: PEAK_CHARGING_CAP_KW,
        }
    }
}

/// Optional stochastic variation. All zero means fully deterministic curves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NoiseConfig {
    /// Master random seed.
    pub seed: u64,
    /// Grid-load noise standard deviation (kW).
    pub grid_noise_std_kw: f64,
    /// Solar noise standard deviation (fraction of output).
    pub solar_noise_std: f64,
}

impl ScenarioConfig {
    /// Available preset names.
    pub const PRESETS: &[&str] = &["default", "compact", "slow_wallbox"];

    /// Mid-size car on a 22 kW charger.
    pub fn default_preset() -> Self {
        Self::default()
    }

    /// Small car on a 7 kW wallbox.
    pub fn compact() -> Self {
        Self {
            vehicle: VehicleConfig {
                capacity_kwh: 40.0,
                initial_soc_percent: 20.0,
                max_charging_kw: 7.0,
            },
            ..Self::default()
        }
    }

    /// Large empty battery on a single-phase charger; does not fill in a day.
    pub fn slow_wallbox() -> Self {
        Self {
            vehicle: VehicleConfig {
                capacity_kwh: 100.0,
                initial_soc_percent: 0.0,
                max_charging_kw: 3.7,
            },
            ..Self::default()
        }
    }

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "default" => Ok(Self::default_preset()),
            "compact" => Ok(Self::compact()),
            "slow_wallbox" => Ok(Self::slow_wallbox()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        debug!(path = %path.display(), "loaded scenario file");
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Run configuration for the engine.
    pub fn simulation_config(&self) -> SimulationConfig {
        SimulationConfig::new(
            self.vehicle.capacity_kwh,
            self.vehicle.initial_soc_percent,
            self.vehicle.max_charging_kw,
        )
        .with_horizon(self.simulation.horizon_minutes, self.simulation.step_minutes)
    }

    /// Signal generator for the configured curves.
    ///
    /// # Panics
    ///
    /// Panics on solar windows that [`ScenarioConfig::validate`] rejects.
    pub fn signal_generator(&self) -> SignalGenerator {
        let g = &self.grid_load;
        let s = &self.solar;
        let n = &self.noise;
        SignalGenerator::new(
            GridLoad::new(g.base_kw, g.amp_kw, g.peak_minute, n.grid_noise_std_kw, n.seed),
            SolarPv::new(
                s.kw_peak,
                s.noon_minute,
                s.sigma_hours,
                s.sunrise_minute,
                s.sunset_minute,
                n.solar_noise_std,
                n.seed.wrapping_add(SOLAR_SEED_OFFSET),
            ),
        )
    }

    /// Rule-based controller for the configured thresholds.
    pub fn controller(&self) -> RuleBasedController {
        let c = &self.controller;
        RuleBasedController {
            solar_threshold_kw: c.solar_threshold_kw,
            peak_start_minute: c.peak_start_minute,
            peak_end_minute: c.peak_end_minute,
            peak_cap_kw: c.peak_cap_kw,
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid. Run parameters are
    /// checked by [`SimulationConfig::validate`] and re-labelled with their
    /// TOML paths.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors: Vec<ConfigError> = match self.simulation_config().validate() {
            Ok(()) => Vec::new(),
            Err(e) => e
                .problems()
                .iter()
                .map(|p| ConfigError::new(toml_path(&p.field), p.message.clone()))
                .collect(),
        };

        let g = &self.grid_load;
        check_non_negative(&mut errors, "grid_load.base_kw", g.base_kw);
        check_non_negative(&mut errors, "grid_load.amp_kw", g.amp_kw);
        if g.peak_minute >= MINUTES_PER_DAY {
            errors.push(ConfigError::new("grid_load.peak_minute", "must be < 1440"));
        }

        let s = &self.solar;
        check_non_negative(&mut errors, "solar.kw_peak", s.kw_peak);
        if !(s.sigma_hours.is_finite() && s.sigma_hours > 0.0) {
            errors.push(ConfigError::new(
                "solar.sigma_hours",
                format!("must be a finite value > 0, got {}", s.sigma_hours),
            ));
        }
        if s.sunrise_minute >= s.sunset_minute {
            errors.push(ConfigError::new(
                "solar.sunrise_minute",
                "must be < solar.sunset_minute",
            ));
        }
        if s.sunset_minute > MINUTES_PER_DAY {
            errors.push(ConfigError::new("solar.sunset_minute", "must be <= 1440"));
        }

        let c = &self.controller;
        check_non_negative(&mut errors, "controller.solar_threshold_kw", c.solar_threshold_kw);
        if c.peak_start_minute > c.peak_end_minute || c.peak_end_minute > MINUTES_PER_DAY {
            errors.push(ConfigError::new(
                "controller.peak_start_minute",
                "must satisfy peak_start_minute <= peak_end_minute <= 1440",
            ));
        }
        check_non_negative(&mut errors, "controller.peak_cap_kw", c.peak_cap_kw);

        let n = &self.noise;
        check_non_negative(&mut errors, "noise.grid_noise_std_kw", n.grid_noise_std_kw);
        check_non_negative(&mut errors, "noise.solar_noise_std", n.solar_noise_std);

        errors
    }
}

/// Rejects negative, NaN and infinite values.
fn check_non_negative(errors: &mut Vec<ConfigError>, field: &str, value: f64) {
    if !(value.is_finite() && value >= 0.0) {
        errors.push(ConfigError::new(
            field,
            format!("must be a finite value >= 0, got {value}"),
        ));
    }
}

fn toml_path(field: &str) -> String {
    match field {
        "battery_capacity_kwh" => "vehicle.capacity_kwh".to_string(),
        "initial_soc_percent" => "vehicle.initial_soc_percent".to_string(),
        "max_charging_kw" => "vehicle.max_charging_kw".to_string(),
        other => format!("simulation.{other}"),
    }
}
