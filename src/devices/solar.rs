use crate::devices::types::{Device, gaussian_noise, step_rng};
use crate::sim::types::{MINUTES_PER_DAY, TimeStep};

/// Peak array output under clear sky (kW).
pub const DEFAULT_SOLAR_PEAK_KW: f64 = 15.0;

/// Minute of solar noon.
pub const DEFAULT_SOLAR_NOON_MINUTE: usize = 12 * 60;

/// Width of the production bell (hours).
pub const DEFAULT_SOLAR_SIGMA_HOURS: f64 = 2.0;

/// First daylight minute (06:00, inclusive).
pub const DEFAULT_SUNRISE_MINUTE: usize = 6 * 60;

/// End of daylight (18:00, exclusive).
pub const DEFAULT_SUNSET_MINUTE: usize = 18 * 60;

/// A solar PV array that models production over the daylight window.
///
/// `SolarPv` produces a Gaussian bell centred on solar noon, clipped to the
/// daylight window: production is exactly `0.0` before sunrise and from sunset
/// on. Optional multiplicative noise approximates passing clouds.
///
/// Production is reported as a positive quantity.
#[derive(Debug, Clone)]
pub struct SolarPv {
    /// Maximum power output in kilowatts under ideal conditions.
    pub kw_peak: f64,

    /// Minute of the day with maximum production.
    pub noon_minute: usize,

    /// Standard deviation of the bell in hours.
    pub sigma_hours: f64,

    /// Minute of the day when production starts (inclusive).
    pub sunrise_minute: usize,

    /// Minute of the day when production stops (exclusive).
    pub sunset_minute: usize,

    /// Standard deviation of the Gaussian noise as a fraction of output.
    pub noise_std: f64,

    /// Seed for the per-step noise streams.
    seed: u64,
}

impl SolarPv {
    /// Creates a new solar PV array with the specified parameters.
    ///
    /// # Arguments
    ///
    /// * `kw_peak` - Maximum power output in kilowatts under ideal conditions
    /// * `noon_minute` - Minute of the day with peak production
    /// * `sigma_hours` - Width of the bell in hours (must be > 0)
    /// * `sunrise_minute` - Minute of the day when production starts (inclusive)
    /// * `sunset_minute` - Minute of the day when production stops (exclusive)
    /// * `noise_std` - Standard deviation of noise (e.g., 0.05 for +/-5% variation)
    /// * `seed` - Random seed for reproducible noise generation
    ///
    /// # Panics
    ///
    /// Panics if `sunrise_minute >= sunset_minute`, `sunset_minute > 1440` or
    /// `sigma_hours <= 0`.
    pub fn new(
        kw_peak: f64,
        noon_minute: usize,
        sigma_hours: f64,
        sunrise_minute: usize,
        sunset_minute: usize,
        noise_std: f64,
        seed: u64,
    ) -> Self {
        assert!(sunrise_minute < sunset_minute && sunset_minute <= MINUTES_PER_DAY);
        assert!(sigma_hours > 0.0);
        Self {
            kw_peak: kw_peak.max(0.0),
            noon_minute,
            sigma_hours,
            sunrise_minute,
            sunset_minute,
            noise_std: noise_std.max(0.0),
            seed,
        }
    }

    /// Whether a minute of the day lies inside the daylight window.
    pub fn is_daylight(&self, minute_of_day: usize) -> bool {
        (self.sunrise_minute..self.sunset_minute).contains(&minute_of_day)
    }

    /// Fraction of peak output at a minute of the day, `0.0` outside daylight.
    pub fn daylight_frac(&self, minute_of_day: usize) -> f64 {
        if !self.is_daylight(minute_of_day) {
            return 0.0;
        }
        let hours_from_noon = (minute_of_day as f64 - self.noon_minute as f64) / 60.0;
        (-(hours_from_noon * hours_from_noon) / (2.0 * self.sigma_hours * self.sigma_hours)).exp()
    }
}

impl Default for SolarPv {
    fn default() -> Self {
        Self::new(
            DEFAULT_SOLAR_PEAK_KW,
            DEFAULT_SOLAR_NOON_MINUTE,
            DEFAULT_SOLAR_SIGMA_HOURS,
            DEFAULT_SUNRISE_MINUTE,
            DEFAULT_SUNSET_MINUTE,
            0.0,
            0,
        )
    }
}

impl Device for SolarPv {
    /// Production at the given step; exactly `0.0` outside the daylight window.
    fn power_kw(&self, step: &TimeStep) -> f64 {
        let frac = self.daylight_frac(step.minute_of_day);
        if frac <= 0.0 {
            return 0.0;
        }

        let noise_mult = 1.0 + gaussian_noise(&mut step_rng(self.seed, step.index), self.noise_std);
        (self.kw_peak * frac * noise_mult).max(0.0)
    }

    fn device_type(&self) -> &'static str {
        "SolarPV"
    }
}
