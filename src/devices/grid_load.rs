use crate::devices::types::{Device, gaussian_noise, step_rng};
use crate::sim::types::{MINUTES_PER_DAY, TimeStep};

/// Average building load (kW).
pub const DEFAULT_GRID_BASE_KW: f64 = 10.0;

/// Daily swing around the average (kW).
pub const DEFAULT_GRID_AMP_KW: f64 = 5.0;

/// Minute of the day the load peaks at (19:30). The trough follows 12 h later.
pub const DEFAULT_GRID_PEAK_MINUTE: usize = 19 * 60 + 30;

/// A building load generator that models the daily consumption pattern.
///
/// `GridLoad` produces a cosine demand curve with configurable baseline,
/// amplitude and peak time, plus optional Gaussian noise, to approximate a
/// residential load that peaks in the evening and bottoms out in the morning.
///
/// # Examples
///
/// ```
/// use ev_charge_sim::devices::{Device, GridLoad};
/// use ev_charge_sim::sim::types::TimeStep;
///
/// let load = GridLoad::default();
/// let evening = load.power_kw(&TimeStep::new(19 * 60 + 30, 1));
/// let morning = load.power_kw(&TimeStep::new(7 * 60 + 30, 1));
/// assert!(evening > morning);
/// ```
#[derive(Debug, Clone)]
pub struct GridLoad {
    /// Baseline power consumption in kilowatts
    pub base_kw: f64,

    /// Amplitude of the daily variation in kilowatts
    pub amp_kw: f64,

    /// Minute of the day at which the load peaks
    pub peak_minute: usize,

    /// Standard deviation of the Gaussian noise in kilowatts
    pub noise_std_kw: f64,

    /// Seed for the per-step noise streams
    seed: u64,
}

impl GridLoad {
    /// Creates a new building load generator.
    ///
    /// # Arguments
    ///
    /// * `base_kw` - The baseline power consumption in kilowatts
    /// * `amp_kw` - The amplitude of the daily variation in kilowatts
    /// * `peak_minute` - Minute of the day the curve peaks at (wrapped to one day)
    /// * `noise_std_kw` - The standard deviation of Gaussian noise in kilowatts
    /// * `seed` - Random seed for reproducible noise generation
    pub fn new(base_kw: f64, amp_kw: f64, peak_minute: usize, noise_std_kw: f64, seed: u64) -> Self {
        Self {
            base_kw,
            amp_kw,
            peak_minute: peak_minute % MINUTES_PER_DAY,
            noise_std_kw: noise_std_kw.max(0.0),
            seed,
        }
    }

    /// Noise-free demand at a minute of the day.
    pub fn profile_kw(&self, minute_of_day: usize) -> f64 {
        let offset = minute_of_day as f64 - self.peak_minute as f64;
        let angle = 2.0 * std::f64::consts::PI * offset / MINUTES_PER_DAY as f64;
        (self.base_kw + self.amp_kw * angle.cos()).max(0.0)
    }
}

impl Default for GridLoad {
    fn default() -> Self {
        Self::new(
            DEFAULT_GRID_BASE_KW,
            DEFAULT_GRID_AMP_KW,
            DEFAULT_GRID_PEAK_MINUTE,
            0.0,
            0,
        )
    }
}

impl Device for GridLoad {
    /// Demand at the given step, guaranteed to be non-negative.
    fn power_kw(&self, step: &TimeStep) -> f64 {
        let noise = if self.noise_std_kw > 0.0 {
            gaussian_noise(&mut step_rng(self.seed, step.index), self.noise_std_kw)
        } else {
            0.0
        };
        (self.profile_kw(step.minute_of_day) + noise).max(0.0) // no negative demand
    }

    fn device_type(&self) -> &'static str {
        "GridLoad"
    }
}
