//! Common types and traits for signal source components.

use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::sim::types::TimeStep;

/// Trait defining a source that produces or consumes electricity.
///
/// Sources are pure functions of the step: the same step always yields the
/// same power, no matter how often or in which order it is queried.
pub trait Device {
    /// Returns the power value at the specified step.
    ///
    /// # Arguments
    ///
    /// * `step` - Step index and minute of the day
    ///
    /// # Returns
    ///
    /// Power in kilowatts (kW), never negative
    fn power_kw(&self, step: &TimeStep) -> f64;

    /// Returns a human-readable type name for the device.
    fn device_type(&self) -> &'static str;
}

/// Mixing constant for per-step seeds (64-bit golden ratio).
const STEP_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// Builds a random stream dedicated to one step of one source.
///
/// Seeding from `(seed, step)` instead of sharing one sequential stream keeps
/// noisy sources pure: querying step 500 before step 3 changes nothing.
pub fn step_rng(seed: u64, step: usize) -> StdRng {
    StdRng::seed_from_u64(seed ^ (step as u64).wrapping_add(1).wrapping_mul(STEP_SEED_MIX))
}

/// Utility function to generate Gaussian noise using Box-Muller transform.
///
/// # Arguments
///
/// * `rng` - Random number generator
/// * `std_dev` - Standard deviation of the noise
///
/// # Returns
///
/// Random value from a Gaussian distribution with mean 0 and specified standard deviation
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
    z0 * std_dev
}
