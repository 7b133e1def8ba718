//! Signal sources and the vehicle battery.

/// Electric vehicle traction battery.
pub mod ev_battery;
/// Building grid-load profile generator.
pub mod grid_load;
/// Solar photovoltaic production model.
pub mod solar;
pub mod types;

// Re-export the main types for convenience
pub use ev_battery::EvBattery;
pub use grid_load::GridLoad;
pub use solar::SolarPv;
pub use types::Device;
