//! Single-vehicle EV charging simulator.
//!
//! Synthesizes a day of building grid load and solar production, decides a
//! charging power for every minute with a small rule set, and integrates the
//! battery state of charge up to the first moment it is full.

/// REST API over simulation results (`api` feature).
#[cfg(feature = "api")]
pub mod api;
pub mod cli;
pub mod config;
pub mod devices;
pub mod error;
pub mod io;
pub mod reporting;
/// Simulation clock, signals, controller, engine and results.
pub mod sim;
pub mod telemetry;
