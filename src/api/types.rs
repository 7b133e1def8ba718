//! API request, response and query types.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::sim::kpi::KpiReport;
use crate::sim::result::Completion;
use crate::sim::types::{SimulationConfig, StepResult};

/// Combined state response for the startup run.
#[derive(Debug, Serialize)]
pub struct StateResponse {
    pub config: SimulationConfig,
    pub kpi: KpiReport,
    pub completion: Completion,
    /// Last step of the run, absent for an empty run.
    pub latest_step: Option<StepResult>,
}

/// Optional range query parameters for the series endpoint.
#[derive(Debug, Deserialize)]
pub struct SeriesQuery {
    /// First step (inclusive).
    pub from: Option<usize>,
    /// Last step (inclusive).
    pub to: Option<usize>,
}

/// Vehicle inputs for an on-demand run.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulateRequest {
    pub battery_capacity_kwh: f64,
    pub initial_soc_percent: f64,
    pub max_charging_kw: f64,
}

impl SimulateRequest {
    /// One-day, one-minute run configuration for these inputs.
    pub fn to_config(&self) -> SimulationConfig {
        SimulationConfig::new(
            self.battery_capacity_kwh,
            self.initial_soc_percent,
            self.max_charging_kw,
        )
    }
}

/// One rejected configuration field.
#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl From<&ConfigError> for FieldError {
    fn from(e: &ConfigError) -> Self {
        Self {
            field: e.field.clone(),
            message: e.message.clone(),
        }
    }
}

/// Error response body for 4xx responses.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    /// Per-field problems, when the request was an invalid configuration.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}

impl ErrorResponse {
    pub fn message(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            fields: Vec::new(),
        }
    }
}
