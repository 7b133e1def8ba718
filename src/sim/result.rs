//! Run output: aligned per-step series plus derived completion time.

use chrono::NaiveTime;
use serde::Serialize;

use super::types::{SimulationConfig, StepResult, TimeStep, hhmm};

/// Label reported when the battery never fills within the horizon.
pub const NOT_REACHED_LABEL: &str = "not reached within horizon";

/// Whether and when the battery first reached 100%.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Completion {
    /// Full charge reached at `step`, which starts at `time`.
    Reached {
        step: usize,
        #[serde(with = "hhmm")]
        time: NaiveTime,
    },
    /// Horizon ended first. An expected outcome, not an error.
    NotReached,
}

impl Completion {
    /// Maps an optional completion step to a time of day.
    pub fn from_step(completion_step: Option<usize>, step_minutes: usize) -> Self {
        match completion_step {
            Some(step) => Self::Reached {
                step,
                time: TimeStep::new(step, step_minutes).time_of_day(),
            },
            None => Self::NotReached,
        }
    }

    pub fn is_reached(&self) -> bool {
        matches!(self, Self::Reached { .. })
    }

    pub fn step(&self) -> Option<usize> {
        match self {
            Self::Reached { step, .. } => Some(*step),
            Self::NotReached => None,
        }
    }

    pub fn time(&self) -> Option<NaiveTime> {
        match self {
            Self::Reached { time, .. } => Some(*time),
            Self::NotReached => None,
        }
    }

    /// `HH:MM`, or [`NOT_REACHED_LABEL`].
    pub fn label(&self) -> String {
        match self {
            Self::Reached { time, .. } => time.format("%H:%M").to_string(),
            Self::NotReached => NOT_REACHED_LABEL.to_string(),
        }
    }
}

/// Everything a run produced, immutable once returned.
///
/// Rows are ordered by step. The column accessors hand the series to a
/// charting layer without it having to know about [`StepResult`].
#[derive(Debug, Clone, Serialize)]
pub struct ResultSet {
    config: SimulationConfig,
    rows: Vec<StepResult>,
    completion: Completion,
    energy_delivered_kwh: f64,
}

impl ResultSet {
    /// Assembles the result of a finished run.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration the run used
    /// * `rows` - One record per step, in step order
    /// * `completion_step` - First step at which SoC reached 100%, if any
    /// * `energy_delivered_kwh` - Total energy stored in the battery
    pub fn new(
        config: SimulationConfig,
        rows: Vec<StepResult>,
        completion_step: Option<usize>,
        energy_delivered_kwh: f64,
    ) -> Self {
        let completion = Completion::from_step(completion_step, config.step_minutes);
        Self {
            config,
            rows,
            completion,
            energy_delivered_kwh,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn rows(&self) -> &[StepResult] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn completion(&self) -> Completion {
        self.completion
    }

    pub fn completion_time(&self) -> Option<NaiveTime> {
        self.completion.time()
    }

    pub fn completion_label(&self) -> String {
        self.completion.label()
    }

    pub fn energy_delivered_kwh(&self) -> f64 {
        self.energy_delivered_kwh
    }

    /// SoC after the last step, or the initial SoC for an empty run.
    pub fn final_soc_percent(&self) -> f64 {
        self.rows
            .last()
            .map_or(self.config.initial_soc_percent, |r| r.soc_percent)
    }

    /// Rows with `from <= step <= to`.
    pub fn rows_between(&self, from: usize, to: usize) -> &[StepResult] {
        let start = from.min(self.rows.len());
        let end = to.saturating_add(1).min(self.rows.len()).max(start);
        &self.rows[start..end]
    }

    pub fn times(&self) -> Vec<NaiveTime> {
        self.rows.iter().map(|r| r.time).collect()
    }

    pub fn grid_load_kw(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.grid_load_kw).collect()
    }

    pub fn solar_prod_kw(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.solar_prod_kw).collect()
    }

    pub fn charging_power_kw(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.charging_power_kw).collect()
    }

    pub fn soc_percent(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.soc_percent).collect()
    }
}
