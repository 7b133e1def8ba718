//! Charging-power controllers.

use serde::Serialize;

use super::types::{
    ChargingDecision, ChargingRule, ExogenousSample, FULL_SOC_PERCENT, SimulationConfig, TimeStep,
};

/// Solar production above which charging follows the array (kW, exclusive).
pub const SOLAR_PRIORITY_THRESHOLD_KW: f64 = 5.0;

/// Start of the evening peak-load window (18:00, inclusive).
pub const PEAK_WINDOW_START_MINUTE: usize = 18 * 60;

/// End of the evening peak-load window (22:00, exclusive).
pub const PEAK_WINDOW_END_MINUTE: usize = 22 * 60;

/// Charging cap inside the peak-load window (kW).
pub const PEAK_CHARGING_CAP_KW: f64 = 5.0;

/// Contract for per-step charging decisions.
///
/// Implementations are stateless: the decision depends only on the inputs of
/// the current step, never on earlier steps.
pub trait Controller {
    /// Decides the charging power for one step.
    ///
    /// # Arguments
    ///
    /// * `step` - Step index and time of day
    /// * `sample` - Exogenous grid load and solar production
    /// * `soc_percent` - Battery state of charge before this step
    /// * `config` - Run configuration (already validated)
    fn decide(
        &self,
        step: &TimeStep,
        sample: &ExogenousSample,
        soc_percent: f64,
        config: &SimulationConfig,
    ) -> ChargingDecision;
}

/// Fixed rule set: solar priority, then evening peak limiting, then off-peak.
///
/// Rules are evaluated in that order and the first match wins. A full
/// battery forces the power to zero after the rule is chosen, so the rule is
/// still reported on saturated steps.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleBasedController {
    /// Solar production must exceed this to select solar priority (kW).
    pub solar_threshold_kw: f64,
    /// Peak-window start, minute of day (inclusive).
    pub peak_start_minute: usize,
    /// Peak-window end, minute of day (exclusive).
    pub peak_end_minute: usize,
    /// Power cap inside the peak window (kW).
    pub peak_cap_kw: f64,
}

impl Default for RuleBasedController {
    fn default() -> Self {
        Self {
            solar_threshold_kw: SOLAR_PRIORITY_THRESHOLD_KW,
            peak_start_minute: PEAK_WINDOW_START_MINUTE,
            peak_end_minute: PEAK_WINDOW_END_MINUTE,
            peak_cap_kw: PEAK_CHARGING_CAP_KW,
        }
    }
}

impl RuleBasedController {
    /// Whether a minute of the day falls inside `[peak_start, peak_end)`.
    pub fn in_peak_window(&self, minute_of_day: usize) -> bool {
        (self.peak_start_minute..self.peak_end_minute).contains(&minute_of_day)
    }

    /// First matching rule for this step.
    pub fn select_rule(&self, step: &TimeStep, sample: &ExogenousSample) -> ChargingRule {
        if sample.solar_prod_kw > self.solar_threshold_kw {
            ChargingRule::SolarPriority
        } else if self.in_peak_window(step.minute_of_day) {
            ChargingRule::PeakLimit
        } else {
            ChargingRule::OffPeak
        }
    }

    fn rule_power_kw(&self, rule: ChargingRule, sample: &ExogenousSample, max_kw: f64) -> f64 {
        match rule {
            ChargingRule::SolarPriority => sample.solar_prod_kw.min(max_kw),
            ChargingRule::PeakLimit => self.peak_cap_kw.min(max_kw),
            ChargingRule::OffPeak => max_kw,
        }
    }
}

impl Controller for RuleBasedController {
    fn decide(
        &self,
        step: &TimeStep,
        sample: &ExogenousSample,
        soc_percent: f64,
        config: &SimulationConfig,
    ) -> ChargingDecision {
        let max_kw = config.max_charging_kw;
        let rule = self.select_rule(step, sample);
        let saturated = soc_percent >= FULL_SOC_PERCENT;

        let power_kw = if saturated {
            0.0
        } else {
            self.rule_power_kw(rule, sample, max_kw).clamp(0.0, max_kw)
        };

        ChargingDecision {
            power_kw,
            rule,
            saturated,
        }
    }
}
