//! End-to-end properties of a one-day run with the default curves and rules.

mod common;

use rstest::rstest;

use ev_charge_sim::error::SimError;
use ev_charge_sim::sim;
use ev_charge_sim::sim::clock::Clock;
use ev_charge_sim::sim::controller::{Controller, RuleBasedController};
use ev_charge_sim::sim::signals::SignalGenerator;
use ev_charge_sim::sim::types::{ChargingRule, ExogenousSample, SimulationConfig, TimeStep};

#[test]
fn solar_is_zero_outside_daylight_and_positive_at_noon() {
    let signals = SignalGenerator::default();
    let clock = Clock::new(1440, 1);
    for (minute, sample) in signals.table(&clock).iter().enumerate() {
        assert!(sample.solar_prod_kw >= 0.0);
        if !(360..1080).contains(&minute) {
            assert_eq!(sample.solar_prod_kw, 0.0, "minute {minute} should be dark");
        }
    }
    let noon = signals.sample(&TimeStep::new(720, 1));
    assert!(noon.solar_prod_kw > 0.0);
}

#[test]
fn grid_load_peaks_inside_evening_window() {
    let signals = SignalGenerator::default();
    let table = signals.table(&Clock::new(1440, 1));
    let (peak_minute, _) = table
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.grid_load_kw.total_cmp(&b.1.grid_load_kw))
        .expect("table should not be empty");
    assert!(
        (1080..1320).contains(&peak_minute),
        "peak at minute {peak_minute}"
    );
}

#[test]
fn charging_power_within_charger_limits() {
    let result = common::run_default(common::compact_config());
    for r in result.rows() {
        assert!(r.charging_power_kw >= 0.0);
        assert!(r.charging_power_kw <= 7.0);
    }
}

#[rstest]
#[case(0, 0.0)]
#[case(720, 15.0)]
#[case(1200, 0.0)]
fn full_battery_gets_no_power(#[case] minute: usize, #[case] solar: f64) {
    let controller = RuleBasedController::default();
    let cfg = SimulationConfig::new(40.0, 100.0, 22.0);
    let sample = ExogenousSample {
        grid_load_kw: 12.0,
        solar_prod_kw: solar,
    };
    let decision = controller.decide(&TimeStep::new(minute, 1), &sample, 100.0, &cfg);
    assert_eq!(decision.power_kw, 0.0);
    assert!(decision.saturated);
}

#[rstest]
#[case(40.0, 20.0, 7.0)]
#[case(60.0, 20.0, 22.0)]
#[case(100.0, 0.0, 3.7)]
#[case(75.0, 55.0, 2.0)]
fn soc_is_monotonic_and_bounded(#[case] capacity: f64, #[case] soc: f64, #[case] power: f64) {
    let result = common::run_default(SimulationConfig::new(capacity, soc, power));
    let series = result.soc_percent();
    assert!(series.iter().all(|s| *s <= 100.0));
    assert!(series.windows(2).all(|w| w[0] <= w[1]));
    assert!(series[0] >= soc);
}

#[test]
fn already_full_battery_completes_at_first_step() {
    let result = common::run_default(SimulationConfig::new(40.0, 100.0, 7.0));
    assert_eq!(result.completion().step(), Some(0));
    assert_eq!(result.completion_label(), "00:00");
    assert!(result.charging_power_kw().iter().all(|p| *p == 0.0));
    assert_eq!(result.energy_delivered_kwh(), 0.0);
}

#[test]
fn compact_vehicle_fills_after_32_kwh() {
    let result = common::run_default(common::compact_config());
    let step = result.completion().step().expect("should complete");

    // 80% of 40 kWh at 7 kW off-peak from midnight
    assert_eq!(step, 274);
    assert_eq!(result.completion_label(), "04:34");

    let stored: Vec<f64> = result
        .rows()
        .iter()
        .scan(0.0, |acc, r| {
            *acc += r.stored_kwh;
            Some(*acc)
        })
        .collect();
    assert!((stored[step] - 32.0).abs() < 1e-9);
    assert!(stored[step - 1] < 32.0);
    assert!((result.energy_delivered_kwh() - 32.0).abs() < 1e-9);
    assert_eq!(result.final_soc_percent(), 100.0);

    // every step before completion ran off-peak
    assert!(result.rows()[..=step].iter().all(|r| r.rule == ChargingRule::OffPeak));
    // charger idles for the rest of the day
    assert!(result.rows()[step + 1..].iter().all(|r| r.charging_power_kw == 0.0));
}

#[test]
fn slow_wallbox_does_not_fill() {
    let result = common::run_preset("slow_wallbox");
    assert!(!result.completion().is_reached());
    assert_eq!(result.completion_label(), "not reached within horizon");
    assert_eq!(result.len(), 1440);
    assert!(result.final_soc_percent() < 100.0);
}

#[test]
fn rule_trace_follows_the_day() {
    // Large battery so charging never stops
    let result = common::run_default(SimulationConfig::new(500.0, 0.0, 22.0));
    let rule_at = |minute: usize| result.rows()[minute].rule;
    assert_eq!(rule_at(60), ChargingRule::OffPeak);
    assert_eq!(rule_at(720), ChargingRule::SolarPriority);
    assert_eq!(rule_at(1079), ChargingRule::OffPeak);
    assert_eq!(rule_at(1080), ChargingRule::PeakLimit);
    assert_eq!(rule_at(1319), ChargingRule::PeakLimit);
    assert_eq!(rule_at(1320), ChargingRule::OffPeak);
    assert_eq!(result.rows()[1200].charging_power_kw, 5.0);
}

#[rstest]
#[case(0.0)]
#[case(-10.0)]
fn non_positive_capacity_is_rejected(#[case] capacity: f64) {
    let err = sim::run(SimulationConfig::new(capacity, 20.0, 7.0));
    match err {
        Err(SimError::InvalidConfiguration(problems)) => {
            assert!(problems.iter().any(|p| p.field == "battery_capacity_kwh"));
        }
        Ok(_) => panic!("capacity {capacity} should be rejected"),
    }
}

#[test]
fn identical_configs_give_identical_results() {
    let a = sim::run(common::compact_config()).expect("valid config");
    let b = sim::run(common::compact_config()).expect("valid config");
    assert_eq!(a.rows(), b.rows());
    assert_eq!(a.completion(), b.completion());
}

#[test]
fn seeded_noise_is_repeatable() {
    let mut scenario = ev_charge_sim::config::ScenarioConfig::default();
    scenario.noise.seed = 7;
    scenario.noise.grid_noise_std_kw = 1.0;
    scenario.noise.solar_noise_std = 0.1;
    let signals = scenario.signal_generator();
    let clock = Clock::new(1440, 1);
    assert_eq!(signals.table(&clock), signals.table(&clock));
    let dark = signals.sample(&TimeStep::new(100, 1));
    assert_eq!(dark.solar_prod_kw, 0.0);
}
