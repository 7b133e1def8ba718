use crate::sim::kpi::KpiReport;
use crate::sim::result::ResultSet;

/// Renders the run inputs and headline outcome.
pub fn format_summary(result: &ResultSet) -> String {
    let cfg = result.config();
    format!(
        "--- Charging Summary ---\n\
         Battery: {:.1} kWh, start {:.1}%, charger {:.1} kW\n\
         Horizon: {} min in {} steps\n\
         Full charge: {}",
        cfg.battery_capacity_kwh,
        cfg.initial_soc_percent,
        cfg.max_charging_kw,
        cfg.horizon_minutes,
        result.len(),
        result.completion_label(),
    )
}

pub fn print_report(result: &ResultSet, kpi: &KpiReport) {
    println!("\n{}", format_summary(result));
    println!("\n{kpi}");
}
