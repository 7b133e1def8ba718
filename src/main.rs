//! EV charging simulator entry point: CLI wiring and config-driven engine construction.

use std::process;

use tracing::info;

use ev_charge_sim::cli::{self, CliOptions};
use ev_charge_sim::config::ScenarioConfig;
use ev_charge_sim::io::export::export_csv;
use ev_charge_sim::reporting;
use ev_charge_sim::sim::engine::Engine;
use ev_charge_sim::sim::kpi::KpiReport;
use ev_charge_sim::telemetry;

/// Resolves the scenario from `--scenario`, `--preset` or the default preset,
/// then applies the vehicle overrides.
fn load_scenario(cli: &CliOptions) -> Result<ScenarioConfig, String> {
    let mut scenario = if let Some(ref path) = cli.scenario {
        ScenarioConfig::from_toml_file(path).map_err(|e| e.to_string())?
    } else {
        let name = cli.preset.as_deref().unwrap_or("default");
        ScenarioConfig::from_preset(name).map_err(|e| e.to_string())?
    };

    if let Some(capacity) = cli.capacity_kwh {
        scenario.vehicle.capacity_kwh = capacity;
    }
    if let Some(soc) = cli.initial_soc_percent {
        scenario.vehicle.initial_soc_percent = soc;
    }
    if let Some(power) = cli.max_charging_kw {
        scenario.vehicle.max_charging_kw = power;
    }

    let errors = scenario.validate();
    if !errors.is_empty() {
        let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
        return Err(lines.join("\n"));
    }

    Ok(scenario)
}

fn run(cli: &CliOptions) -> Result<(), String> {
    let scenario = load_scenario(cli)?;

    let engine = Engine::new(
        scenario.simulation_config(),
        scenario.signal_generator(),
        scenario.controller(),
    )
    .map_err(|e| e.to_string())?;
    let result = engine.run();
    let kpi = KpiReport::from_result(&result);

    if !cli.summary_only {
        for r in result.rows() {
            println!("{r}");
        }
    }
    reporting::print_report(&result, &kpi);

    if let Some(ref path) = cli.telemetry_out {
        export_csv(&result, path)
            .map_err(|e| format!("failed to write CSV to {}: {e}", path.display()))?;
        info!(path = %path.display(), rows = result.len(), "telemetry written");
    }

    #[cfg(feature = "api")]
    if cli.serve {
        use std::net::SocketAddr;
        use std::sync::Arc;

        use ev_charge_sim::api::{self, AppState};

        let state = Arc::new(AppState::new(
            result,
            engine.signals().clone(),
            engine.controller().clone(),
        ));
        let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
        let rt = tokio::runtime::Runtime::new()
            .map_err(|e| format!("failed to create tokio runtime: {e}"))?;
        rt.block_on(api::serve(state, addr))
            .map_err(|e| format!("server error on {addr}: {e}"))?;
    }

    Ok(())
}

fn main() {
    telemetry::init_tracing();

    let cli = match cli::parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("error: {e}");
            cli::print_usage();
            process::exit(1);
        }
    };

    if cli.help {
        cli::print_usage();
        return;
    }

    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
