//! Command-line option parsing.

use std::env;
use std::path::PathBuf;

/// Default API port for `--serve`.
pub const DEFAULT_PORT: u16 = 3000;

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq)]
pub struct CliOptions {
    pub scenario: Option<PathBuf>,
    pub preset: Option<String>,
    pub capacity_kwh: Option<f64>,
    pub initial_soc_percent: Option<f64>,
    pub max_charging_kw: Option<f64>,
    pub telemetry_out: Option<PathBuf>,
    pub summary_only: bool,
    pub serve: bool,
    pub port: u16,
    pub help: bool,
}

/// Parses the process arguments.
///
/// # Errors
///
/// Returns a human-readable message for unknown flags, missing or malformed
/// values, and conflicting options.
pub fn parse_args() -> Result<CliOptions, String> {
    let args: Vec<String> = env::args().skip(1).collect();
    parse_options(&args)
}

/// Parses an argument list (without the program name).
///
/// # Errors
///
/// See [`parse_args`].
pub fn parse_options(args: &[String]) -> Result<CliOptions, String> {
    let mut i = 0usize;
    let mut opts = CliOptions {
        scenario: None,
        preset: None,
        capacity_kwh: None,
        initial_soc_percent: None,
        max_charging_kw: None,
        telemetry_out: None,
        summary_only: false,
        serve: false,
        port: DEFAULT_PORT,
        help: false,
    };

    while i < args.len() {
        match args[i].as_str() {
            "--scenario" => {
                i += 1;
                let path =
                    args.next_or_err(i, "missing value for --scenario (expected a TOML file path)")?;
                if opts.scenario.replace(PathBuf::from(path)).is_some() {
                    return Err("--scenario provided more than once".to_string());
                }
            }
            "--preset" => {
                i += 1;
                let name =
                    args.next_or_err(i, "missing value for --preset (expected a preset name)")?;
                if opts.preset.replace(name.to_string()).is_some() {
                    return Err("--preset provided more than once".to_string());
                }
            }
            "--capacity" => {
                i += 1;
                opts.capacity_kwh = Some(args.parse_at(i, "--capacity")?);
            }
            "--initial-soc" => {
                i += 1;
                opts.initial_soc_percent = Some(args.parse_at(i, "--initial-soc")?);
            }
            "--max-power" => {
                i += 1;
                opts.max_charging_kw = Some(args.parse_at(i, "--max-power")?);
            }
            "--telemetry-out" => {
                i += 1;
                let path = args.next_or_err(
                    i,
                    "missing value for --telemetry-out (expected a file path)",
                )?;
                if opts.telemetry_out.replace(PathBuf::from(path)).is_some() {
                    return Err("--telemetry-out provided more than once".to_string());
                }
            }
            "--summary-only" => opts.summary_only = true,
            "--serve" if cfg!(feature = "api") => opts.serve = true,
            "--port" if cfg!(feature = "api") => {
                i += 1;
                opts.port = args.parse_at(i, "--port")?;
            }
            "--help" | "-h" => opts.help = true,
            other => return Err(format!("unknown argument: {other}")),
        }
        i += 1;
    }

    if opts.scenario.is_some() && opts.preset.is_some() {
        return Err(
            "arguments `--scenario` and `--preset` are mutually exclusive; choose one source"
                .to_string(),
        );
    }

    Ok(opts)
}

trait SliceArgExt {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String>;
    fn parse_at<T: std::str::FromStr>(&self, index: usize, flag: &str) -> Result<T, String>;
}

impl SliceArgExt for [String] {
    fn next_or_err(&self, index: usize, err: &str) -> Result<&str, String> {
        self.get(index)
            .map(String::as_str)
            .ok_or_else(|| err.to_string())
    }

    fn parse_at<T: std::str::FromStr>(&self, index: usize, flag: &str) -> Result<T, String> {
        let raw = self.next_or_err(index, &format!("missing value for {flag}"))?;
        raw.parse::<T>()
            .map_err(|_| format!("invalid value \"{raw}\" for {flag}"))
    }
}

pub fn print_usage() {
    eprintln!("ev-charge-sim: one-day EV charging simulation with solar and peak-load rules");
    eprintln!();
    eprintln!("Usage: ev-charge-sim [OPTIONS]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --scenario <path>        Load scenario from TOML config file");
    eprintln!("  --preset <name>          Use a built-in preset (default, compact, slow_wallbox)");
    eprintln!("  --capacity <kWh>         Override battery capacity");
    eprintln!("  --initial-soc <%>        Override initial state of charge");
    eprintln!("  --max-power <kW>         Override charger power limit");
    eprintln!("  --telemetry-out <path>   Export step results to CSV");
    eprintln!("  --summary-only           Skip the per-step lines");
    if cfg!(feature = "api") {
        eprintln!("  --serve                  Start REST API server after simulation");
        eprintln!("  --port <u16>             API server port (default: {DEFAULT_PORT})");
    }
    eprintln!("  --help                   Show this help message");
    eprintln!();
    eprintln!("If no --scenario or --preset is given, the default preset is used.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_args_use_defaults() {
        let opts = parse_options(&[]).expect("parse should succeed");
        assert!(opts.scenario.is_none());
        assert!(opts.preset.is_none());
        assert!(!opts.summary_only);
        assert_eq!(opts.port, DEFAULT_PORT);
    }

    #[test]
    fn supports_scenario_cli() {
        let opts = parse_options(&args(&["--scenario", "scenarios/compact.toml"]))
            .expect("parse should succeed");
        assert_eq!(
            opts.scenario.as_deref().and_then(|p| p.to_str()),
            Some("scenarios/compact.toml")
        );
        assert!(opts.preset.is_none());
    }

    #[test]
    fn supports_overrides() {
        let opts = parse_options(&args(&[
            "--preset",
            "compact",
            "--capacity",
            "50",
            "--initial-soc",
            "35.5",
            "--max-power",
            "11",
            "--summary-only",
        ]))
        .expect("parse should succeed");
        assert_eq!(opts.preset.as_deref(), Some("compact"));
        assert_eq!(opts.capacity_kwh, Some(50.0));
        assert_eq!(opts.initial_soc_percent, Some(35.5));
        assert_eq!(opts.max_charging_kw, Some(11.0));
        assert!(opts.summary_only);
    }

    #[test]
    fn rejects_scenario_and_preset_together() {
        let err = parse_options(&args(&["--scenario", "a.toml", "--preset", "compact"]));
        assert!(err.is_err());
    }

    #[test]
    fn rejects_non_numeric_override() {
        let err = parse_options(&args(&["--capacity", "lots"])).unwrap_err();
        assert!(err.contains("--capacity"));
    }

    #[test]
    fn rejects_missing_value() {
        let err = parse_options(&args(&["--max-power"])).unwrap_err();
        assert!(err.contains("missing value"));
    }

    #[test]
    fn rejects_unknown_argument() {
        let err = parse_options(&args(&["--turbo"])).unwrap_err();
        assert!(err.contains("unknown argument"));
    }

    #[test]
    fn help_flag_is_reported() {
        let opts = parse_options(&args(&["-h"])).expect("parse should succeed");
        assert!(opts.help);
    }

    #[cfg(feature = "api")]
    #[test]
    fn supports_serve_and_port() {
        let opts = parse_options(&args(&["--serve", "--port", "8080"])).expect("parse should succeed");
        assert!(opts.serve);
        assert_eq!(opts.port, 8080);
    }
}
