//! CSV export for simulation step results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::result::ResultSet;

/// Column header for CSV export.
pub const HEADER: &str = "step,time,grid_load_kw,solar_prod_kw,charging_power_kw,soc_percent,rule";

/// Exports a result set to a CSV file at the given path.
///
/// Writes a header row followed by one data row per step. Produces
/// byte-identical output for identical inputs.
///
/// # Arguments
///
/// * `result` - Complete simulation result set
/// * `path` - Output file path
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(result: &ResultSet, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(result, buf)
}

/// Writes a result set as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(result: &ResultSet, writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(','))?;

    for r in result.rows() {
        wtr.write_record(&[
            r.step.to_string(),
            r.time.format("%H:%M").to_string(),
            format!("{:.4}", r.grid_load_kw),
            format!("{:.4}", r.solar_prod_kw),
            format!("{:.4}", r.charging_power_kw),
            format!("{:.4}", r.soc_percent),
            r.rule.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::types::{ChargingRule, SimulationConfig, StepResult, TimeStep};

    fn make_step(t: usize) -> StepResult {
        StepResult {
            step: t,
            time: TimeStep::new(t, 1).time_of_day(),
            grid_load_kw: 6.25,
            solar_prod_kw: 0.0,
            charging_power_kw: 7.0,
            soc_percent: 20.0 + t as f64 * 0.29,
            rule: ChargingRule::OffPeak,
            saturated: false,
            stored_kwh: 7.0 / 60.0,
        }
    }

    fn make_set(n: usize) -> ResultSet {
        let cfg = SimulationConfig::new(40.0, 20.0, 7.0).with_horizon(n.max(1), 1);
        ResultSet::new(cfg, (0..n).map(make_step).collect(), None, 0.0)
    }

    fn render(set: &ResultSet) -> String {
        let mut buf = Vec::new();
        write_csv(set, &mut buf).ok();
        String::from_utf8(buf).unwrap_or_default()
    }

    #[test]
    fn header_matches_column_layout() {
        let output = render(&make_set(1));
        assert_eq!(
            output.lines().next(),
            Some("step,time,grid_load_kw,solar_prod_kw,charging_power_kw,soc_percent,rule")
        );
    }

    #[test]
    fn row_count_matches_step_count() {
        let output = render(&make_set(24));
        // 1 header + 24 data rows
        assert_eq!(output.lines().count(), 25);
    }

    #[test]
    fn rows_use_clock_time_and_rule_names() {
        let output = render(&make_set(2));
        let second = output.lines().nth(2).unwrap_or("");
        assert_eq!(second, "1,00:01,6.2500,0.0000,7.0000,20.2900,off_peak");
    }

    #[test]
    fn deterministic_output() {
        let set = make_set(5);
        assert_eq!(render(&set), render(&set));
    }

    #[test]
    fn output_is_parseable() {
        let output = render(&make_set(3));
        let mut rdr = csv::ReaderBuilder::new().from_reader(output.as_bytes());
        let headers = rdr.headers().cloned().ok();
        assert_eq!(headers.as_ref().map(csv::StringRecord::len), Some(7));

        let mut row_count = 0;
        for record in rdr.records() {
            let rec = record.ok();
            assert!(rec.is_some(), "every row should parse");
            let rec = rec.unwrap_or_default();
            for i in 2..6 {
                let val: Result<f64, _> = rec[i].parse();
                assert!(val.is_ok(), "column {i} should parse as f64");
            }
            row_count += 1;
        }
        assert_eq!(row_count, 3);
    }

    #[test]
    fn export_writes_file() {
        let path = std::env::temp_dir().join("ev_charge_sim_export_test.csv");
        assert!(export_csv(&make_set(3), &path).is_ok());
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        assert!(content.starts_with("step,time"));
        let _ = std::fs::remove_file(&path);
    }
}
