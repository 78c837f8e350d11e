//! Output formatting and persistence for the dashboard.
//!
//! Supports pretty-printing, JSON export, CSV export of the cleaned records
//! and writing the rendered HTML page.

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::dashboard::Dashboard;
use crate::record::ParkingRecord;
use crate::summary::SummaryView;
use csv::WriterBuilder;
use std::fs;
use std::path::Path;

/// Logs the summary using Rust's debug pretty-print format.
pub fn print_pretty(summary: &SummaryView) {
    info!("{:#?}", summary);
}

/// Logs the summary as pretty-printed JSON.
pub fn print_json(summary: &SummaryView) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}

fn ensure_parent(path: &str) -> Result<()> {
    if let Some(parent) = Path::new(path).parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    Ok(())
}

/// Writes records and summary as pretty JSON. NaN numbers become `null`.
pub fn write_json(path: &str, dashboard: &Dashboard) -> Result<()> {
    ensure_parent(path)?;
    let body = serde_json::to_string_pretty(dashboard)?;
    fs::write(path, body).with_context(|| format!("failed to write {path}"))?;
    debug!(path, records = dashboard.records.len(), "Dashboard JSON written");
    Ok(())
}

/// Writes the cleaned records as CSV with a header row, replacing any
/// existing file.
pub fn write_records_csv(path: &str, records: &[ParkingRecord]) -> Result<()> {
    ensure_parent(path)?;
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create {path}"))?;

    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    debug!(path, records = records.len(), "Records CSV written");
    Ok(())
}

pub fn write_html(path: &str, html: &str) -> Result<()> {
    ensure_parent(path)?;
    fs::write(path, html).with_context(|| format!("failed to write {path}"))?;
    debug!(path, bytes = html.len(), "Dashboard HTML written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::loader::parse_records;
    use crate::record::record;
    use crate::summary::aggregate;
    use std::env;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    fn sample_records() -> Vec<ParkingRecord> {
        vec![
            record("B1", Some("ABC123"), Some("2024-01-01T10:00:00"), 100.0),
            record("B2", None, None, f64::NAN),
        ]
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        let summary = aggregate(&sample_records()).unwrap();
        print_pretty(&summary);
    }

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_print_pretty_is_visible_at_info() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let summary = aggregate(&sample_records()).unwrap();
        tracing::subscriber::with_default(subscriber, || print_pretty(&summary));

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("SummaryView"));
        assert!(output.contains("bay_usage"));
    }

    #[test]
    fn test_print_json_does_not_panic() {
        let summary = aggregate(&sample_records()).unwrap();
        print_json(&summary).unwrap();
    }

    #[test]
    fn test_write_json_contains_records_and_summary() {
        let path = temp_path("parking_dashboard_test_export.json");
        let _ = fs::remove_file(&path);

        let dashboard = Dashboard::from_records(sample_records(), &DashboardConfig::default());
        write_json(&path, &dashboard).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(value["records"].as_array().unwrap().len(), 2);
        assert_eq!(value["records"][1]["duration_seconds"], serde_json::Value::Null);
        assert_eq!(value["summary"]["total"], 2);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_json_empty_dashboard_has_null_summary() {
        let path = temp_path("parking_dashboard_test_empty.json");
        let _ = fs::remove_file(&path);

        write_json(&path, &Dashboard::default()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value["summary"].is_null());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_records_csv_can_be_reloaded() {
        let path = temp_path("parking_dashboard_test_records.csv");
        let _ = fs::remove_file(&path);

        write_records_csv(&path, &sample_records()).unwrap();
        write_records_csv(&path, &sample_records()).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        // header + 2 rows, overwritten rather than appended
        assert_eq!(content.lines().count(), 3);

        let reloaded = parse_records(content.as_bytes()).unwrap();
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded[0].bay_id, "B1");
        assert!(reloaded[1].duration_seconds.is_nan());

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_html() {
        let path = temp_path("parking_dashboard_test_page.html");
        let _ = fs::remove_file(&path);

        write_html(&path, "<html></html>").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "<html></html>");

        fs::remove_file(&path).unwrap();
    }
}
