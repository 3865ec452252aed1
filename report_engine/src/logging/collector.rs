//! Data-quality diagnostics collection
//!
//! Recoverable conditions (missing limits, repeated condition keys, defaulted
//! temperatures, staging copy failures) are collected here during a run and
//! reported as one summary after the document is written. They never change
//! the exit code.

use super::events::LogEvent;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// Accumulates recoverable data-quality events per dataset
pub struct DiagnosticsCollector {
    events: Mutex<BTreeMap<String, Vec<LogEvent>>>,
}

/// Summary over all collected diagnostics
#[derive(Debug, Clone, Default)]
pub struct DiagnosticsSummary {
    pub total_datasets: usize,
    pub total_warnings: usize,
    pub no_limit_parameters: usize,
    pub repeated_condition_keys: usize,
    pub defaulted_temperatures: usize,
    pub staging_failures: usize,
}

impl DiagnosticsCollector {
    pub fn new() -> Self {
        Self {
            events: Mutex::new(BTreeMap::new()),
        }
    }

    /// Record a data-quality event against a dataset id
    pub fn record(&self, dataset_id: &str, event: LogEvent) {
        if let Ok(mut events) = self.events.lock() {
            events
                .entry(dataset_id.to_string())
                .or_default()
                .push(event);
        }
    }

    /// Events recorded for one dataset
    pub fn dataset_events(&self, dataset_id: &str) -> Vec<LogEvent> {
        self.events
            .lock()
            .ok()
            .and_then(|events| events.get(dataset_id).cloned())
            .unwrap_or_default()
    }

    pub fn get_summary(&self) -> DiagnosticsSummary {
        let mut summary = DiagnosticsSummary::default();
        if let Ok(events) = self.events.lock() {
            summary.total_datasets = events.len();
            for dataset_events in events.values() {
                for event in dataset_events {
                    summary.total_warnings += 1;
                    match event.code.as_str() {
                        "W031" => summary.no_limit_parameters += 1,
                        "W041" => summary.repeated_condition_keys += 1,
                        "W040" => summary.defaulted_temperatures += 1,
                        "W060" => summary.staging_failures += 1,
                        _ => {}
                    }
                }
            }
        }
        summary
    }

    pub fn clear(&self) {
        if let Ok(mut events) = self.events.lock() {
            events.clear();
        }
    }
}

impl Default for DiagnosticsCollector {
    fn default() -> Self {
        Self::new()
    }
}

/// Format the collected diagnostics grouped by dataset, cargo-style
pub fn format_summary(collector: &DiagnosticsCollector) -> String {
    let summary = collector.get_summary();
    if summary.total_warnings == 0 {
        return "No data-quality warnings collected".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{} data-quality warning(s) across {} dataset(s)\n",
        summary.total_warnings, summary.total_datasets
    ));
    if summary.no_limit_parameters > 0 {
        output.push_str(&format!(
            "  parameters without limits: {}\n",
            summary.no_limit_parameters
        ));
    }
    if summary.repeated_condition_keys > 0 {
        output.push_str(&format!(
            "  repeated condition keys: {}\n",
            summary.repeated_condition_keys
        ));
    }
    if summary.defaulted_temperatures > 0 {
        output.push_str(&format!(
            "  defaulted temperatures: {}\n",
            summary.defaulted_temperatures
        ));
    }
    if summary.staging_failures > 0 {
        output.push_str(&format!(
            "  staging copy failures: {}\n",
            summary.staging_failures
        ));
    }

    if let Ok(events) = collector.events.lock() {
        for (dataset_id, dataset_events) in events.iter() {
            output.push_str(&format!("dataset {}:\n", dataset_id));
            for event in dataset_events {
                output.push_str(&format!("  {}\n", event.format()));
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::codes;

    #[test]
    fn test_summary_counts() {
        let collector = DiagnosticsCollector::new();
        collector.record(
            "ds1",
            LogEvent::warning_with_code(codes::limits::NO_LIMIT_MATCH, "no limit for ibat_stb"),
        );
        collector.record(
            "ds1",
            LogEvent::warning_with_code(codes::assembly::CONDITION_REPEATED, "repeated key"),
        );
        collector.record(
            "ds2",
            LogEvent::warning_with_code(codes::assembly::EMPTY_TEMPERATURE, "temp defaulted"),
        );

        let summary = collector.get_summary();
        assert_eq!(summary.total_datasets, 2);
        assert_eq!(summary.total_warnings, 3);
        assert_eq!(summary.no_limit_parameters, 1);
        assert_eq!(summary.repeated_condition_keys, 1);
        assert_eq!(summary.defaulted_temperatures, 1);
        assert_eq!(summary.staging_failures, 0);
    }

    #[test]
    fn test_format_summary_empty() {
        let collector = DiagnosticsCollector::new();
        assert!(format_summary(&collector).contains("No data-quality warnings"));
    }

    #[test]
    fn test_format_summary_groups_by_dataset() {
        let collector = DiagnosticsCollector::new();
        collector.record(
            "vbat_sweep",
            LogEvent::warning_with_code(codes::limits::NO_LIMIT_MATCH, "no limit for iq"),
        );
        let formatted = format_summary(&collector);
        assert!(formatted.contains("dataset vbat_sweep:"));
        assert!(formatted.contains("W031"));
    }

    #[test]
    fn test_clear() {
        let collector = DiagnosticsCollector::new();
        collector.record("ds", LogEvent::warning("w"));
        collector.clear();
        assert_eq!(collector.get_summary().total_warnings, 0);
    }
}
