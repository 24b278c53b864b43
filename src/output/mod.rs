//! Output formatting for CLI display
//!
//! Plain `format_*` helpers build the text; `print_*` helpers add color and
//! write to stdout. Bulk results always render as one `<node>: <outcome>` line
//! per node followed by a `Success: N Failed: M` summary.

use std::io::{self, Write};

use colored::Colorize;
use serde_json::Value;

use crate::api::Outcome;
use crate::bulk::{BulkReport, Tally};

/// Format one node outcome line
#[must_use]
pub fn format_outcome(name: &str, outcome: &Outcome) -> String {
    format!("{name}: {outcome}")
}

/// Format the closing summary of a bulk operation
#[must_use]
pub fn format_summary(tally: Tally) -> String {
    tally.to_string()
}

/// All report lines in node order, summary last
#[must_use]
pub fn format_report(report: &BulkReport) -> Vec<String> {
    let mut lines: Vec<String> = report
        .outcomes
        .iter()
        .map(|(name, outcome)| format_outcome(name, outcome))
        .collect();
    lines.push(String::new());
    lines.push(format_summary(report.tally));
    lines
}

/// Write a bulk report: outcomes colored by result, then the summary.
///
/// # Errors
/// Returns an I/O error if writing to `out` fails.
pub fn write_report<W: Write>(out: &mut W, report: &BulkReport) -> io::Result<()> {
    for (name, outcome) in &report.outcomes {
        let line = format_outcome(name, outcome);
        if outcome.is_success() {
            writeln!(out, "{}", line.green())?;
        } else {
            writeln!(out, "{}", line.red())?;
        }
    }
    writeln!(out)?;
    writeln!(out, "{}", format_summary(report.tally).bold())
}

/// Print a bulk report to stdout
///
/// # Errors
/// Returns an I/O error if stdout is closed.
pub fn print_report(report: &BulkReport) -> io::Result<()> {
    write_report(&mut io::stdout().lock(), report)
}

/// Format a listing entry, e.g. `node1 (node)`
#[must_use]
pub fn format_entry(name: &str, label: &str, quiet: bool) -> String {
    if quiet {
        name.to_string()
    } else {
        format!("{name} ({label})")
    }
}

/// Indent a JSON body for display; non-JSON bodies are returned as text
#[must_use]
pub fn pretty_json(body: &[u8]) -> String {
    serde_json::from_slice::<Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| String::from_utf8_lossy(body).into_owned())
}

/// Format a service listing entry with its online state
#[must_use]
pub fn format_service(service: &Value) -> Option<String> {
    let hostname = service.get("hostname")?.as_str()?;
    if service.get("online").and_then(Value::as_bool) == Some(true) {
        let workers = service.get("workers").and_then(Value::as_u64).unwrap_or(0);
        Some(format!("{hostname} (hostname) online {workers} (workers)"))
    } else {
        Some(format!("{hostname} (hostname) offline"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::OutcomeMap;
    use serde_json::json;

    #[test]
    fn test_report_lines() {
        let outcomes: OutcomeMap = [
            ("n2".to_string(), Outcome::token("failed")),
            ("n1".to_string(), Outcome::token("ok")),
        ]
        .into_iter()
        .collect();
        let report = BulkReport::new(outcomes);
        assert_eq!(
            format_report(&report),
            vec!["n1: ok", "n2: failed", "", "Success: 1 Failed: 1"]
        );
    }

    #[test]
    fn test_written_report_ends_with_summary() {
        colored::control::set_override(false);
        let outcomes: OutcomeMap = [
            ("n1".to_string(), Outcome::token("ok")),
            ("n2".to_string(), Outcome::Detail(json!({"error": "timeout"}))),
        ]
        .into_iter()
        .collect();
        let report = BulkReport::new(outcomes);

        let mut out = Vec::new();
        write_report(&mut out, &report).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, format_report(&report));
        assert_eq!(lines.last(), Some(&"Success: 1 Failed: 1"));
    }

    #[test]
    fn test_empty_report_still_has_summary() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        write_report(&mut out, &BulkReport::default()).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\nSuccess: 0 Failed: 0\n");
    }

    #[test]
    fn test_format_entry() {
        assert_eq!(format_entry("mgmt", "network", false), "mgmt (network)");
        assert_eq!(format_entry("mgmt", "network", true), "mgmt");
    }

    #[test]
    fn test_pretty_json() {
        assert_eq!(pretty_json(br#"{"a":1}"#), "{\n  \"a\": 1\n}");
        assert_eq!(pretty_json(b"not json"), "not json");
    }

    #[test]
    fn test_format_service() {
        let online = json!({"hostname": "mn01", "online": true, "workers": 8});
        let offline = json!({"hostname": "mn02", "online": false});
        assert_eq!(
            format_service(&online).unwrap(),
            "mn01 (hostname) online 8 (workers)"
        );
        assert_eq!(format_service(&offline).unwrap(), "mn02 (hostname) offline");
        assert!(format_service(&json!({})).is_none());
    }
}
