//! Output → human/json string formatting.
//!
//! Two modes:
//! - **Human** (default): plain text, the issue report as the engine renders it
//! - **JSON** (`--json`): `serde_json::to_string_pretty`

use serde_json::json;
use wpmigrate_engine::{Error, IssueLog, RunSummary};

/// Output formatting mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

/// Format an error.
pub fn format_error(err: &Error, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&json!({ "error": err.to_string() }))
            .unwrap_or_else(|_| format!("{{\"error\": \"{}\"}}", err)),
        OutputMode::Human => format!("(error) {}", err),
    }
}

/// Format the result of `detect`.
pub fn format_detect(serialized: bool, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => json!({ "serialized": serialized }).to_string(),
        OutputMode::Human => serialized.to_string(),
    }
}

/// Format the result of `rewrite`.
pub fn format_rewrite(original: &str, rewritten: Option<&str>, issues: &IssueLog, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&json!({
            "changed": rewritten.is_some(),
            "value": rewritten.unwrap_or(original),
            "issues": issues.issues().iter().map(|i| i.to_string()).collect::<Vec<_>>(),
        }))
        .unwrap_or_default(),
        OutputMode::Human => rewritten.unwrap_or(original).to_string(),
    }
}

/// Format a run summary followed by the issue report.
pub fn format_run(summary: &RunSummary, issues: &IssueLog, mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::to_string_pretty(&json!({
            "tables": summary.tables,
            "rows_scanned": summary.rows_scanned,
            "rows_updated": summary.rows_updated,
            "columns_changed": summary.columns_changed,
            "elapsed_seconds": summary.elapsed.as_secs_f64(),
            "issues": issues.issues().iter().map(|i| json!({
                "kind": format!("{:?}", i.kind),
                "table": i.table,
                "row": i.row_id,
                "column": i.column,
                "message": i.message,
                "context": i.context,
            })).collect::<Vec<_>>(),
        }))
        .unwrap_or_default(),
        OutputMode::Human => format!(
            "Performing the find and replace took {} seconds.\n\
             {} tables, {} rows scanned, {} rows updated, {} columns changed\n\n{}",
            summary.elapsed.as_secs(),
            summary.tables,
            summary.rows_scanned,
            summary.rows_updated,
            summary.columns_changed,
            issues.report()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wpmigrate_engine::IssueKind;

    #[test]
    fn test_format_detect() {
        assert_eq!(format_detect(true, OutputMode::Human), "true");
        assert_eq!(format_detect(false, OutputMode::Json), "{\"serialized\":false}");
    }

    #[test]
    fn test_format_rewrite_unchanged_prints_original() {
        let issues = IssueLog::new();
        assert_eq!(format_rewrite("abc", None, &issues, OutputMode::Human), "abc");
        assert_eq!(format_rewrite("abc", Some("xyz"), &issues, OutputMode::Human), "xyz");
    }

    #[test]
    fn test_format_run_human() {
        let summary = RunSummary {
            tables: 2,
            rows_scanned: 10,
            rows_updated: 3,
            columns_changed: 4,
            issues: 0,
            elapsed: Duration::from_secs(1),
        };
        let out = format_run(&summary, &IssueLog::new(), OutputMode::Human);
        assert!(out.contains("2 tables, 10 rows scanned, 3 rows updated, 4 columns changed"));
        assert!(out.ends_with("No errors were logged.\n"));
    }

    #[test]
    fn test_format_run_json() {
        let mut issues = IssueLog::new();
        issues.record_row(IssueKind::MissingPrimaryKey, "wp_links", None, "", "");
        let out = format_run(&RunSummary::default(), &issues, OutputMode::Json);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["issues"][0]["table"], "wp_links");
        assert_eq!(parsed["issues"][0]["kind"], "MissingPrimaryKey");
    }

    #[test]
    fn test_format_error() {
        let err = Error::config("bad");
        assert_eq!(format_error(&err, OutputMode::Human), "(error) Configuration error: bad");
    }
}
