//! JSONL audit trail logging.
//!
//! Each command appends events to an audit.jsonl file, one JSON object per
//! line.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use folio::{ProjectedPlan, Valuation};
use serde::Serialize;

use crate::error::Result;

/// An audit event written to the JSONL trail.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub event: &'static str,
    pub ts: DateTime<Utc>,
    #[serde(flatten)]
    pub data: serde_json::Value,
}

/// Append-only audit logger.
pub struct AuditLog {
    writer: BufWriter<std::fs::File>,
}

impl AuditLog {
    /// Open (or create) the audit log file for appending.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: BufWriter::new(file),
        })
    }

    /// Log an event with arbitrary JSON data.
    pub fn log(&mut self, event: &'static str, data: serde_json::Value) -> Result<()> {
        let entry = AuditEvent {
            event,
            ts: Utc::now(),
            data,
        };
        let json = serde_json::to_string(&entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writeln!(self.writer, "{json}")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Log a simple event with no additional data.
    pub fn log_simple(&mut self, event: &'static str) -> Result<()> {
        self.log(event, serde_json::json!({}))
    }
}

/// Convenience: log a command start.
pub fn log_run_started(audit: &mut AuditLog, command: &str) -> Result<()> {
    audit.log("run_started", serde_json::json!({ "command": command }))
}

/// Convenience: log a valuation at live prices.
pub fn log_valuation(audit: &mut AuditLog, valuation: &Valuation) -> Result<()> {
    let positions: Vec<_> = valuation
        .positions()
        .iter()
        .map(|p| {
            serde_json::json!({
                "symbol": p.symbol().as_str(),
                "shares": p.position.shares,
                "price": p.price(),
                "value": p.total_value,
                "current_pct": p.current_pct,
                "target_pct": p.target_pct(),
            })
        })
        .collect();

    audit.log(
        "valuation",
        serde_json::json!({
            "total_value": valuation.total_value(),
            "positions": positions,
        }),
    )
}

/// Convenience: log a computed plan.
pub fn log_plan(audit: &mut AuditLog, plan: &ProjectedPlan) -> Result<()> {
    let steps: Vec<_> = plan
        .steps
        .iter()
        .map(|s| {
            serde_json::json!({
                "type": s.trade_type.to_string(),
                "symbol": s.symbol.as_str(),
                "shares": s.share_delta,
                "value": s.value.original,
            })
        })
        .collect();

    audit.log(
        "plan_computed",
        serde_json::json!({
            "currency": plan.currency.code(),
            "rate": plan.rate,
            "steps": steps,
            "final_value": plan.final_value.original,
            "cash_required": plan.cash_required.original,
            "total_trades": plan.total_trades,
        }),
    )
}

/// Convenience: log that targets do not add up to 100%.
pub fn log_targets_incomplete(audit: &mut AuditLog, target_sum: f64) -> Result<()> {
    audit.log(
        "targets_incomplete",
        serde_json::json!({ "target_sum": target_sum }),
    )
}

/// Convenience: log a holdings mutation.
pub fn log_holdings_changed(
    audit: &mut AuditLog,
    action: &str,
    detail: serde_json::Value,
) -> Result<()> {
    audit.log(
        "holdings_changed",
        serde_json::json!({
            "action": action,
            "detail": detail,
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio::{Position, Symbol};
    use folio::valuation::value_positions;

    fn read_lines(path: &Path) -> Vec<serde_json::Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn audit_log_writes_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test_audit.jsonl");

        {
            let mut log = AuditLog::open(&path).unwrap();
            log.log_simple("test_event").unwrap();
            log.log("test_data", serde_json::json!({"key": "value"}))
                .unwrap();
        }

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["event"], "test_event");
        assert_eq!(lines[1]["key"], "value");
        assert!(lines[1]["ts"].is_string());
    }

    #[test]
    fn audit_log_appends_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        AuditLog::open(&path).unwrap().log_simple("first").unwrap();
        AuditLog::open(&path).unwrap().log_simple("second").unwrap();

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1]["event"], "second");
    }

    #[test]
    fn audit_log_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("subdir").join("deep").join("audit.jsonl");

        let mut log = AuditLog::open(&path).unwrap();
        log.log_simple("test").unwrap();

        assert!(path.exists());
    }

    #[test]
    fn valuation_event_lists_positions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.jsonl");

        let positions = [Position::new(Symbol::new("VOO"), 2.0, 500.0).with_target(100.0)];
        let valuation = value_positions(&positions, &[]).unwrap();
        {
            let mut log = AuditLog::open(&path).unwrap();
            log_run_started(&mut log, "show").unwrap();
            log_valuation(&mut log, &valuation).unwrap();
            log_targets_incomplete(&mut log, 90.0).unwrap();
        }

        let lines = read_lines(&path);
        assert_eq!(lines[0]["command"], "show");
        assert_eq!(lines[1]["event"], "valuation");
        assert_eq!(lines[1]["total_value"], 1000.0);
        assert_eq!(lines[1]["positions"][0]["symbol"], "VOO");
        assert_eq!(lines[2]["target_sum"], 90.0);
    }
}
