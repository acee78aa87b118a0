//! Doctor command implementation.

use crate::config::{self, CliOverrides};
use crate::error::Result;
use crate::storage::schema::{REQUIRED_COLUMNS, SCHEMA_VERSION, table_columns};
use crate::storage::transactions::find_audit_mismatches;
use rusqlite::{Connection, OpenFlags};
use serde::Serialize;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
enum CheckStatus {
    Ok,
    Warn,
    Error,
}

#[derive(Debug, Clone, Serialize)]
struct CheckResult {
    name: String,
    status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize)]
struct DoctorReport {
    ok: bool,
    checks: Vec<CheckResult>,
}

fn push_check(
    checks: &mut Vec<CheckResult>,
    name: &str,
    status: CheckStatus,
    message: Option<String>,
    details: Option<serde_json::Value>,
) {
    checks.push(CheckResult {
        name: name.to_string(),
        status,
        message,
        details,
    });
}

fn has_error(checks: &[CheckResult]) -> bool {
    checks
        .iter()
        .any(|check| matches!(check.status, CheckStatus::Error))
}

fn print_report(report: &DoctorReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(&report)?);
        return Ok(());
    }

    println!("eqt doctor");
    for check in &report.checks {
        let label = match check.status {
            CheckStatus::Ok => "OK",
            CheckStatus::Warn => "WARN",
            CheckStatus::Error => "ERROR",
        };
        if let Some(message) = &check.message {
            println!("{label} {}: {}", check.name, message);
        } else {
            println!("{label} {}", check.name);
        }
    }
    Ok(())
}

fn check_schema(conn: &Connection, checks: &mut Vec<CheckResult>) -> Result<()> {
    let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if version == SCHEMA_VERSION {
        push_check(checks, "schema.version", CheckStatus::Ok, None, None);
    } else {
        push_check(
            checks,
            "schema.version",
            if version > SCHEMA_VERSION {
                CheckStatus::Error
            } else {
                CheckStatus::Warn
            },
            Some(format!("found {version}, expected {SCHEMA_VERSION}")),
            None,
        );
    }

    let mut missing = Vec::new();
    for (table, cols) in REQUIRED_COLUMNS {
        let present = table_columns(conn, table)?;
        if present.is_empty() {
            missing.push(serde_json::json!({ "table": table, "missing": "table" }));
            continue;
        }
        let absent: Vec<&str> = cols
            .iter()
            .copied()
            .filter(|col| !present.iter().any(|p| p == col))
            .collect();
        if !absent.is_empty() {
            missing.push(serde_json::json!({ "table": table, "missing": absent }));
        }
    }

    if missing.is_empty() {
        push_check(checks, "schema.columns", CheckStatus::Ok, None, None);
    } else {
        push_check(
            checks,
            "schema.columns",
            CheckStatus::Error,
            Some("Missing required tables or columns".to_string()),
            Some(serde_json::json!({ "tables": missing })),
        );
    }
    Ok(())
}

fn check_integrity(conn: &Connection, checks: &mut Vec<CheckResult>) -> Result<()> {
    let result: String = conn.query_row("PRAGMA integrity_check", [], |row| row.get(0))?;
    if result.trim().eq_ignore_ascii_case("ok") {
        push_check(checks, "sqlite.integrity_check", CheckStatus::Ok, None, None);
    } else {
        push_check(
            checks,
            "sqlite.integrity_check",
            CheckStatus::Error,
            Some(result),
            None,
        );
    }
    Ok(())
}

fn check_audit_trail(conn: &Connection, checks: &mut Vec<CheckResult>) -> Result<()> {
    let mismatches = find_audit_mismatches(conn)?;
    if mismatches.is_empty() {
        push_check(
            checks,
            "audit.reconcile",
            CheckStatus::Ok,
            Some("Every quantity matches its logged changes".to_string()),
            None,
        );
    } else {
        push_check(
            checks,
            "audit.reconcile",
            CheckStatus::Error,
            Some(format!(
                "{} item(s) disagree with the transaction log",
                mismatches.len()
            )),
            Some(serde_json::to_value(&mismatches)?),
        );
    }
    Ok(())
}

fn run_checks(db_path: &Path) -> Result<Vec<CheckResult>> {
    let mut checks = Vec::new();

    if !db_path.is_file() {
        push_check(
            &mut checks,
            "db.exists",
            CheckStatus::Error,
            Some(format!("Missing {}", db_path.display())),
            None,
        );
        return Ok(checks);
    }

    match Connection::open_with_flags(db_path, OpenFlags::SQLITE_OPEN_READ_ONLY) {
        Ok(conn) => {
            check_schema(&conn, &mut checks)?;
            check_integrity(&conn, &mut checks)?;
            if !has_error(&checks) {
                check_audit_trail(&conn, &mut checks)?;
            }
        }
        Err(err) => {
            push_check(
                &mut checks,
                "db.open",
                CheckStatus::Error,
                Some(format!("Failed to open DB read-only: {err}")),
                Some(serde_json::json!({ "path": db_path.display().to_string() })),
            );
        }
    }
    Ok(checks)
}

/// Execute the doctor command. Returns whether every check passed.
///
/// # Errors
///
/// Returns an error if report serialization fails or if IO operations fail.
pub fn execute(json: bool, cli: &CliOverrides) -> Result<bool> {
    let data_dir = match config::discover_data_dir(None) {
        Ok(dir) => Some(dir),
        Err(_) if cli.db.is_some() => None,
        Err(_) => {
            let mut checks = Vec::new();
            push_check(
                &mut checks,
                "data_dir",
                CheckStatus::Error,
                Some(format!(
                    "Missing {} directory (run `eqt init`)",
                    config::DATA_DIR_NAME
                )),
                None,
            );
            let report = DoctorReport { ok: false, checks };
            print_report(&report, json)?;
            return Ok(false);
        }
    };

    let config = config::load_config(data_dir.as_deref(), cli)?;
    let checks = run_checks(&config.database)?;
    let report = DoctorReport {
        ok: !has_error(&checks),
        checks,
    };
    print_report(&report, json)?;
    Ok(report.ok)
}
