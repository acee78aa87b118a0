//! The append-only transaction log.
//!
//! Rows are only ever inserted, and only from inside the same SQL transaction
//! as the equipment write they describe. Reads come back newest first for
//! paging and oldest first for a single item's history.

use chrono::{DateTime, Utc};
use rusqlite::{Connection, Row, params};
use serde::Serialize;

use crate::error::Result;
use crate::model::{ChangeType, Transaction};
use crate::util::time::{format_timestamp, parse_timestamp};
use crate::validation::validate_page;

const TRANSACTION_COLUMNS: &str = "id, equipment_id, equipment_name, timestamp, change_type, old_quantity, new_quantity, notes";

/// A log row about to be written.
#[derive(Debug, Clone)]
pub(crate) struct LogEntry<'a> {
    pub equipment_id: &'a str,
    pub equipment_name: &'a str,
    pub change_type: ChangeType,
    pub old_quantity: i64,
    pub new_quantity: i64,
    pub notes: &'a str,
}

/// A live item whose quantity disagrees with the sum of its logged deltas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditMismatch {
    pub equipment_id: String,
    pub equipment_name: String,
    pub quantity: i64,
    pub logged_total: i64,
}

fn conversion_error(
    col: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(col, rusqlite::types::Type::Text, Box::new(err))
}

fn row_to_transaction(row: &Row<'_>) -> rusqlite::Result<Transaction> {
    let raw_ts: String = row.get(3)?;
    let raw_type: String = row.get(4)?;

    Ok(Transaction {
        id: row.get(0)?,
        equipment_id: row.get(1)?,
        equipment_name: row.get(2)?,
        timestamp: parse_timestamp(&raw_ts).map_err(|e| conversion_error(3, e))?,
        change_type: raw_type.parse().map_err(|e| conversion_error(4, e))?,
        old_quantity: row.get(5)?,
        new_quantity: row.get(6)?,
        notes: row.get(7)?,
    })
}

/// Append one row and return its ID.
pub(crate) fn append_transaction(
    conn: &Connection,
    entry: &LogEntry<'_>,
    timestamp: DateTime<Utc>,
) -> Result<i64> {
    conn.execute(
        "INSERT INTO transactions
            (equipment_id, equipment_name, timestamp, change_type, old_quantity, new_quantity, notes)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            entry.equipment_id,
            entry.equipment_name,
            format_timestamp(timestamp),
            entry.change_type.as_str(),
            entry.old_quantity,
            entry.new_quantity,
            entry.notes,
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// One page of the log, newest first. Pages are 1-based; a page past the end
/// is empty.
///
/// # Errors
///
/// Returns `Validation` if `page` or `page_size` is zero, or `Storage` if the
/// query fails.
pub fn get_transactions_page(
    conn: &Connection,
    page: usize,
    page_size: usize,
) -> Result<Vec<Transaction>> {
    validate_page(page, page_size)?;

    let Some(offset) = (page - 1)
        .checked_mul(page_size)
        .and_then(|o| i64::try_from(o).ok())
    else {
        return Ok(Vec::new());
    };
    let limit = i64::try_from(page_size).unwrap_or(i64::MAX);

    let mut stmt = conn.prepare(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions ORDER BY id DESC LIMIT ?1 OFFSET ?2"
    ))?;
    let rows = stmt.query_map(params![limit, offset], row_to_transaction)?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Every row for one equipment ID, oldest first. Works for deleted IDs too.
///
/// # Errors
///
/// Returns `Storage` if the query fails or a row cannot be decoded.
pub fn get_transactions_for_equipment(
    conn: &Connection,
    equipment_id: &str,
) -> Result<Vec<Transaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TRANSACTION_COLUMNS} FROM transactions WHERE equipment_id = ?1 ORDER BY id ASC"
    ))?;
    let rows = stmt.query_map([equipment_id], row_to_transaction)?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}

/// Total number of log rows.
///
/// # Errors
///
/// Returns `Storage` if the query fails.
pub fn count_transactions(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
    Ok(usize::try_from(count).unwrap_or(0))
}

/// Live items whose quantity is not the sum of `new - old` over their log rows.
///
/// # Errors
///
/// Returns `Storage` if the query fails.
pub fn find_audit_mismatches(conn: &Connection) -> Result<Vec<AuditMismatch>> {
    let mut stmt = conn.prepare(
        "SELECT e.id, e.name, e.quantity,
                COALESCE(SUM(t.new_quantity - t.old_quantity), 0) AS logged
         FROM equipment e
         LEFT JOIN transactions t ON t.equipment_id = e.id
         GROUP BY e.id
         HAVING e.quantity != logged
         ORDER BY e.id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(AuditMismatch {
            equipment_id: row.get(0)?,
            equipment_name: row.get(1)?,
            quantity: row.get(2)?,
            logged_total: row.get(3)?,
        })
    })?;

    let mut out = Vec::new();
    for row in rows {
        out.push(row?);
    }
    Ok(out)
}
