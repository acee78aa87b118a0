//! Schema bootstrap for the equipment database.
//!
//! The schema version lives in `PRAGMA user_version`. A fresh file is created
//! at [`SCHEMA_VERSION`]; a file from a newer build is refused rather than
//! guessed at.

use rusqlite::Connection;
use std::time::Duration;

use crate::error::{Result, TrackerError};

/// Current schema version written to `PRAGMA user_version`.
pub const SCHEMA_VERSION: i32 = 1;

pub const EQUIPMENT_TABLE_SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS equipment (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        quantity INTEGER NOT NULL DEFAULT 0 CHECK (quantity >= 0),
        category TEXT,
        min_stock_level INTEGER NOT NULL DEFAULT 0 CHECK (min_stock_level >= 0),
        last_updated TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_equipment_name ON equipment(name COLLATE NOCASE);
    CREATE INDEX IF NOT EXISTS idx_equipment_category ON equipment(category);
";

/// Append-only audit trail. The triggers make rows immutable at the engine level.
pub const TRANSACTIONS_TABLE_SCHEMA: &str = r"
    CREATE TABLE IF NOT EXISTS transactions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        equipment_id TEXT NOT NULL,
        equipment_name TEXT NOT NULL,
        timestamp TEXT NOT NULL,
        change_type TEXT NOT NULL
            CHECK (change_type IN ('Create', 'Update', 'Add', 'Remove', 'Delete')),
        old_quantity INTEGER NOT NULL,
        new_quantity INTEGER NOT NULL,
        notes TEXT NOT NULL DEFAULT ''
    );

    CREATE INDEX IF NOT EXISTS idx_transactions_equipment_id ON transactions(equipment_id);

    CREATE TRIGGER IF NOT EXISTS transactions_no_update
    BEFORE UPDATE ON transactions
    BEGIN
        SELECT RAISE(ABORT, 'transactions are append-only');
    END;

    CREATE TRIGGER IF NOT EXISTS transactions_no_delete
    BEFORE DELETE ON transactions
    BEGIN
        SELECT RAISE(ABORT, 'transactions are append-only');
    END;
";

/// Tables and columns `doctor` expects to find.
pub const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "equipment",
        &[
            "id",
            "name",
            "quantity",
            "category",
            "min_stock_level",
            "last_updated",
        ],
    ),
    (
        "transactions",
        &[
            "id",
            "equipment_id",
            "equipment_name",
            "timestamp",
            "change_type",
            "old_quantity",
            "new_quantity",
            "notes",
        ],
    ),
];

/// Apply connection pragmas every session needs.
///
/// The rollback journal (not WAL) keeps every committed write inside the main
/// database file, which is what the file-copy backup relies on.
///
/// # Errors
///
/// Returns `Storage` if a pragma cannot be applied.
pub fn configure_connection(conn: &Connection) -> Result<()> {
    conn.busy_timeout(Duration::from_secs(5))?;
    conn.pragma_update(None, "journal_mode", "DELETE")?;
    conn.pragma_update(None, "synchronous", "FULL")?;
    Ok(())
}

/// Create tables on a fresh database and check the version of an existing one.
///
/// # Errors
///
/// Returns `SchemaVersion` when the file is newer than this build, or
/// `Storage` if the DDL fails.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    let existing: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if existing > SCHEMA_VERSION {
        return Err(TrackerError::SchemaVersion {
            found: existing,
            supported: SCHEMA_VERSION,
        });
    }

    conn.execute_batch(EQUIPMENT_TABLE_SCHEMA)?;
    conn.execute_batch(TRANSACTIONS_TABLE_SCHEMA)?;

    if existing < SCHEMA_VERSION {
        tracing::debug!(from = existing, to = SCHEMA_VERSION, "Initialized schema");
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    }
    Ok(())
}

/// Column names of `table`, in declaration order.
///
/// # Errors
///
/// Returns `Storage` if the pragma query fails.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(1))?;
    let mut columns = Vec::new();
    for row in rows {
        columns.push(row?);
    }
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn creates_required_columns() {
        let conn = fresh();
        for (table, expected) in REQUIRED_COLUMNS {
            let columns = table_columns(&conn, table).unwrap();
            for column in *expected {
                assert!(columns.iter().any(|c| c == column), "{table}.{column}");
            }
        }
    }

    #[test]
    fn records_version_and_is_idempotent() {
        let conn = fresh();
        apply_schema(&conn).unwrap();
        let version: i32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version, SCHEMA_VERSION);
    }

    #[test]
    fn refuses_newer_schema() {
        let conn = Connection::open_in_memory().unwrap();
        conn.pragma_update(None, "user_version", SCHEMA_VERSION + 1)
            .unwrap();
        let err = apply_schema(&conn).unwrap_err();
        assert!(matches!(err, TrackerError::SchemaVersion { .. }));
    }

    #[test]
    fn transaction_rows_cannot_be_rewritten() {
        let conn = fresh();
        conn.execute(
            "INSERT INTO transactions (equipment_id, equipment_name, timestamp, change_type, old_quantity, new_quantity)
             VALUES ('eq-1', 'Hammer', '2026-01-01T00:00:00.000000Z', 'Create', 0, 5)",
            [],
        )
        .unwrap();

        assert!(
            conn.execute("UPDATE transactions SET new_quantity = 9", [])
                .is_err()
        );
        assert!(conn.execute("DELETE FROM transactions", []).is_err());
    }

    #[test]
    fn negative_quantity_is_rejected_by_engine() {
        let conn = fresh();
        let result = conn.execute(
            "INSERT INTO equipment (id, name, quantity, last_updated) VALUES ('eq-1', 'x', -1, 'now')",
            [],
        );
        assert!(result.is_err());
    }
}
