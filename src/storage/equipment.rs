//! Statement-level access to the `equipment` table.
//!
//! Functions take a plain `&Connection` so they run equally against the
//! session connection or an open `rusqlite::Transaction`. Nothing here writes
//! to the audit log; pairing each write with its log row is the job of
//! [`super::SqliteStorage`].

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};
use serde::Serialize;
use std::collections::BTreeSet;

use crate::error::Result;
use crate::model::Equipment;
use crate::util::time::{format_timestamp, parse_timestamp};

const EQUIPMENT_COLUMNS: &str = "id, name, quantity, category, min_stock_level, last_updated";

/// Filter options for listing equipment.
#[derive(Debug, Clone, Default)]
pub struct EquipmentFilter {
    /// Case-insensitive substring matched against name and category.
    pub search: Option<String>,
    /// Exact category match (case-insensitive).
    pub category: Option<String>,
    pub low_stock_only: bool,
}

impl EquipmentFilter {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.search.as_deref().is_none_or(|s| s.trim().is_empty())
            && self.category.is_none()
            && !self.low_stock_only
    }

    /// Whether `item` passes every populated criterion.
    #[must_use]
    pub fn matches(&self, item: &Equipment) -> bool {
        if self.low_stock_only && !item.is_low_stock() {
            return false;
        }

        if let Some(wanted) = &self.category {
            let same = item
                .category
                .as_deref()
                .is_some_and(|c| c.to_lowercase() == wanted.trim().to_lowercase());
            if !same {
                return false;
            }
        }

        match self.search.as_deref().map(str::trim) {
            Some(needle) if !needle.is_empty() => {
                let needle = needle.to_lowercase();
                item.name.to_lowercase().contains(&needle)
                    || item
                        .category
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&needle))
            }
            _ => true,
        }
    }
}

/// Aggregate counts over the current inventory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InventorySummary {
    pub total_items: usize,
    pub total_units: i64,
    pub low_stock_items: usize,
}

fn row_to_equipment(row: &Row<'_>) -> rusqlite::Result<Equipment> {
    let raw_updated: String = row.get(5)?;
    let last_updated = parse_timestamp(&raw_updated).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
    })?;

    Ok(Equipment {
        id: row.get(0)?,
        name: row.get(1)?,
        quantity: row.get(2)?,
        category: row.get(3)?,
        min_stock_level: row.get(4)?,
        last_updated,
    })
}

pub(crate) fn insert_equipment(conn: &Connection, item: &Equipment) -> Result<()> {
    conn.execute(
        &format!("INSERT INTO equipment ({EQUIPMENT_COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6)"),
        params![
            item.id,
            item.name,
            item.quantity,
            item.category,
            item.min_stock_level,
            format_timestamp(item.last_updated),
        ],
    )?;
    Ok(())
}

/// Look up one record by ID.
///
/// # Errors
///
/// Returns `Storage` if the query fails or a stored value cannot be decoded.
pub fn get_equipment(conn: &Connection, id: &str) -> Result<Option<Equipment>> {
    let item = conn
        .query_row(
            &format!("SELECT {EQUIPMENT_COLUMNS} FROM equipment WHERE id = ?1"),
            [id],
            row_to_equipment,
        )
        .optional()?;
    Ok(item)
}

/// All records ordered by name (case-insensitive), ties broken by ID.
///
/// `Apple` and `apple` sort next to each other, ahead of `banana` and `Zebra`;
/// a plain byte order would put `Zebra` first.
///
/// # Errors
///
/// Returns `Storage` if the query fails or a stored value cannot be decoded.
pub fn list_equipment(conn: &Connection) -> Result<Vec<Equipment>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {EQUIPMENT_COLUMNS} FROM equipment ORDER BY name COLLATE NOCASE, name, id"
    ))?;
    let rows = stmt.query_map([], row_to_equipment)?;

    let mut items = Vec::new();
    for row in rows {
        items.push(row?);
    }
    Ok(items)
}

/// [`list_equipment`] narrowed by `filter`.
///
/// Matching happens in Rust so case folding covers non-ASCII names.
///
/// # Errors
///
/// Returns `Storage` if the query fails.
pub fn list_equipment_filtered(
    conn: &Connection,
    filter: &EquipmentFilter,
) -> Result<Vec<Equipment>> {
    let mut items = list_equipment(conn)?;
    if !filter.is_empty() {
        items.retain(|item| filter.matches(item));
    }
    Ok(items)
}

pub(crate) fn update_metadata(
    conn: &Connection,
    id: &str,
    name: &str,
    category: Option<&str>,
    min_stock_level: i64,
    now: DateTime<Utc>,
) -> Result<usize> {
    let changed = conn.execute(
        "UPDATE equipment SET name = ?2, category = ?3, min_stock_level = ?4, last_updated = ?5
         WHERE id = ?1",
        params![id, name, category, min_stock_level, format_timestamp(now)],
    )?;
    Ok(changed)
}

pub(crate) fn set_quantity(
    conn: &Connection,
    id: &str,
    quantity: i64,
    now: DateTime<Utc>,
) -> Result<usize> {
    let changed = conn.execute(
        "UPDATE equipment SET quantity = ?2, last_updated = ?3 WHERE id = ?1",
        params![id, quantity, format_timestamp(now)],
    )?;
    Ok(changed)
}

pub(crate) fn delete_equipment(conn: &Connection, id: &str) -> Result<usize> {
    let changed = conn.execute("DELETE FROM equipment WHERE id = ?1", [id])?;
    Ok(changed)
}

/// Whether `id` belongs to a live record or appears anywhere in the log.
///
/// Checking the log as well keeps IDs of deleted equipment from being reissued.
pub(crate) fn id_taken(conn: &Connection, id: &str) -> Result<bool> {
    let taken: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM equipment WHERE id = ?1)
             OR EXISTS(SELECT 1 FROM transactions WHERE equipment_id = ?1)",
        [id],
        |row| row.get(0),
    )?;
    Ok(taken)
}

/// Number of distinct IDs ever issued, live or deleted.
pub(crate) fn count_known_ids(conn: &Connection) -> Result<usize> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM (
             SELECT id FROM equipment
             UNION
             SELECT equipment_id FROM transactions
         )",
        [],
        |row| row.get(0),
    )?;
    Ok(usize::try_from(count).unwrap_or(0))
}

/// Distinct non-empty categories, sorted.
///
/// # Errors
///
/// Returns `Storage` if the query fails.
pub fn categories(conn: &Connection) -> Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT DISTINCT category FROM equipment
         WHERE category IS NOT NULL AND category != ''",
    )?;
    let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

    let mut set = BTreeSet::new();
    for row in rows {
        set.insert(row?);
    }
    Ok(set.into_iter().collect())
}

/// Totals across all live records. The unit total saturates at `i64::MAX`.
///
/// # Errors
///
/// Returns `Storage` if the query fails.
pub fn summary(conn: &Connection) -> Result<InventorySummary> {
    let mut stmt = conn.prepare("SELECT quantity, min_stock_level FROM equipment")?;
    let rows = stmt.query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?)))?;

    let mut summary = InventorySummary::default();
    for row in rows {
        let (quantity, min_stock_level) = row?;
        summary.total_items += 1;
        summary.total_units = summary.total_units.saturating_add(quantity);
        if quantity <= min_stock_level {
            summary.low_stock_items += 1;
        }
    }
    Ok(summary)
}
