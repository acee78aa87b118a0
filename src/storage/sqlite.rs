//! `SqliteStorage`: the repository facade over one database file.
//!
//! Every quantity-changing operation runs inside a single `IMMEDIATE`
//! transaction that writes the equipment row and its log row together. If
//! either statement fails the transaction is dropped and rolled back.

use chrono::{DateTime, SubsecRound, Utc};
use rusqlite::{Connection, TransactionBehavior};
use std::fs;
use std::path::{Path, PathBuf};

use super::backup::copy_database_file;
use super::equipment::{self, EquipmentFilter, InventorySummary};
use super::schema::{apply_schema, configure_connection};
use super::transactions::{self, AuditMismatch, LogEntry};
use crate::error::{Result, TrackerError};
use crate::model::{AdjustDirection, ChangeType, Equipment, EquipmentUpdate, NewEquipment, Transaction};
use crate::util::IdGenerator;
use crate::validation::{EquipmentValidator, normalize_category, normalize_name};

const CREATE_NOTE: &str = "Equipment created";
const DELETE_NOTE: &str = "Equipment deleted";

/// Equipment store and transaction log behind one connection.
pub struct SqliteStorage {
    conn: Connection,
    path: Option<PathBuf>,
    id_gen: IdGenerator,
}

impl std::fmt::Debug for SqliteStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteStorage")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

/// Run `f` inside an `IMMEDIATE` transaction and commit on success.
fn in_transaction<R>(
    conn: &mut Connection,
    op: &str,
    f: impl FnOnce(&rusqlite::Transaction<'_>) -> Result<R>,
) -> Result<R> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    match f(&tx) {
        Ok(value) => {
            tx.commit()?;
            Ok(value)
        }
        Err(err) => {
            tracing::debug!(op, error = %err, "Rolling back");
            Err(err)
        }
    }
}

/// Stored timestamps carry microseconds; truncating here keeps returned
/// records equal to what a later read produces.
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

impl SqliteStorage {
    /// Open (or create) the database at `path`.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the parent directory cannot be created, `SchemaVersion`
    /// if the file is from a newer build, or `Storage` on any SQLite failure.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        configure_connection(&conn)?;
        apply_schema(&conn)?;
        tracing::debug!(path = %path.display(), "Opened equipment database");

        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
            id_gen: IdGenerator::with_defaults(),
        })
    }

    /// Open a private in-memory database. Backups are not available.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if SQLite cannot allocate the database.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        apply_schema(&conn)?;
        Ok(Self {
            conn,
            path: None,
            id_gen: IdGenerator::with_defaults(),
        })
    }

    /// Path of the backing file, `None` for in-memory stores.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    // ========================================================================
    // Equipment
    // ========================================================================

    /// All equipment ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the read fails.
    pub fn list_equipment(&self) -> Result<Vec<Equipment>> {
        equipment::list_equipment(&self.conn)
    }

    /// Equipment narrowed by search text, category or low-stock state.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the read fails.
    pub fn list_equipment_filtered(&self, filter: &EquipmentFilter) -> Result<Vec<Equipment>> {
        equipment::list_equipment_filtered(&self.conn, filter)
    }

    /// # Errors
    ///
    /// Returns `Storage` if the read fails.
    pub fn get_equipment(&self, id: &str) -> Result<Option<Equipment>> {
        equipment::get_equipment(&self.conn, id)
    }

    /// Create a record and its `Create` log row (`0 -> quantity`).
    ///
    /// # Errors
    ///
    /// Returns `Validation`/`ValidationErrors` for bad input, or `Storage` if
    /// the write fails (nothing is persisted in that case).
    pub fn add_equipment(&mut self, input: &NewEquipment) -> Result<Equipment> {
        EquipmentValidator::validate_new(input).map_err(TrackerError::from_validation_errors)?;

        let name = normalize_name(&input.name);
        let category = normalize_category(input.category.as_deref());
        let stamp = now();
        let id_gen = &self.id_gen;

        let created = in_transaction(&mut self.conn, "add_equipment", |tx| {
            let known = equipment::count_known_ids(tx)?;
            let id = id_gen.generate(&name, category.as_deref(), stamp, known, |candidate| {
                equipment::id_taken(tx, candidate)
            })?;

            let item = Equipment {
                id,
                name: name.clone(),
                quantity: input.quantity,
                category: category.clone(),
                min_stock_level: input.min_stock_level,
                last_updated: stamp,
            };
            equipment::insert_equipment(tx, &item)?;
            transactions::append_transaction(
                tx,
                &LogEntry {
                    equipment_id: &item.id,
                    equipment_name: &item.name,
                    change_type: ChangeType::Create,
                    old_quantity: 0,
                    new_quantity: item.quantity,
                    notes: CREATE_NOTE,
                },
                stamp,
            )?;
            Ok(item)
        })?;

        tracing::info!(id = %created.id, name = %created.name, quantity = created.quantity, "Added equipment");
        Ok(created)
    }

    /// Replace name, category and minimum stock level. Quantity is untouched
    /// and no log row is written.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for bad input, `NotFound` if `id` does not exist,
    /// or `Storage` if the write fails.
    pub fn update_equipment_metadata(&mut self, id: &str, update: &EquipmentUpdate) -> Result<()> {
        EquipmentValidator::validate_update(update).map_err(TrackerError::from_validation_errors)?;

        let name = normalize_name(&update.name);
        let category = normalize_category(update.category.as_deref());
        let stamp = now();

        in_transaction(&mut self.conn, "update_equipment_metadata", |tx| {
            let changed = equipment::update_metadata(
                tx,
                id,
                &name,
                category.as_deref(),
                update.min_stock_level,
                stamp,
            )?;
            if changed == 0 {
                return Err(TrackerError::not_found(id));
            }
            Ok(())
        })?;

        tracing::info!(id, "Updated equipment metadata");
        Ok(())
    }

    /// Delete a record and log `quantity -> 0`.
    ///
    /// Returns `false` (and writes nothing) when `id` does not exist.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the write fails.
    pub fn delete_equipment(&mut self, id: &str) -> Result<bool> {
        let stamp = now();

        let deleted = in_transaction(&mut self.conn, "delete_equipment", |tx| {
            let Some(existing) = equipment::get_equipment(tx, id)? else {
                return Ok(false);
            };

            equipment::delete_equipment(tx, id)?;
            transactions::append_transaction(
                tx,
                &LogEntry {
                    equipment_id: &existing.id,
                    equipment_name: &existing.name,
                    change_type: ChangeType::Delete,
                    old_quantity: existing.quantity,
                    new_quantity: 0,
                    notes: DELETE_NOTE,
                },
                stamp,
            )?;
            Ok(true)
        })?;

        if deleted {
            tracing::info!(id, "Deleted equipment");
        } else {
            tracing::debug!(id, "Delete skipped: no such equipment");
        }
        Ok(deleted)
    }

    /// Add or remove `delta` units and log the change. Removal clamps at zero.
    ///
    /// An empty `notes` is replaced by "Added N units." / "Removed N units.".
    /// Returns the new quantity.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if `delta` is not positive or an addition would
    /// overflow, `NotFound` if `id` does not exist, or `Storage` if the write
    /// fails.
    pub fn adjust_quantity(
        &mut self,
        id: &str,
        delta: i64,
        direction: AdjustDirection,
        notes: &str,
    ) -> Result<i64> {
        EquipmentValidator::validate_adjustment(delta, notes)?;

        let notes = if notes.trim().is_empty() {
            direction.default_note(delta)
        } else {
            notes.to_string()
        };
        let stamp = now();

        let (old, new) = in_transaction(&mut self.conn, "adjust_quantity", |tx| {
            let existing =
                equipment::get_equipment(tx, id)?.ok_or_else(|| TrackerError::not_found(id))?;

            let new_quantity = direction
                .apply(existing.quantity, delta)
                .ok_or_else(|| TrackerError::validation("delta", "quantity would overflow"))?;

            equipment::set_quantity(tx, id, new_quantity, stamp)?;
            transactions::append_transaction(
                tx,
                &LogEntry {
                    equipment_id: &existing.id,
                    equipment_name: &existing.name,
                    change_type: direction.change_type(),
                    old_quantity: existing.quantity,
                    new_quantity,
                    notes: &notes,
                },
                stamp,
            )?;
            Ok((existing.quantity, new_quantity))
        })?;

        tracing::info!(id, old, new, "Adjusted quantity");
        Ok(new)
    }

    /// Distinct categories in use.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the read fails.
    pub fn categories(&self) -> Result<Vec<String>> {
        equipment::categories(&self.conn)
    }

    /// # Errors
    ///
    /// Returns `Storage` if the read fails.
    pub fn summary(&self) -> Result<InventorySummary> {
        equipment::summary(&self.conn)
    }

    // ========================================================================
    // Transaction log
    // ========================================================================

    /// One page of the log, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if `page` or `page_size` is zero, or `Storage` if
    /// the read fails.
    pub fn list_transactions(&self, page: usize, page_size: usize) -> Result<Vec<Transaction>> {
        transactions::get_transactions_page(&self.conn, page, page_size)
    }

    /// Full history of one ID, oldest first. Deleted IDs keep their history.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the read fails.
    pub fn equipment_history(&self, id: &str) -> Result<Vec<Transaction>> {
        transactions::get_transactions_for_equipment(&self.conn, id)
    }

    /// # Errors
    ///
    /// Returns `Storage` if the read fails.
    pub fn count_transactions(&self) -> Result<usize> {
        transactions::count_transactions(&self.conn)
    }

    /// Live items whose quantity cannot be reconstructed from the log.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the read fails.
    pub fn verify_audit_trail(&self) -> Result<Vec<AuditMismatch>> {
        transactions::find_audit_mismatches(&self.conn)
    }

    // ========================================================================
    // Backup
    // ========================================================================

    /// Copy the database file to `destination`, overwriting it.
    ///
    /// Returns the number of bytes copied.
    ///
    /// # Errors
    ///
    /// Returns `Backup` for in-memory stores, while a write transaction is
    /// open, or if the copy fails.
    pub fn backup(&self, destination: &Path) -> Result<u64> {
        let Some(source) = self.path.as_deref() else {
            return Err(TrackerError::backup(
                destination,
                "in-memory database has no file to copy",
            ));
        };

        if !self.conn.is_autocommit() {
            return Err(TrackerError::backup(
                destination,
                "a write transaction is in progress",
            ));
        }

        let bytes = copy_database_file(source, destination)?;
        tracing::info!(destination = %destination.display(), bytes, "Backup written");
        Ok(bytes)
    }
}
