//! `SQLite` storage layer for `equipment_tracker`.
//!
//! One database file holds two tables:
//! - `equipment`: current state, one row per live item
//! - `transactions`: append-only audit log of every quantity change
//!
//! # Submodules
//!
//! - [`schema`] - DDL, pragmas and version check
//! - [`equipment`] - statement-level access to the equipment table
//! - [`transactions`] - log insertion, paging and reconciliation
//! - [`backup`] - file-level snapshots
//! - [`sqlite`] - the [`SqliteStorage`] facade tying the above together

pub mod backup;
pub mod equipment;
pub mod schema;
pub mod sqlite;
pub mod transactions;

pub use backup::{BackupEntry, default_backup_file_name, list_backups};
pub use equipment::{EquipmentFilter, InventorySummary};
pub use schema::SCHEMA_VERSION;
pub use sqlite::SqliteStorage;
pub use transactions::AuditMismatch;
