//! Output formatting for `equipment_tracker`.
//!
//! Supports both human-readable text output and machine-parseable JSON,
//! plus CSV export of the equipment list.
//!
//! # JSON Output Types
//!
//! - [`EquipmentRow`] - Equipment with low-stock flag (list)
//! - [`EquipmentDetails`] - Equipment with history (show)
//! - [`TransactionPage`] - One page of the log (history)
//! - [`Statistics`] - Aggregate stats (stats)

pub mod csv;
mod output;
mod text;

pub use self::csv::{CsvExporter, default_export_file_name, equipment_columns};
pub use output::{
    AdjustResult, EquipmentDetails, EquipmentRow, FileWritten, Statistics, TransactionPage,
};
pub use text::{
    format_change_icon, format_equipment_line, format_equipment_table, format_local_time,
    format_status_line, format_transaction_line, pad_to_width, truncate_to_width,
};
