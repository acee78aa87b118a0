//! Command implementations, one module per subcommand.

pub mod add;
pub mod adjust;
pub mod backup;
pub mod config;
pub mod delete;
pub mod doctor;
pub mod export;
pub mod history;
pub mod init;
pub mod list;
pub mod show;
pub mod stats;
pub mod update;
pub mod version;

use serde::Serialize;

use crate::error::Result;
use crate::model::Equipment;
use crate::util::normalize_id;
use crate::validation::validate_id;

/// Print `value` as pretty JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Normalize a user-typed ID and reject anything that is not ID-shaped.
pub(crate) fn parse_id(raw: &str) -> Result<String> {
    let id = normalize_id(raw);
    validate_id(&id)?;
    Ok(id)
}

/// Text-mode alert for an item at or below its threshold.
pub(crate) fn low_stock_warning(item: &Equipment) -> Option<String> {
    item.is_low_stock().then(|| {
        format!(
            "Low stock: {} ({}) has {} (minimum {})",
            item.name, item.id, item.quantity, item.min_stock_level
        )
    })
}
