//! List command implementation.
//!
//! Primary browsing view: filters by search text, category and low-stock
//! state, ordered by name.

use crate::cli::ListArgs;
use crate::config::{self, CliOverrides};
use crate::error::Result;
use crate::format::{EquipmentRow, format_equipment_table, format_status_line};
use crate::storage::EquipmentFilter;

/// Convert CLI args to storage filter.
fn build_filter(args: &ListArgs) -> EquipmentFilter {
    EquipmentFilter {
        search: args
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(ToString::to_string),
        category: args
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(ToString::to_string),
        low_stock_only: args.low_stock,
    }
}

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or the query fails.
pub fn execute(args: &ListArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let ctx = config::open_storage_with_cli(cli)?;
    let filter = build_filter(args);
    let items = ctx.storage.list_equipment_filtered(&filter)?;

    if json {
        let rows: Vec<EquipmentRow> = items.into_iter().map(EquipmentRow::from).collect();
        return super::print_json(&rows);
    }

    if items.is_empty() {
        println!("No equipment found.");
    } else {
        print!(
            "{}",
            format_equipment_table(&items, ctx.config.show_low_stock_alerts)
        );
        if filter.is_empty() {
            println!("\n{}", format_status_line(&ctx.storage.summary()?));
        } else {
            println!("\n{} item(s)", items.len());
        }
    }
    Ok(())
}
