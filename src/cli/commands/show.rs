//! Show command implementation.

use crate::cli::ShowArgs;
use crate::config::{self, CliOverrides};
use crate::error::{Result, TrackerError};
use crate::format::{EquipmentDetails, format_local_time, format_transaction_line};

/// Execute the show command.
///
/// # Errors
///
/// Returns `NotFound` for an unknown ID, or a storage error.
pub fn execute(args: &ShowArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let id = super::parse_id(&args.id)?;
    let ctx = config::open_storage_with_cli(cli)?;
    let item = ctx
        .storage
        .get_equipment(&id)?
        .ok_or_else(|| TrackerError::not_found(&id))?;
    let history = ctx.storage.equipment_history(&id)?;

    if json {
        let low_stock = item.is_low_stock();
        return super::print_json(&EquipmentDetails {
            equipment: item,
            low_stock,
            history,
        });
    }

    println!("{} {}", item.id, item.name);
    println!("  Quantity:     {}", item.quantity);
    println!("  Min stock:    {}", item.min_stock_level);
    println!(
        "  Category:     {}",
        item.category.as_deref().unwrap_or("-")
    );
    println!("  Last updated: {}", format_local_time(item.last_updated));
    if item.is_low_stock() {
        println!("  LOW STOCK");
    }

    println!("\nHistory:");
    for tx in &history {
        println!("  {}", format_transaction_line(tx));
    }
    Ok(())
}
