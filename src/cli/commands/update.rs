//! Update command implementation.
//!
//! Only the fields given on the command line change; the rest are carried
//! over from the stored record.

use crate::cli::UpdateArgs;
use crate::config::{self, CliOverrides};
use crate::error::{Result, TrackerError};
use crate::format::{EquipmentRow, format_equipment_line};
use crate::model::{Equipment, EquipmentUpdate};

fn merge_update(existing: &Equipment, args: &UpdateArgs) -> EquipmentUpdate {
    let mut update = EquipmentUpdate::from(existing);
    if let Some(name) = &args.name {
        update.name.clone_from(name);
    }
    if args.no_category {
        update.category = None;
    } else if let Some(category) = &args.category {
        update.category = Some(category.clone());
    }
    if let Some(level) = args.min_stock {
        update.min_stock_level = level;
    }
    update
}

/// Execute the update command.
///
/// # Errors
///
/// Returns `NotFound` for an unknown ID, `Validation` for bad values, or a
/// storage error.
pub fn execute(args: &UpdateArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    if args.name.is_none() && args.category.is_none() && !args.no_category && args.min_stock.is_none()
    {
        return Err(TrackerError::validation(
            "update",
            "nothing to change (use --name, --category, --no-category or --min-stock)",
        ));
    }

    let id = super::parse_id(&args.id)?;
    let mut ctx = config::open_storage_with_cli(cli)?;
    let existing = ctx
        .storage
        .get_equipment(&id)?
        .ok_or_else(|| TrackerError::not_found(&id))?;

    ctx.storage
        .update_equipment_metadata(&id, &merge_update(&existing, args))?;

    let updated = ctx
        .storage
        .get_equipment(&id)?
        .ok_or_else(|| TrackerError::not_found(&id))?;

    if json {
        super::print_json(&EquipmentRow::from(updated))
    } else {
        println!("Updated {}", format_equipment_line(&updated));
        Ok(())
    }
}
