//! Adjust command implementation.

use crate::cli::AdjustArgs;
use crate::config::{self, CliOverrides};
use crate::error::{Result, TrackerError};
use crate::format::AdjustResult;
use crate::model::AdjustDirection;

fn direction_and_delta(args: &AdjustArgs) -> Result<(AdjustDirection, i64)> {
    match (args.add, args.remove) {
        (Some(n), None) => Ok((AdjustDirection::Add, n)),
        (None, Some(n)) => Ok((AdjustDirection::Remove, n)),
        _ => Err(TrackerError::validation(
            "direction",
            "give exactly one of --add or --remove",
        )),
    }
}

/// Execute the adjust command.
///
/// # Errors
///
/// Returns `NotFound` for an unknown ID, `Validation` for a non-positive
/// amount, or a storage error.
pub fn execute(args: &AdjustArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let (direction, delta) = direction_and_delta(args)?;
    let id = super::parse_id(&args.id)?;

    let mut ctx = config::open_storage_with_cli(cli)?;
    let new_quantity = ctx
        .storage
        .adjust_quantity(&id, delta, direction, &args.notes)?;
    let item = ctx
        .storage
        .get_equipment(&id)?
        .ok_or_else(|| TrackerError::not_found(&id))?;

    if json {
        return super::print_json(&AdjustResult {
            id,
            new_quantity,
            low_stock: item.is_low_stock(),
        });
    }

    let verb = match direction {
        AdjustDirection::Add => "Added",
        AdjustDirection::Remove => "Removed",
    };
    println!(
        "{verb} {delta} x {} ({}); now {new_quantity}",
        item.name, item.id
    );
    if ctx.config.show_low_stock_alerts {
        if let Some(warning) = super::low_stock_warning(&item) {
            println!("{warning}");
        }
    }
    Ok(())
}
