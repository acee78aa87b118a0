//! Add command implementation.

use crate::cli::AddArgs;
use crate::config::{self, CliOverrides};
use crate::error::Result;
use crate::format::{EquipmentRow, format_equipment_line};
use crate::model::NewEquipment;

fn to_new_equipment(args: &AddArgs) -> NewEquipment {
    NewEquipment {
        name: args.name.clone(),
        quantity: args.quantity,
        category: args.category.clone(),
        min_stock_level: args.min_stock,
    }
}

/// Execute the add command.
///
/// # Errors
///
/// Returns an error if validation fails, the database cannot be opened, or
/// the insert fails.
pub fn execute(args: &AddArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let mut ctx = config::open_storage_with_cli(cli)?;
    let item = ctx.storage.add_equipment(&to_new_equipment(args))?;

    if json {
        return super::print_json(&EquipmentRow::from(item));
    }

    println!("Added {}", format_equipment_line(&item));
    if ctx.config.show_low_stock_alerts {
        if let Some(warning) = super::low_stock_warning(&item) {
            println!("{warning}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_map_to_input() {
        let args = AddArgs {
            name: "Hammer".into(),
            quantity: 10,
            category: Some("Tools".into()),
            min_stock: 5,
        };
        assert_eq!(
            to_new_equipment(&args),
            NewEquipment::new("Hammer", 10).category("Tools").min_stock_level(5)
        );
    }
}
