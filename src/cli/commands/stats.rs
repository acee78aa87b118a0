//! Stats and categories commands.

use crate::config::{self, CliOverrides};
use crate::error::Result;
use crate::format::{Statistics, format_status_line};

/// Execute the stats command.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or queried.
pub fn execute(json: bool, cli: &CliOverrides) -> Result<()> {
    let ctx = config::open_storage_with_cli(cli)?;
    let stats = Statistics {
        summary: ctx.storage.summary()?,
        categories: ctx.storage.categories()?.len(),
        transactions: ctx.storage.count_transactions()?,
    };

    if json {
        return super::print_json(&stats);
    }

    println!("{}", format_status_line(&stats.summary));
    println!("Units on hand: {}", stats.summary.total_units);
    println!("Categories: {}", stats.categories);
    println!("Transactions logged: {}", stats.transactions);
    Ok(())
}

/// Execute the categories command.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or queried.
pub fn execute_categories(json: bool, cli: &CliOverrides) -> Result<()> {
    let ctx = config::open_storage_with_cli(cli)?;
    let categories = ctx.storage.categories()?;

    if json {
        return super::print_json(&categories);
    }
    if categories.is_empty() {
        println!("No categories.");
    }
    for category in &categories {
        println!("{category}");
    }
    Ok(())
}
