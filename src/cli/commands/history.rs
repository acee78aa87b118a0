//! History command implementation.
//!
//! Without an ID: one page of the whole log, newest first. With an ID: every
//! entry for that item, oldest first, including after it was deleted.

use crate::cli::HistoryArgs;
use crate::config::{self, CliOverrides};
use crate::error::Result;
use crate::format::{TransactionPage, format_transaction_line};

/// Execute the history command.
///
/// # Errors
///
/// Returns `Validation` for a zero page or page size, or a storage error.
pub fn execute(args: &HistoryArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let overrides = CliOverrides {
        page_size: args.page_size.or(cli.page_size),
        ..cli.clone()
    };
    let ctx = config::open_storage_with_cli(&overrides)?;

    if let Some(raw) = &args.id {
        let id = super::parse_id(raw)?;
        let entries = ctx.storage.equipment_history(&id)?;
        if json {
            return super::print_json(&entries);
        }
        if entries.is_empty() {
            println!("No history for {id}.");
        }
        for tx in &entries {
            println!("{}", format_transaction_line(tx));
        }
        return Ok(());
    }

    let page_size = ctx.config.history_page_size;
    let transactions = ctx.storage.list_transactions(args.page, page_size)?;
    let total = ctx.storage.count_transactions()?;

    if json {
        return super::print_json(&TransactionPage {
            page: args.page,
            page_size,
            total,
            transactions,
        });
    }

    if transactions.is_empty() {
        println!("No transactions on page {}.", args.page);
    } else {
        for tx in &transactions {
            println!("{}", format_transaction_line(tx));
        }
        let pages = total.div_ceil(page_size);
        println!("\nPage {} of {pages} ({total} transaction(s))", args.page);
    }
    Ok(())
}
