//! Export command implementation (CSV).

use chrono::Utc;
use std::path::PathBuf;

use crate::cli::ExportArgs;
use crate::config::{self, CliOverrides};
use crate::error::Result;
use crate::format::{FileWritten, default_export_file_name, equipment_columns};

/// Execute the export command.
///
/// # Errors
///
/// Returns an error if the database cannot be read or the file cannot be
/// written.
pub fn execute(args: &ExportArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let ctx = config::open_storage_with_cli(cli)?;
    let items = ctx.storage.list_equipment()?;

    let path = args
        .path
        .clone()
        .unwrap_or_else(|| PathBuf::from(default_export_file_name(Utc::now())));

    let rows = equipment_columns().write_file(&items, &path)?;
    tracing::info!(path = %path.display(), rows, "Exported equipment");

    if json {
        super::print_json(&FileWritten {
            path,
            bytes: None,
            rows: Some(rows),
        })
    } else {
        println!("Exported {rows} item(s) to {}", path.display());
        Ok(())
    }
}
