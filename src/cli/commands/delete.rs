//! Delete command implementation.

use crate::cli::DeleteArgs;
use crate::config::{self, CliOverrides};
use crate::error::Result;
use crate::util::normalize_id;
use serde::Serialize;

#[derive(Debug, Default, Serialize)]
struct DeleteOutput {
    deleted: Vec<String>,
    skipped: Vec<String>,
}

/// Execute the delete command.
///
/// Unknown IDs are reported as skipped; they are not an error.
///
/// # Errors
///
/// Returns an error if the database cannot be opened or a delete fails.
pub fn execute(args: &DeleteArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let mut ctx = config::open_storage_with_cli(cli)?;
    let mut output = DeleteOutput::default();

    for raw in &args.ids {
        let id = normalize_id(raw);
        if ctx.storage.delete_equipment(&id)? {
            output.deleted.push(id);
        } else {
            output.skipped.push(id);
        }
    }

    if json {
        return super::print_json(&output);
    }

    for id in &output.deleted {
        println!("Deleted {id}");
    }
    for id in &output.skipped {
        println!("No equipment {id}; nothing deleted");
    }
    Ok(())
}
