//! Version command implementation.

use crate::cli::VersionArgs;
use crate::error::Result;
use crate::storage::SCHEMA_VERSION;
use serde::Serialize;

#[derive(Serialize)]
struct VersionOutput<'a> {
    version: &'a str,
    build: &'a str,
    schema_version: i32,
}

/// Execute the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(args: &VersionArgs, json: bool) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");

    if args.short {
        println!("{version}");
        return Ok(());
    }

    let build = if cfg!(debug_assertions) {
        "dev"
    } else {
        "release"
    };

    if json {
        return super::print_json(&VersionOutput {
            version,
            build,
            schema_version: SCHEMA_VERSION,
        });
    }

    println!("eqt version {version} ({build}, schema {SCHEMA_VERSION})");
    Ok(())
}
