//! Config command implementation.

use crate::cli::ConfigSubcommand;
use crate::config::{self, CONFIG_KEYS, CliOverrides};
use crate::error::Result;
use serde_json::json;

/// Execute a config subcommand.
///
/// # Errors
///
/// Returns `Config` for unknown keys or bad values, `NotInitialized` when
/// setting a value outside a workspace, or a file error.
pub fn execute(command: &ConfigSubcommand, json: bool, cli: &CliOverrides) -> Result<()> {
    let data_dir = config::discover_data_dir(None).ok();

    match command {
        ConfigSubcommand::Get { key } => {
            let config = config::load_config(data_dir.as_deref(), cli)?;
            let value = config.get(key)?;
            if json {
                super::print_json(&json!({ "key": key, "value": value }))?;
            } else {
                println!("{}", value.unwrap_or_default());
            }
        }
        ConfigSubcommand::Set { key, value } => {
            let data_dir = config::discover_data_dir(None)?;
            config::set_workspace_value(&data_dir, key, value)?;
            tracing::info!(key = %key, "Updated workspace config");
            if json {
                super::print_json(&json!({ "key": key, "value": value }))?;
            } else {
                println!("Set {key} = {value}");
            }
        }
        ConfigSubcommand::List => {
            let config = config::load_config(data_dir.as_deref(), cli)?;
            if json {
                super::print_json(&config)?;
            } else {
                for key in CONFIG_KEYS {
                    let value = config.get(key)?.unwrap_or_else(|| "(unset)".to_string());
                    println!("{key} = {value}");
                }
            }
        }
    }
    Ok(())
}
