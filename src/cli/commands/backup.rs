//! Backup command implementation.

use chrono::Utc;
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

use crate::cli::BackupArgs;
use crate::config::{self, CliOverrides};
use crate::error::{Result, TrackerError};
use crate::format::{FileWritten, format_local_time};
use crate::storage::{default_backup_file_name, list_backups};

#[derive(Serialize)]
struct BackupListing {
    path: PathBuf,
    timestamp: chrono::DateTime<Utc>,
    size: u64,
}

/// Execute the backup command.
///
/// # Errors
///
/// Returns `Backup` if the copy fails, or an error if the backup directory
/// cannot be read or created.
pub fn execute(args: &BackupArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let ctx = config::open_storage_with_cli(cli)?;
    let backup_dir = ctx.config.backup_dir_or_default();

    if args.list {
        let entries = list_backups(&backup_dir)?;
        if json {
            let listing: Vec<BackupListing> = entries
                .into_iter()
                .map(|e| BackupListing {
                    path: e.path,
                    timestamp: e.timestamp,
                    size: e.size,
                })
                .collect();
            return super::print_json(&listing);
        }
        if entries.is_empty() {
            println!("No backups in {}", backup_dir.display());
        }
        for entry in entries {
            println!(
                "{}  {:>10} bytes  {}",
                format_local_time(entry.timestamp),
                entry.size,
                entry.path.display()
            );
        }
        return Ok(());
    }

    let destination = if let Some(path) = &args.path {
        path.clone()
    } else {
        fs::create_dir_all(&backup_dir)
            .map_err(|e| TrackerError::backup(&backup_dir, e.to_string()))?;
        backup_dir.join(default_backup_file_name(Utc::now()))
    };

    let bytes = ctx.storage.backup(&destination)?;

    if json {
        super::print_json(&FileWritten {
            path: destination,
            bytes: Some(bytes),
            rows: None,
        })
    } else {
        println!("Backup written to {} ({bytes} bytes)", destination.display());
        Ok(())
    }
}
