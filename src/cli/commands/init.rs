use crate::cli::InitArgs;
use crate::config::{CONFIG_FILE_NAME, CliOverrides, DATA_DIR_NAME, DEFAULT_DB_FILE};
use crate::error::{Result, TrackerError};
use crate::storage::SqliteStorage;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct InitOutput {
    data_dir: PathBuf,
    database: PathBuf,
    schema_version: i32,
}

/// Execute the init command.
///
/// # Errors
///
/// Returns `AlreadyInitialized` if the database exists and `--force` was not
/// given, or an error if the directory or database cannot be created.
pub fn execute(args: &InitArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    init_in(Path::new("."), args, json, cli)
}

fn init_in(root: &Path, args: &InitArgs, json: bool, cli: &CliOverrides) -> Result<()> {
    let data_dir = root.join(DATA_DIR_NAME);
    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| data_dir.join(DEFAULT_DB_FILE));

    if db_path.exists() && !args.force {
        return Err(TrackerError::AlreadyInitialized { path: db_path });
    }
    fs::create_dir_all(&data_dir)?;

    // Creates the file and applies the schema.
    let _storage = SqliteStorage::open(&db_path)?;

    let config_path = data_dir.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        let config = r"# Equipment Tracker Configuration
# database: equipment.db
# history_page_size: 100
# show_low_stock_alerts: true
# backup_dir: backups
# log_dir: logs
";
        fs::write(config_path, config)?;
    }

    let gitignore_path = data_dir.join(".gitignore");
    if !gitignore_path.exists() {
        let gitignore = r"# Database
*.db
*.db-journal

# Backups and logs
backups/
logs/
";
        fs::write(gitignore_path, gitignore)?;
    }

    tracing::info!(path = %db_path.display(), "Initialized workspace");

    if json {
        super::print_json(&InitOutput {
            data_dir,
            database: db_path,
            schema_version: crate::storage::SCHEMA_VERSION,
        })?;
    } else {
        println!("Initialized equipment workspace in {DATA_DIR_NAME}/");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_layout() {
        let dir = TempDir::new().unwrap();
        init_in(dir.path(), &InitArgs::default(), true, &CliOverrides::default()).unwrap();

        let data_dir = dir.path().join(DATA_DIR_NAME);
        assert!(data_dir.join(DEFAULT_DB_FILE).is_file());
        assert!(data_dir.join(CONFIG_FILE_NAME).is_file());
        assert!(data_dir.join(".gitignore").is_file());
    }

    #[test]
    fn second_init_needs_force_and_keeps_data() {
        let dir = TempDir::new().unwrap();
        let cli = CliOverrides::default();
        init_in(dir.path(), &InitArgs::default(), true, &cli).unwrap();

        let db = dir.path().join(DATA_DIR_NAME).join(DEFAULT_DB_FILE);
        let id = SqliteStorage::open(&db)
            .unwrap()
            .add_equipment(&crate::model::NewEquipment::new("Hammer", 1))
            .unwrap()
            .id;

        let err = init_in(dir.path(), &InitArgs::default(), true, &cli).unwrap_err();
        assert!(matches!(err, TrackerError::AlreadyInitialized { .. }));

        init_in(dir.path(), &InitArgs { force: true }, true, &cli).unwrap();
        assert!(SqliteStorage::open(&db).unwrap().get_equipment(&id).unwrap().is_some());
    }
}
