//! Configuration management for `equipment_tracker`.
//!
//! Configuration is loaded from YAML files with support for:
//! - Workspace config (.equipment/config.yaml)
//! - User config (~/.config/equipment-tracker/config.yaml)
//! - Environment variable overrides (`EQT_DB`, `EQT_PAGE_SIZE`, `EQT_LOG_DIR`)
//! - Command-line overrides
//!
//! Later layers win. Relative paths in a file are resolved against the
//! directory holding that file.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, TrackerError};
use crate::storage::SqliteStorage;

/// Name of the per-workspace data directory.
pub const DATA_DIR_NAME: &str = ".equipment";
pub const DEFAULT_DB_FILE: &str = "equipment.db";
pub const CONFIG_FILE_NAME: &str = "config.yaml";
pub const DEFAULT_PAGE_SIZE: usize = 100;

pub const ENV_DB: &str = "EQT_DB";
pub const ENV_PAGE_SIZE: &str = "EQT_PAGE_SIZE";
pub const ENV_LOG_DIR: &str = "EQT_LOG_DIR";

/// Keys accepted by `config get` / `config set`.
pub const CONFIG_KEYS: &[&str] = &[
    "database",
    "history_page_size",
    "show_low_stock_alerts",
    "backup_dir",
    "log_dir",
];

/// Overrides supplied on the command line.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub db: Option<PathBuf>,
    pub page_size: Option<usize>,
}

/// Fully resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrackerConfig {
    pub database: PathBuf,
    pub history_page_size: usize,
    pub show_low_stock_alerts: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl TrackerConfig {
    /// Defaults for a workspace rooted at `data_dir`.
    #[must_use]
    pub fn defaults_for(data_dir: &Path) -> Self {
        Self {
            database: data_dir.join(DEFAULT_DB_FILE),
            history_page_size: DEFAULT_PAGE_SIZE,
            show_low_stock_alerts: true,
            backup_dir: None,
            log_dir: None,
        }
    }

    /// Where `backup` writes when no destination is given.
    #[must_use]
    pub fn backup_dir_or_default(&self) -> PathBuf {
        self.backup_dir.clone().unwrap_or_else(|| {
            self.database
                .parent()
                .map_or_else(|| PathBuf::from("backups"), |p| p.join("backups"))
        })
    }

    /// String form of one key, `None` when the key is unset.
    ///
    /// # Errors
    ///
    /// Returns `Config` for an unknown key.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let value = match key {
            "database" => Some(self.database.display().to_string()),
            "history_page_size" => Some(self.history_page_size.to_string()),
            "show_low_stock_alerts" => Some(self.show_low_stock_alerts.to_string()),
            "backup_dir" => self.backup_dir.as_ref().map(|p| p.display().to_string()),
            "log_dir" => self.log_dir.as_ref().map(|p| p.display().to_string()),
            other => return Err(unknown_key(other)),
        };
        Ok(value)
    }
}

/// One layer of partially specified configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history_page_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub show_low_stock_alerts: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

impl ConfigLayer {
    /// Load a YAML layer. A missing or comment-only file is an empty layer.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read or `Yaml` if it does not parse.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// # Errors
    ///
    /// Returns `Yaml` if `content` does not parse.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let blank = content.lines().all(|line| {
            let line = line.trim();
            line.is_empty() || line.starts_with('#')
        });
        if blank {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Layer built from environment variables read through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `Config` if `EQT_PAGE_SIZE` is not a positive integer.
    pub fn from_env(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let history_page_size = lookup(ENV_PAGE_SIZE)
            .map(|raw| parse_page_size(&raw))
            .transpose()?;

        Ok(Self {
            database: lookup(ENV_DB).map(PathBuf::from),
            history_page_size,
            show_low_stock_alerts: None,
            backup_dir: None,
            log_dir: lookup(ENV_LOG_DIR).map(PathBuf::from),
        })
    }

    fn from_cli(cli: &CliOverrides) -> Self {
        Self {
            database: cli.db.clone(),
            history_page_size: cli.page_size,
            ..Self::default()
        }
    }

    /// Make relative paths relative to `base`.
    #[must_use]
    fn resolved_against(mut self, base: &Path) -> Self {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.database = self.database.map(resolve);
        self.backup_dir = self.backup_dir.map(resolve);
        self.log_dir = self.log_dir.map(resolve);
        self
    }

    fn apply_to(self, config: &mut TrackerConfig) {
        if let Some(database) = self.database {
            config.database = database;
        }
        if let Some(size) = self.history_page_size {
            config.history_page_size = size;
        }
        if let Some(alerts) = self.show_low_stock_alerts {
            config.show_low_stock_alerts = alerts;
        }
        if self.backup_dir.is_some() {
            config.backup_dir = self.backup_dir;
        }
        if self.log_dir.is_some() {
            config.log_dir = self.log_dir;
        }
    }

    /// Set one key from its string form.
    ///
    /// # Errors
    ///
    /// Returns `Config` for an unknown key or a value of the wrong type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "database" => self.database = Some(PathBuf::from(value)),
            "history_page_size" => self.history_page_size = Some(parse_page_size(value)?),
            "show_low_stock_alerts" => {
                self.show_low_stock_alerts = Some(parse_bool(value)?);
            }
            "backup_dir" => self.backup_dir = Some(PathBuf::from(value)),
            "log_dir" => self.log_dir = Some(PathBuf::from(value)),
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

fn unknown_key(key: &str) -> TrackerError {
    TrackerError::Config(format!(
        "unknown key '{key}' (expected one of: {})",
        CONFIG_KEYS.join(", ")
    ))
}

fn parse_page_size(raw: &str) -> Result<usize> {
    match raw.trim().parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(TrackerError::Config(format!(
            "history_page_size must be a positive integer, got '{raw}'"
        ))),
    }
}

fn parse_bool(raw: &str) -> Result<bool> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(TrackerError::Config(format!(
            "expected true or false, got '{raw}'"
        ))),
    }
}

/// Find `.equipment/` in `start` (default: current directory) or an ancestor.
///
/// # Errors
///
/// Returns `NotInitialized` if no ancestor has one.
pub fn discover_data_dir(start: Option<&Path>) -> Result<PathBuf> {
    let start = match start {
        Some(path) => path.to_path_buf(),
        None => env::current_dir()?,
    };
    let start = dunce::canonicalize(&start).unwrap_or(start);

    for dir in start.ancestors() {
        let candidate = dir.join(DATA_DIR_NAME);
        if candidate.is_dir() {
            return Ok(candidate);
        }
    }
    Err(TrackerError::NotInitialized)
}

/// `$XDG_CONFIG_HOME/equipment-tracker/config.yaml`, falling back to
/// `~/.config/...`.
#[must_use]
pub fn user_config_path() -> Option<PathBuf> {
    let base = env::var_os("XDG_CONFIG_HOME")
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(|| env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))?;
    Some(base.join("equipment-tracker").join(CONFIG_FILE_NAME))
}

/// Path of the workspace config file.
#[must_use]
pub fn workspace_config_path(data_dir: &Path) -> PathBuf {
    data_dir.join(CONFIG_FILE_NAME)
}

/// Resolve configuration from every layer, using the process environment.
///
/// # Errors
///
/// Returns `Yaml`/`Io` for unreadable files or `Config` for bad values.
pub fn load_config(data_dir: Option<&Path>, cli: &CliOverrides) -> Result<TrackerConfig> {
    load_config_from(
        data_dir,
        user_config_path().as_deref(),
        |key| env::var(key).ok(),
        cli,
    )
}

/// [`load_config`] with the user config path and environment supplied.
///
/// # Errors
///
/// Returns `Yaml`/`Io` for unreadable files or `Config` for bad values.
pub fn load_config_from(
    data_dir: Option<&Path>,
    user_config: Option<&Path>,
    env_lookup: impl Fn(&str) -> Option<String>,
    cli: &CliOverrides,
) -> Result<TrackerConfig> {
    let base = data_dir.map_or_else(|| PathBuf::from("."), Path::to_path_buf);
    let mut config = TrackerConfig::defaults_for(&base);

    if let Some(path) = user_config {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        ConfigLayer::from_file(path)?
            .resolved_against(dir)
            .apply_to(&mut config);
    }

    if let Some(dir) = data_dir {
        ConfigLayer::from_file(&workspace_config_path(dir))?
            .resolved_against(dir)
            .apply_to(&mut config);
    }

    ConfigLayer::from_env(env_lookup)?.apply_to(&mut config);
    ConfigLayer::from_cli(cli).apply_to(&mut config);

    tracing::debug!(database = %config.database.display(), "Resolved configuration");
    Ok(config)
}

/// Write one key into the workspace config file.
///
/// # Errors
///
/// Returns `Config` for a bad key or value, or `Io`/`Yaml` on file errors.
pub fn set_workspace_value(data_dir: &Path, key: &str, value: &str) -> Result<()> {
    let path = workspace_config_path(data_dir);
    let mut layer = ConfigLayer::from_file(&path)?;
    layer.set(key, value)?;
    fs::write(&path, serde_yaml::to_string(&layer)?)?;
    Ok(())
}

/// Opened storage plus the configuration it was opened with.
#[derive(Debug)]
pub struct StorageContext {
    pub storage: SqliteStorage,
    pub config: TrackerConfig,
    pub data_dir: Option<PathBuf>,
}

/// Discover the workspace, resolve configuration and open the database.
///
/// An explicit `--db` works outside any workspace.
///
/// # Errors
///
/// Returns `NotInitialized` when there is no workspace and no `--db`, or any
/// error from loading config or opening storage.
pub fn open_storage_with_cli(cli: &CliOverrides) -> Result<StorageContext> {
    let data_dir = match discover_data_dir(None) {
        Ok(dir) => Some(dir),
        Err(TrackerError::NotInitialized) if cli.db.is_some() => None,
        Err(err) => return Err(err),
    };

    let config = load_config(data_dir.as_deref(), cli)?;
    let storage = SqliteStorage::open(&config.database)?;

    Ok(StorageContext {
        storage,
        config,
        data_dir,
    })
}
