//! Command-line interface for `equipment_tracker`.
//!
//! This module provides the CLI parsing and command routing using clap.

pub mod commands;

use anyhow::Result;
use clap::{ArgGroup, Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{self, CliOverrides};
use crate::logging;

/// `eqt` - Equipment inventory tracker.
#[derive(Parser, Debug)]
#[command(name = "eqt")]
#[command(
    author,
    version,
    about = "Equipment inventory tracker (SQLite + append-only audit log)",
    long_about = None,
    after_help = "Every quantity change is recorded in the transaction log. Run 'eqt init' to start."
)]
pub struct Cli {
    /// Output format: text (default) or json
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Database file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH", env = config::ENV_DB)]
    pub db: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize an equipment workspace in the current directory
    Init(InitArgs),

    /// Add a new equipment item
    Add(AddArgs),

    /// Edit name, category or minimum stock level (quantity is unchanged)
    Update(UpdateArgs),

    /// Delete one or more equipment items
    #[command(alias = "rm")]
    Delete(DeleteArgs),

    /// Add or remove stock
    Adjust(AdjustArgs),

    /// List equipment
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show one item with its history
    Show(ShowArgs),

    /// Show the transaction log, newest first
    #[command(alias = "log")]
    History(HistoryArgs),

    /// Copy the database file
    Backup(BackupArgs),

    /// Export equipment to CSV
    Export(ExportArgs),

    /// Inventory totals (alias: status)
    #[command(alias = "status")]
    Stats,

    /// List categories in use
    Categories,

    /// Check database health and audit trail consistency
    Doctor,

    /// Read/write configuration
    Config(ConfigCommand),

    /// Show version information
    Version(VersionArgs),
}

#[derive(Args, Debug, Default)]
pub struct InitArgs {
    /// Re-run on an existing workspace (existing data is kept)
    #[arg(long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Equipment name
    pub name: String,

    /// Starting quantity
    #[arg(short = 'n', long, default_value_t = 0, allow_negative_numbers = true)]
    pub quantity: i64,

    /// Category label
    #[arg(short, long)]
    pub category: Option<String>,

    /// Low-stock threshold
    #[arg(short, long = "min-stock", default_value_t = 0, allow_negative_numbers = true)]
    pub min_stock: i64,
}

#[derive(Args, Debug)]
pub struct UpdateArgs {
    /// Equipment ID
    pub id: String,

    /// New name
    #[arg(long)]
    pub name: Option<String>,

    /// New category
    #[arg(short, long, conflicts_with = "no_category")]
    pub category: Option<String>,

    /// Clear the category
    #[arg(long)]
    pub no_category: bool,

    /// New low-stock threshold
    #[arg(short, long = "min-stock", allow_negative_numbers = true)]
    pub min_stock: Option<i64>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Equipment IDs
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("direction").required(true).args(["add", "remove"])))]
pub struct AdjustArgs {
    /// Equipment ID
    pub id: String,

    /// Units to add
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub add: Option<i64>,

    /// Units to remove (stops at zero)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    pub remove: Option<i64>,

    /// Note stored with the log entry
    #[arg(long, default_value = "")]
    pub notes: String,
}

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Case-insensitive text matched against name and category
    #[arg(short, long)]
    pub search: Option<String>,

    /// Only this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Only items at or below their minimum stock level
    #[arg(long)]
    pub low_stock: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Equipment ID
    pub id: String,
}

#[derive(Args, Debug)]
pub struct HistoryArgs {
    /// Only this equipment ID (deleted items included), oldest first
    pub id: Option<String>,

    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: usize,

    /// Rows per page (default from config)
    #[arg(long)]
    pub page_size: Option<usize>,
}

#[derive(Args, Debug)]
pub struct BackupArgs {
    /// Destination file (default: backup dir / equipment_backup_<stamp>.db)
    pub path: Option<PathBuf>,

    /// List existing backups instead of creating one
    #[arg(long, conflicts_with = "path")]
    pub list: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Destination file (default: equipment_export_<stamp>.csv)
    pub path: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct ConfigCommand {
    /// Config subcommand
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },

    /// Set a config value in the workspace config file
    Set {
        /// Config key
        key: String,
        /// New value
        value: String,
    },

    /// List config values
    List,
}

#[derive(Args, Debug, Default)]
pub struct VersionArgs {
    /// Print only the version number
    #[arg(long)]
    pub short: bool,
}

/// Best-effort lookup of `log_dir` before any command runs.
fn resolve_log_dir(cli: &CliOverrides) -> Option<PathBuf> {
    let data_dir = config::discover_data_dir(None).ok();
    config::load_config(data_dir.as_deref(), cli)
        .ok()
        .and_then(|c| c.log_dir)
}

/// Run the CLI.
///
/// # Errors
///
/// Returns an error if the command fails to execute.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let overrides = CliOverrides {
        db: cli.db.clone(),
        page_size: None,
    };

    let log_dir = resolve_log_dir(&overrides);
    logging::init_logging(cli.verbose, cli.quiet, log_dir.as_deref())
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    let json = cli.json;
    let Some(command) = cli.command else {
        println!("eqt - equipment inventory tracker. Use --help for usage.");
        return Ok(());
    };

    tracing::debug!(command = command.name(), "Dispatching");

    match command {
        Commands::Init(args) => commands::init::execute(&args, json, &overrides)?,
        Commands::Add(args) => commands::add::execute(&args, json, &overrides)?,
        Commands::Update(args) => commands::update::execute(&args, json, &overrides)?,
        Commands::Delete(args) => commands::delete::execute(&args, json, &overrides)?,
        Commands::Adjust(args) => commands::adjust::execute(&args, json, &overrides)?,
        Commands::List(args) => commands::list::execute(&args, json, &overrides)?,
        Commands::Show(args) => commands::show::execute(&args, json, &overrides)?,
        Commands::History(args) => commands::history::execute(&args, json, &overrides)?,
        Commands::Backup(args) => commands::backup::execute(&args, json, &overrides)?,
        Commands::Export(args) => commands::export::execute(&args, json, &overrides)?,
        Commands::Stats => commands::stats::execute(json, &overrides)?,
        Commands::Categories => commands::stats::execute_categories(json, &overrides)?,
        Commands::Doctor => {
            if !commands::doctor::execute(json, &overrides)? {
                anyhow::bail!("doctor found problems");
            }
        }
        Commands::Config(cmd) => commands::config::execute(&cmd.command, json, &overrides)?,
        Commands::Version(args) => commands::version::execute(&args, json)?,
    }

    Ok(())
}

impl Commands {
    const fn name(&self) -> &'static str {
        match self {
            Self::Init(_) => "init",
            Self::Add(_) => "add",
            Self::Update(_) => "update",
            Self::Delete(_) => "delete",
            Self::Adjust(_) => "adjust",
            Self::List(_) => "list",
            Self::Show(_) => "show",
            Self::History(_) => "history",
            Self::Backup(_) => "backup",
            Self::Export(_) => "export",
            Self::Stats => "stats",
            Self::Categories => "categories",
            Self::Doctor => "doctor",
            Self::Config(config) => match config.command {
                ConfigSubcommand::Get { .. } => "config get",
                ConfigSubcommand::Set { .. } => "config set",
                ConfigSubcommand::List => "config list",
            },
            Self::Version(_) => "version",
        }
    }
}
