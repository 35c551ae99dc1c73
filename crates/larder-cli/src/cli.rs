//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use larder_domain::SortMode;
use std::path::PathBuf;

/// Larder - Track groceries and their expiry dates.
#[derive(Debug, Parser)]
#[command(name = "larder")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Database file (overrides the configured one)
    #[arg(long, global = true, env = "LARDER_DB")]
    pub database: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (IDs only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Add a grocery item
    Add(AddArgs),

    /// List items with fresh expiry state
    List(ListArgs),

    /// Edit an item
    Edit(EditArgs),

    /// Star or unstar an item
    ToggleUrgent {
        /// Item ID
        id: i64,
    },

    /// Remove items
    Remove(RemoveArgs),

    /// Search items by name or category
    Search(SearchArgs),

    /// List the category vocabulary
    Categories,

    /// Inventory statistics
    Stats,

    /// Show or change expiry settings
    Settings(SettingsArgs),

    /// Reset the cumulative expired counter
    ResetCounter {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Run one maintenance tick now
    Tick,

    /// Schedule the daily tick
    Schedule {
        /// Local hour (0-23)
        #[arg(long)]
        hour: u32,
    },

    /// Turn off the daily tick and its notification
    Unschedule,

    /// Run the daily scheduler until Ctrl+C
    Daemon {
        /// Local hour (0-23), replacing the persisted one
        #[arg(long)]
        hour: Option<u32>,
    },
}

/// Arguments for the add command.
#[derive(Debug, Parser)]
pub struct AddArgs {
    /// Item name
    pub name: String,

    /// Expiry date (YYYY-MM-DD)
    pub expiry: String,

    /// Category
    #[arg(short, long, default_value = "Other")]
    pub category: String,

    /// Quantity
    #[arg(short, long, default_value = "1")]
    pub quantity: String,

    /// Mark as urgent regardless of expiry
    #[arg(short, long)]
    pub urgent: bool,
}

/// Arguments for the list command.
#[derive(Debug, Parser)]
pub struct ListArgs {
    /// Sort order
    #[arg(short, long, value_enum, default_value = "expiry-earliest")]
    pub sort: SortArg,

    /// Only this category
    #[arg(short, long)]
    pub category: Option<String>,

    /// Hide expired items
    #[arg(short, long)]
    pub active: bool,
}

/// Arguments for the edit command.
#[derive(Debug, Parser)]
pub struct EditArgs {
    /// Item ID
    pub id: i64,

    /// New name
    #[arg(short, long)]
    pub name: Option<String>,

    /// New category
    #[arg(short, long)]
    pub category: Option<String>,

    /// New quantity
    #[arg(short, long)]
    pub quantity: Option<String>,

    /// New expiry date (YYYY-MM-DD)
    #[arg(short, long)]
    pub expiry: Option<String>,

    /// Set the urgent flag explicitly
    #[arg(short, long)]
    pub urgent: Option<bool>,
}

/// Arguments for the remove command.
#[derive(Debug, Parser)]
pub struct RemoveArgs {
    /// Item IDs to delete
    #[arg(required = true)]
    pub ids: Vec<i64>,

    /// Skip confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the search command.
#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// Text to look for in names and categories
    pub query: String,

    /// Sort order
    #[arg(short, long, value_enum, default_value = "name-a-z")]
    pub sort: SortArg,
}

/// Arguments for settings management.
#[derive(Debug, Parser)]
pub struct SettingsArgs {
    #[command(subcommand)]
    pub action: SettingsAction,
}

/// Settings actions.
#[derive(Debug, Subcommand)]
pub enum SettingsAction {
    /// Show current settings and scheduler state
    Show,

    /// Change settings
    Set {
        /// Daily notification on/off
        #[arg(long)]
        notifications: Option<bool>,

        /// Delete expired items during maintenance
        #[arg(long)]
        auto_delete: Option<bool>,

        /// Warning window in days (1-7)
        #[arg(long)]
        warning_days: Option<i64>,
    },
}

/// Sort order argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum SortArg {
    /// Soonest expiry first
    ExpiryEarliest,
    /// Latest expiry first
    ExpiryLatest,
    /// Name A-Z
    #[value(name = "name-a-z")]
    NameAToZ,
    /// Name Z-A
    #[value(name = "name-z-a")]
    NameZToA,
    /// Category A-Z
    #[value(name = "category-a-z")]
    CategoryAToZ,
    /// Category Z-A
    #[value(name = "category-z-a")]
    CategoryZToA,
    /// Urgent items first, then soonest expiry
    UrgentFirst,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}

impl From<SortArg> for SortMode {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::ExpiryEarliest => SortMode::ExpiryEarliest,
            SortArg::ExpiryLatest => SortMode::ExpiryLatest,
            SortArg::NameAToZ => SortMode::NameAToZ,
            SortArg::NameZToA => SortMode::NameZToA,
            SortArg::CategoryAToZ => SortMode::CategoryAToZ,
            SortArg::CategoryZToA => SortMode::CategoryZToA,
            SortArg::UrgentFirst => SortMode::UrgentFirst,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_category_with_global_config() {
        let cli = Cli::parse_from([
            "larder",
            "--config",
            "/tmp/larder.toml",
            "list",
            "-c",
            "Dairy",
        ]);
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/larder.toml")));
        match cli.command {
            Command::List(args) => assert_eq!(args.category.as_deref(), Some("Dairy")),
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_add_command() {
        let cli = Cli::parse_from([
            "larder", "add", "Milk", "2024-06-20", "--category", "Dairy", "-q", "1 l",
        ]);
        match cli.command {
            Command::Add(args) => {
                assert_eq!(args.name, "Milk");
                assert_eq!(args.category, "Dairy");
                assert_eq!(args.quantity, "1 l");
                assert!(!args.urgent);
            }
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_list_defaults() {
        let cli = Cli::parse_from(["larder", "list"]);
        match cli.command {
            Command::List(args) => {
                assert_eq!(args.sort, SortArg::ExpiryEarliest);
                assert!(!args.active);
                assert!(args.category.is_none());
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_sort_names_match_domain() {
        let cli = Cli::parse_from(["larder", "list", "--sort", "name-z-a", "--active"]);
        match cli.command {
            Command::List(args) => {
                let mode: SortMode = args.sort.into();
                assert_eq!(mode, SortMode::NameZToA);
                assert_eq!(mode.as_str(), "name-z-a");
            }
            _ => panic!("Expected List command"),
        }
    }

    #[test]
    fn test_remove_requires_ids() {
        assert!(Cli::try_parse_from(["larder", "remove"]).is_err());
        let cli = Cli::parse_from(["larder", "remove", "3", "7", "-y"]);
        assert!(matches!(cli.command, Command::Remove(RemoveArgs { yes: true, .. })));
    }

    #[test]
    fn test_settings_set() {
        let cli = Cli::parse_from([
            "larder",
            "settings",
            "set",
            "--auto-delete",
            "true",
            "--warning-days",
            "5",
        ]);
        match cli.command {
            Command::Settings(SettingsArgs {
                action:
                    SettingsAction::Set {
                        notifications,
                        auto_delete,
                        warning_days,
                    },
            }) => {
                assert_eq!(notifications, None);
                assert_eq!(auto_delete, Some(true));
                assert_eq!(warning_days, Some(5));
            }
            _ => panic!("Expected Settings set"),
        }
    }

    #[test]
    fn test_schedule_hour() {
        let cli = Cli::parse_from(["larder", "schedule", "--hour", "9"]);
        assert!(matches!(cli.command, Command::Schedule { hour: 9 }));
    }
}
