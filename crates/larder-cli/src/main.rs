//! Larder CLI - grocery inventory with expiry tracking.

use clap::Parser;
use larder_cli::commands;
use larder_cli::config::OutputFormat;
use larder_cli::{open_engine, Cli, Command, Config, Engine, Formatter};
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        let formatter = Formatter::new(OutputFormat::Table, std::io::stderr().is_terminal());
        eprintln!("{}", formatter.error(&format!("Error: {}", e)));
        std::process::exit(1);
    }
}

async fn run() -> larder_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    // The database is only opened by commands that need it
    let database = cli.database;
    let open = || -> larder_cli::Result<Engine> {
        let path = match &database {
            Some(path) => path.clone(),
            None => config.database_path()?,
        };
        open_engine(&path, &config.janitor, color_enabled)
    };

    match cli.command {
        Command::Categories => commands::execute_categories(&formatter)?,
        Command::Add(args) => commands::execute_add(args, &mut open()?, &formatter)?,
        Command::List(args) => commands::execute_list(args, &open()?, &formatter)?,
        Command::Edit(args) => commands::execute_edit(args, &mut open()?, &formatter)?,
        Command::ToggleUrgent { id } => {
            commands::execute_toggle_urgent(id, &mut open()?, &formatter)?
        }
        Command::Remove(args) => commands::execute_remove(args, &mut open()?, &formatter)?,
        Command::Search(args) => commands::execute_search(args, &open()?, &formatter)?,
        Command::Stats => commands::execute_stats(&open()?, &formatter)?,
        Command::Settings(args) => commands::execute_settings(args, &mut open()?, &formatter)?,
        Command::ResetCounter { yes } => {
            commands::execute_reset_counter(yes, &mut open()?, &formatter)?
        }
        Command::Tick => commands::execute_tick(open()?, &formatter).await?,
        Command::Schedule { hour } => commands::execute_schedule(hour, open()?, &formatter).await?,
        Command::Unschedule => commands::execute_unschedule(open()?, &formatter).await?,
        Command::Daemon { hour } => commands::execute_daemon(hour, open()?, &formatter).await?,
    }

    Ok(())
}
