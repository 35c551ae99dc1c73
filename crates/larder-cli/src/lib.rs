//! Larder CLI library.
//!
//! This library provides the core functionality for the `larder` command-line
//! interface: argument parsing, configuration, wiring of the expiry engine to
//! SQLite, command execution and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod engine;
pub mod error;
pub mod output;

pub use cli::{Cli, Command};
pub use config::Config;
pub use engine::{open_engine, Engine, TerminalSink};
pub use error::{CliError, Result};
pub use output::Formatter;
