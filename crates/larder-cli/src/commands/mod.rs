//! Command implementations.

pub mod add;
pub mod daemon;
pub mod edit;
pub mod list;
pub mod remove;
pub mod schedule;
pub mod search;
pub mod settings;
pub mod stats;

pub use self::add::execute_add;
pub use self::daemon::execute_daemon;
pub use self::edit::{execute_edit, execute_toggle_urgent};
pub use self::list::{execute_categories, execute_list};
pub use self::remove::execute_remove;
pub use self::schedule::{execute_schedule, execute_tick, execute_unschedule};
pub use self::search::execute_search;
pub use self::settings::execute_settings;
pub use self::stats::{execute_reset_counter, execute_stats};

use crate::error::{CliError, Result};
use larder_domain::Category;
use std::io::{self, Write};

/// Canonical spelling of a category from the vocabulary.
pub(crate) fn parse_category(input: &str) -> Result<&'static str> {
    Category::parse(input).map(|c| c.as_str()).ok_or_else(|| {
        let known: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        CliError::InvalidInput(format!(
            "Unknown category '{}'. Expected one of: {}",
            input,
            known.join(", ")
        ))
    })
}

/// Ask a yes/no question on stdin.
pub(crate) fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;

    let mut response = String::new();
    io::stdin().read_line(&mut response)?;
    Ok(response.trim().eq_ignore_ascii_case("y"))
}
