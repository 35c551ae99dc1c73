//! Search command implementation.

use crate::cli::SearchArgs;
use crate::engine::Engine;
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// Execute the search command.
pub fn execute_search(args: SearchArgs, engine: &Engine, formatter: &Formatter) -> Result<()> {
    let query = args.query.trim();
    if query.is_empty() {
        return Err(CliError::InvalidInput("Search query is empty".to_string()));
    }

    let items = engine.search(query, args.sort.into())?;
    println!("{}", formatter.format_items(&items)?);
    Ok(())
}
