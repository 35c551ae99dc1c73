//! List and categories command implementations.

use super::parse_category;
use crate::cli::ListArgs;
use crate::engine::Engine;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the list command.
pub fn execute_list(args: ListArgs, engine: &Engine, formatter: &Formatter) -> Result<()> {
    let mode = args.sort.into();
    let items = match &args.category {
        Some(category) => {
            let category = parse_category(category)?;
            let mut items = engine.list_category(category, mode)?;
            if args.active {
                items.retain(|item| !item.is_expired());
            }
            items
        }
        None => engine.list_items(mode, args.active)?,
    };

    println!("{}", formatter.format_items(&items)?);
    Ok(())
}

/// Execute the categories command.
pub fn execute_categories(formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.format_categories()?);
    Ok(())
}
