//! Edit and toggle-urgent command implementations.

use super::parse_category;
use crate::cli::EditArgs;
use crate::engine::Engine;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use larder_domain::{ItemEdit, ItemId};

/// Execute the edit command.
pub fn execute_edit(args: EditArgs, engine: &mut Engine, formatter: &Formatter) -> Result<()> {
    let edit = build_edit(&args)?;
    if edit.is_empty() {
        return Err(CliError::InvalidInput("Nothing to change".to_string()));
    }

    let item = engine.edit_item(ItemId::from_value(args.id), &edit)?;
    println!("{}", formatter.success(&format!("Updated {}", item.name)));
    println!("{}", formatter.format_item(&item)?);
    Ok(())
}

/// Execute the toggle-urgent command.
pub fn execute_toggle_urgent(id: i64, engine: &mut Engine, formatter: &Formatter) -> Result<()> {
    let item = engine.toggle_urgent(ItemId::from_value(id))?;
    let state = if item.urgent { "starred" } else { "unstarred" };
    println!("{}", formatter.success(&format!("{} {}", item.name, state)));
    Ok(())
}

fn build_edit(args: &EditArgs) -> Result<ItemEdit> {
    let category = args
        .category
        .as_deref()
        .map(parse_category)
        .transpose()?
        .map(str::to_string);

    Ok(ItemEdit {
        name: args.name.clone(),
        category,
        quantity: args.quantity.clone(),
        expiry: args.expiry.as_ref().map(|e| e.trim().to_string()),
        urgent: args.urgent,
    })
}
