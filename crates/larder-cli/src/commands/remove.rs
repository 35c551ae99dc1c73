//! Remove command implementation.

use super::confirm;
use crate::cli::RemoveArgs;
use crate::engine::Engine;
use crate::error::Result;
use crate::output::Formatter;
use larder_domain::ItemId;

/// Execute the remove command.
pub fn execute_remove(args: RemoveArgs, engine: &mut Engine, formatter: &Formatter) -> Result<()> {
    let ids: Vec<ItemId> = args.ids.iter().copied().map(ItemId::from_value).collect();

    // Confirm deletion unless --yes is specified
    if !args.yes {
        println!("About to delete {} item(s):", ids.len());
        for id in &ids {
            println!("  - {}", id);
        }
        if !confirm("Continue?")? {
            println!("{}", formatter.info("Operation cancelled"));
            return Ok(());
        }
    }

    let deleted = engine.remove_items(&ids)?;
    println!("{}", formatter.bulk_result("Deleted", deleted));
    if deleted < ids.len() {
        println!(
            "{}",
            formatter.warning(&format!("{} id(s) did not match any item", ids.len() - deleted))
        );
    }

    Ok(())
}
