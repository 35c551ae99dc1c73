//! Add command implementation.

use super::parse_category;
use crate::cli::AddArgs;
use crate::engine::Engine;
use crate::error::Result;
use crate::output::Formatter;
use larder_domain::GroceryItem;

/// Execute the add command.
pub fn execute_add(args: AddArgs, engine: &mut Engine, formatter: &Formatter) -> Result<()> {
    let category = parse_category(&args.category)?;
    let item = GroceryItem::new(args.name, category, args.quantity, args.expiry.trim())
        .with_urgent(args.urgent);

    let item = engine.add_item(item)?;

    println!("{}", formatter.success(&format!("Added {} (id {})", item.name, item.id)));
    println!("{}", formatter.format_item(&item)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use crate::engine::open_engine;
    use larder_domain::traits::ItemStore;
    use larder_janitor::{JanitorConfig, JanitorError};
    use tempfile::TempDir;

    fn args(name: &str, category: &str, expiry: &str) -> AddArgs {
        AddArgs {
            name: name.to_string(),
            expiry: expiry.to_string(),
            category: category.to_string(),
            quantity: "1".to_string(),
            urgent: false,
        }
    }

    #[test]
    fn test_add_stores_canonical_category() {
        let dir = TempDir::new().unwrap();
        let mut engine =
            open_engine(&dir.path().join("l.db"), &JanitorConfig::default(), false).unwrap();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        execute_add(args("Peas", "frozen foods", "2099-01-01"), &mut engine, &formatter).unwrap();

        let items = engine.store().list_all().unwrap();
        assert_eq!(items[0].category, "Frozen Foods");
    }

    #[test]
    fn test_add_rejects_bad_input() {
        let dir = TempDir::new().unwrap();
        let mut engine =
            open_engine(&dir.path().join("l.db"), &JanitorConfig::default(), false).unwrap();
        let formatter = Formatter::new(OutputFormat::Quiet, false);

        let bad_category = execute_add(args("Peas", "Leftovers", "2099-01-01"), &mut engine, &formatter);
        assert!(bad_category.is_err());

        let bad_date = execute_add(args("Peas", "Other", "01/01/2099"), &mut engine, &formatter);
        assert!(matches!(
            bad_date,
            Err(crate::CliError::Janitor(JanitorError::InvalidItem(_)))
        ));
        assert!(engine.store().list_all().unwrap().is_empty());
    }
}
