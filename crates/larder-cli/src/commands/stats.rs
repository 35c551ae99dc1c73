//! Stats and reset-counter command implementations.

use super::confirm;
use crate::engine::Engine;
use crate::error::Result;
use crate::output::Formatter;
use larder_janitor::ExpiredCounter;

/// Execute the stats command.
pub fn execute_stats(engine: &Engine, formatter: &Formatter) -> Result<()> {
    let report = engine.report()?;
    println!("{}", formatter.format_report(&report)?);
    Ok(())
}

/// Execute the reset-counter command.
pub fn execute_reset_counter(yes: bool, engine: &mut Engine, formatter: &Formatter) -> Result<()> {
    if !yes {
        let current = ExpiredCounter::get(engine.prefs())?;
        if !confirm(&format!("Reset the auto-deleted count ({})?", current))? {
            println!("{}", formatter.info("Operation cancelled"));
            return Ok(());
        }
    }

    engine.reset_counter()?;
    println!("{}", formatter.success("Auto-deleted count reset to 0"));
    Ok(())
}
