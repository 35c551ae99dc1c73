//! Tick, schedule and unschedule command implementations.

use crate::engine::Engine;
use crate::error::Result;
use crate::output::Formatter;
use larder_janitor::{ExpiryScheduler, ExpirySettings};

/// Execute the tick command.
pub async fn execute_tick(engine: Engine, formatter: &Formatter) -> Result<()> {
    let scheduler = ExpiryScheduler::new(engine);
    let report = scheduler.fire_now().await?;
    println!("{}", formatter.format_tick(&report)?);
    Ok(())
}

/// Execute the schedule command.
///
/// Persists the trigger and returns; a running `larder daemon` follows it
/// the next time it wakes.
pub async fn execute_schedule(hour: u32, mut engine: Engine, formatter: &Formatter) -> Result<()> {
    set_notifications(&mut engine, true)?;

    let mut scheduler = ExpiryScheduler::new(engine);
    let next_fire = scheduler.schedule(hour).await?;
    scheduler.shutdown();

    println!(
        "{}",
        formatter.success(&format!(
            "Expiry check scheduled daily at {:02}:00 (next: {})",
            hour,
            next_fire.format("%Y-%m-%d %H:%M")
        ))
    );
    Ok(())
}

/// Execute the unschedule command.
pub async fn execute_unschedule(mut engine: Engine, formatter: &Formatter) -> Result<()> {
    set_notifications(&mut engine, false)?;

    let mut scheduler = ExpiryScheduler::new(engine);
    scheduler.cancel().await?;

    println!("{}", formatter.success("Expiry check unscheduled"));
    Ok(())
}

pub(crate) fn set_notifications(engine: &mut Engine, enabled: bool) -> Result<()> {
    let mut settings = ExpirySettings::load(engine.prefs())?;
    if settings.notifications_enabled != enabled {
        settings.notifications_enabled = enabled;
        settings.save(engine.prefs_mut())?;
    }
    Ok(())
}
