//! Settings command implementation.

use crate::cli::{SettingsAction, SettingsArgs};
use crate::engine::Engine;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use larder_janitor::{ExpiredCounter, ExpirySettings, SchedulerState};

/// Execute the settings command.
pub fn execute_settings(args: SettingsArgs, engine: &mut Engine, formatter: &Formatter) -> Result<()> {
    match args.action {
        SettingsAction::Show => show(engine, formatter),
        SettingsAction::Set {
            notifications,
            auto_delete,
            warning_days,
        } => {
            if notifications.is_none() && auto_delete.is_none() && warning_days.is_none() {
                return Err(CliError::InvalidInput("Nothing to change".to_string()));
            }

            let mut settings = ExpirySettings::load(engine.prefs())?;
            if let Some(enabled) = notifications {
                settings.notifications_enabled = enabled;
            }
            if let Some(enabled) = auto_delete {
                settings.auto_delete_enabled = enabled;
            }
            if let Some(days) = warning_days {
                settings.warning_days = days;
            }
            settings.save(engine.prefs_mut())?;

            // A disabled notification leaves no pending trigger behind
            if notifications == Some(false) {
                let fire_hour = engine.config().fire_hour;
                let state = SchedulerState::load(engine.prefs(), fire_hour)?;
                SchedulerState {
                    next_fire: None,
                    ..state
                }
                .save(engine.prefs_mut())?;
            }

            println!("{}", formatter.success("Settings updated"));
            show(engine, formatter)
        }
    }
}

fn show(engine: &Engine, formatter: &Formatter) -> Result<()> {
    let settings = ExpirySettings::load(engine.prefs())?;
    let schedule = SchedulerState::load(engine.prefs(), engine.config().fire_hour)?;
    let counter = ExpiredCounter::get(engine.prefs())?;

    println!("{}", formatter.format_settings(&settings, &schedule, counter)?);
    Ok(())
}
