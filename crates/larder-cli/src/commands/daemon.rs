//! Daemon command implementation.

use super::schedule::set_notifications;
use crate::engine::Engine;
use crate::error::Result;
use crate::output::Formatter;
use larder_janitor::{ExpiryScheduler, SchedulerStatus};

/// Execute the daemon command.
///
/// Keeps the daily job alive until Ctrl+C.
pub async fn execute_daemon(hour: Option<u32>, mut engine: Engine, formatter: &Formatter) -> Result<()> {
    if hour.is_some() {
        set_notifications(&mut engine, true)?;
    }

    let mut scheduler = ExpiryScheduler::new(engine);
    let mut updates = scheduler.subscribe();

    let status = match hour {
        Some(hour) => {
            scheduler.schedule(hour).await?;
            scheduler.status()
        }
        None => scheduler.resume().await?,
    };

    match status {
        SchedulerStatus::Scheduled { next_fire, .. } => println!(
            "{}",
            formatter.info(&format!(
                "Expiry maintenance running, next at {}. Press Ctrl+C to stop.",
                next_fire.format("%Y-%m-%d %H:%M")
            ))
        ),
        _ => {
            println!(
                "{}",
                formatter.warning("Notifications are off; enable them with `larder schedule --hour <H>`")
            );
            return Ok(());
        }
    }

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let status = *updates.borrow_and_update();
                tracing::debug!(?status, "Scheduler status changed");
            }
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Received shutdown signal");
                break;
            }
        }
    }

    scheduler.shutdown();
    let engine = scheduler.engine();
    let summary = engine.lock().await.janitor().metrics().summary();
    println!("{}", formatter.info(&summary));
    Ok(())
}
