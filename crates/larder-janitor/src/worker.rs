//! Background scheduler for the daily expiry job

use crate::lifecycle::{ExpiryLifecycle, TickReport};
use crate::schedule::{delay_until, is_drifted, next_fire_after};
use crate::settings::{ExpirySettings, SchedulerState};
use crate::{JanitorConfig, JanitorError};
use chrono::NaiveDateTime;
use larder_domain::traits::{Clock, ItemStore, NotificationSink, PreferenceStore};
use std::fmt::Display;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;

/// Identity of the one recurring job per process
pub const JOB_NAME: &str = "expiry_maintenance";

/// Where the scheduler is in its cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerStatus {
    /// No pending trigger
    Unscheduled,
    /// Waiting for the next firing
    Scheduled {
        /// Configured local hour
        fire_hour: u32,
        /// Pending trigger
        next_fire: NaiveDateTime,
    },
    /// A tick is running
    Firing {
        /// Configured local hour
        fire_hour: u32,
        /// Trigger that started this tick
        scheduled_for: NaiveDateTime,
    },
}

impl SchedulerStatus {
    /// The pending or in-flight trigger, if any
    pub fn next_fire(&self) -> Option<NaiveDateTime> {
        match self {
            SchedulerStatus::Unscheduled => None,
            SchedulerStatus::Scheduled { next_fire, .. } => Some(*next_fire),
            SchedulerStatus::Firing { scheduled_for, .. } => Some(*scheduled_for),
        }
    }
}

/// Runs [`ExpiryLifecycle::on_expiry_maintenance_tick`] once a day
///
/// At most one job exists at a time: scheduling again with the same hour is
/// a no-op, a different hour replaces the pending job.
///
/// The persisted [`SchedulerState`] is the source of truth. Before each
/// firing, and again before writing the next trigger, the job re-reads it:
/// a trigger moved by another process is followed rather than overwritten,
/// and a cleared trigger or disabled notifications end the job.
///
/// # Examples
///
/// ```no_run
/// use larder_domain::traits::{DeliveryOutcome, NotificationSink, SystemClock};
/// use larder_janitor::{ExpiryLifecycle, ExpiryScheduler, JanitorConfig};
/// use larder_store::{SqlitePreferences, SqliteStore};
///
/// struct Stdout;
///
/// impl NotificationSink for Stdout {
///     fn deliver(&self, title: &str, body: &str) -> DeliveryOutcome {
///         println!("{}: {}", title, body);
///         DeliveryOutcome::Delivered
///     }
/// }
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = SqliteStore::new("larder.db")?;
///     let prefs = SqlitePreferences::new("larder.db")?;
///     let engine = ExpiryLifecycle::new(store, prefs, Stdout, SystemClock, JanitorConfig::default());
///     let mut scheduler = ExpiryScheduler::new(engine);
///
///     // Pick up where the last process left off
///     scheduler.resume().await?;
///     tokio::signal::ctrl_c().await?;
///     scheduler.shutdown();
///     Ok(())
/// }
/// ```
pub struct ExpiryScheduler<S, P, N, C> {
    engine: Arc<Mutex<ExpiryLifecycle<S, P, N, C>>>,
    clock: C,
    config: JanitorConfig,
    status: Arc<watch::Sender<SchedulerStatus>>,
    job: Option<JoinHandle<()>>,
}

impl<S, P, N, C> ExpiryScheduler<S, P, N, C>
where
    S: ItemStore + Send + 'static,
    S::Error: Display,
    P: PreferenceStore + Send + 'static,
    P::Error: Display,
    N: NotificationSink + Send + 'static,
    C: Clock + Clone + Send + Sync + 'static,
{
    /// Wrap an engine; nothing is scheduled until [`Self::schedule`] or [`Self::resume`]
    pub fn new(engine: ExpiryLifecycle<S, P, N, C>) -> Self {
        let clock = engine.clock().clone();
        let config = engine.config().clone();
        let (status, _) = watch::channel(SchedulerStatus::Unscheduled);
        Self {
            engine: Arc::new(Mutex::new(engine)),
            clock,
            config,
            status: Arc::new(status),
            job: None,
        }
    }

    /// Shared handle for interactive use while the job runs
    pub fn engine(&self) -> Arc<Mutex<ExpiryLifecycle<S, P, N, C>>> {
        Arc::clone(&self.engine)
    }

    /// Current status
    pub fn status(&self) -> SchedulerStatus {
        *self.status.borrow()
    }

    /// Watch status transitions
    pub fn subscribe(&self) -> watch::Receiver<SchedulerStatus> {
        self.status.subscribe()
    }

    /// Schedule the daily firing at `hour:00` local time
    ///
    /// Returns the pending trigger.
    pub async fn schedule(&mut self, hour: u32) -> Result<NaiveDateTime, JanitorError> {
        let running = self.job.as_ref().is_some_and(|job| !job.is_finished());
        if running {
            match self.status() {
                SchedulerStatus::Scheduled {
                    fire_hour,
                    next_fire,
                }
                | SchedulerStatus::Firing {
                    fire_hour,
                    scheduled_for: next_fire,
                } if fire_hour == hour => {
                    tracing::debug!(job = JOB_NAME, "Already scheduled for {:02}:00", hour);
                    return Ok(next_fire);
                }
                _ => {}
            }
        }

        let next_fire = next_fire_after(self.clock.now(), hour).ok_or_else(|| {
            JanitorError::Config(format!("fire hour must be 0-23, got {}", hour))
        })?;

        if self.abort_job() {
            tracing::info!(job = JOB_NAME, "Replacing pending job with {:02}:00", hour);
        }

        {
            let mut engine = self.engine.lock().await;
            SchedulerState {
                fire_hour: hour,
                next_fire: Some(next_fire),
            }
            .save(engine.prefs_mut())?;
        }

        self.status.send_replace(SchedulerStatus::Scheduled {
            fire_hour: hour,
            next_fire,
        });
        let handle = tokio::spawn(run_job(
            Arc::clone(&self.engine),
            self.clock.clone(),
            self.config.clone(),
            Arc::clone(&self.status),
            hour,
            next_fire,
        ));
        self.job = Some(handle);

        tracing::info!(job = JOB_NAME, "Next expiry maintenance at {}", next_fire);
        Ok(next_fire)
    }

    /// Drop the pending trigger
    pub async fn cancel(&mut self) -> Result<(), JanitorError> {
        self.abort_job();
        {
            let mut engine = self.engine.lock().await;
            let state = SchedulerState::load(engine.prefs(), self.config.fire_hour)?;
            SchedulerState {
                next_fire: None,
                ..state
            }
            .save(engine.prefs_mut())?;
        }
        self.status.send_replace(SchedulerStatus::Unscheduled);
        tracing::info!(job = JOB_NAME, "Expiry maintenance unscheduled");
        Ok(())
    }

    /// Restore the schedule persisted by a previous process
    ///
    /// Stays unscheduled when notifications are off. A trigger that passed
    /// while the process was down gets one catch-up tick before the daily
    /// cadence resumes.
    pub async fn resume(&mut self) -> Result<SchedulerStatus, JanitorError> {
        let (settings, state) = {
            let engine = self.engine.lock().await;
            (
                ExpirySettings::load(engine.prefs())?,
                SchedulerState::load(engine.prefs(), self.config.fire_hour)?,
            )
        };

        if !settings.notifications_enabled {
            self.cancel().await?;
            return Ok(self.status());
        }

        if let Some(missed) = state.next_fire {
            if missed <= self.clock.now() {
                tracing::warn!(job = JOB_NAME, "Missed firing at {}, catching up", missed);
                if let Err(e) = self.fire_now().await {
                    tracing::error!(job = JOB_NAME, "Catch-up tick failed: {}", e);
                }
            }
        }

        self.schedule(state.fire_hour).await?;
        Ok(self.status())
    }

    /// Run one tick immediately, with the configured retries
    pub async fn fire_now(&self) -> Result<TickReport, JanitorError> {
        fire_with_retry(&self.engine, &self.config).await
    }

    /// Stop the job without touching persisted state
    pub fn shutdown(&mut self) {
        if self.abort_job() {
            tracing::info!(job = JOB_NAME, "Scheduler stopped");
        }
    }

    fn abort_job(&mut self) -> bool {
        match self.job.take() {
            Some(job) => {
                job.abort();
                true
            }
            None => false,
        }
    }
}

impl<S, P, N, C> Drop for ExpiryScheduler<S, P, N, C> {
    fn drop(&mut self) {
        if let Some(job) = self.job.take() {
            job.abort();
        }
    }
}

async fn fire_with_retry<S, P, N, C>(
    engine: &Mutex<ExpiryLifecycle<S, P, N, C>>,
    config: &JanitorConfig,
) -> Result<TickReport, JanitorError>
where
    S: ItemStore,
    S::Error: Display,
    P: PreferenceStore,
    P::Error: Display,
    N: NotificationSink,
    C: Clock,
{
    let mut attempt = 0;
    loop {
        let result = {
            let mut engine = engine.lock().await;
            engine.on_expiry_maintenance_tick()
        };
        match result {
            Err(e) if e.is_transient() && attempt < config.max_retries => {
                attempt += 1;
                tracing::warn!(
                    job = JOB_NAME,
                    "Tick failed (retry {}/{} in {:?}): {}",
                    attempt,
                    config.max_retries,
                    config.retry_backoff(),
                    e
                );
                tokio::time::sleep(config.retry_backoff()).await;
            }
            other => return other,
        }
    }
}

/// How the persisted trigger relates to the one a job is running for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Ownership {
    /// Persisted state still names this job's trigger
    Owned,
    /// Another writer moved the trigger
    Moved {
        fire_hour: u32,
        next_fire: NaiveDateTime,
    },
    /// Notifications are off or the trigger was cleared
    Released,
}

/// Compare persisted state against the trigger `(fire_hour, next_fire)`
///
/// Clears a leftover trigger when notifications were turned off.
fn check_ownership<P>(
    prefs: &mut P,
    default_hour: u32,
    fire_hour: u32,
    next_fire: NaiveDateTime,
) -> Result<Ownership, JanitorError>
where
    P: PreferenceStore,
    P::Error: Display,
{
    let settings = ExpirySettings::load(prefs)?;
    let state = SchedulerState::load(prefs, default_hour)?;

    if !settings.notifications_enabled {
        if state.next_fire.is_some() {
            SchedulerState {
                next_fire: None,
                ..state
            }
            .save(prefs)?;
        }
        return Ok(Ownership::Released);
    }

    Ok(match state.next_fire {
        None => Ownership::Released,
        Some(persisted) if state.fire_hour == fire_hour && persisted == next_fire => {
            Ownership::Owned
        }
        Some(persisted) => Ownership::Moved {
            fire_hour: state.fire_hour,
            next_fire: persisted,
        },
    })
}

async fn ownership<S, P, N, C>(
    engine: &Mutex<ExpiryLifecycle<S, P, N, C>>,
    default_hour: u32,
    fire_hour: u32,
    next_fire: NaiveDateTime,
) -> Ownership
where
    P: PreferenceStore,
    P::Error: Display,
{
    let mut engine = engine.lock().await;
    check_ownership(engine.prefs_mut(), default_hour, fire_hour, next_fire).unwrap_or_else(|e| {
        tracing::warn!(job = JOB_NAME, "Could not read scheduler state: {}", e);
        Ownership::Owned
    })
}

async fn run_job<S, P, N, C>(
    engine: Arc<Mutex<ExpiryLifecycle<S, P, N, C>>>,
    clock: C,
    config: JanitorConfig,
    status: Arc<watch::Sender<SchedulerStatus>>,
    mut fire_hour: u32,
    mut next_fire: NaiveDateTime,
) where
    S: ItemStore,
    S::Error: Display,
    P: PreferenceStore,
    P::Error: Display,
    N: NotificationSink,
    C: Clock,
{
    loop {
        // wall clock may jump while we sleep, so re-check against it
        loop {
            let now = clock.now();
            if now >= next_fire {
                break;
            }
            tokio::time::sleep(delay_until(now, next_fire)).await;
        }

        match ownership(&engine, config.fire_hour, fire_hour, next_fire).await {
            Ownership::Owned => {}
            Ownership::Moved {
                fire_hour: hour,
                next_fire: trigger,
            } => {
                tracing::info!(
                    job = JOB_NAME,
                    "Trigger moved to {} ({:02}:00) by another writer",
                    trigger,
                    hour
                );
                fire_hour = hour;
                next_fire = trigger;
                status.send_replace(SchedulerStatus::Scheduled {
                    fire_hour,
                    next_fire,
                });
                continue;
            }
            Ownership::Released => {
                release(&status);
                return;
            }
        }

        let fired_at = clock.now();
        if is_drifted(next_fire, fired_at, config.flex_window()) {
            tracing::warn!(
                job = JOB_NAME,
                "Firing drifted: scheduled {}, running at {}",
                next_fire,
                fired_at
            );
        }

        status.send_replace(SchedulerStatus::Firing {
            fire_hour,
            scheduled_for: next_fire,
        });

        match fire_with_retry(&engine, &config).await {
            Ok(report) => tracing::debug!(
                job = JOB_NAME,
                "Tick for {} done: {} deleted",
                report.today,
                report.maintenance.deleted_count
            ),
            Err(e) => tracing::error!(
                job = JOB_NAME,
                "Expiry maintenance failed, trying again at the next firing: {}",
                e
            ),
        }

        let fired_for = next_fire;
        let after = std::cmp::max(clock.now(), fired_for);
        next_fire = match next_fire_after(after, fire_hour) {
            Some(next) => next,
            None => {
                tracing::error!(job = JOB_NAME, "Invalid fire hour {}", fire_hour);
                status.send_replace(SchedulerStatus::Unscheduled);
                return;
            }
        };

        {
            let mut engine = engine.lock().await;
            let persisted =
                check_ownership(engine.prefs_mut(), config.fire_hour, fire_hour, fired_for)
                    .unwrap_or_else(|e| {
                        tracing::warn!(job = JOB_NAME, "Could not read scheduler state: {}", e);
                        Ownership::Owned
                    });
            match persisted {
                Ownership::Owned => {
                    let state = SchedulerState {
                        fire_hour,
                        next_fire: Some(next_fire),
                    };
                    if let Err(e) = state.save(engine.prefs_mut()) {
                        tracing::warn!(job = JOB_NAME, "Could not persist next firing: {}", e);
                    }
                }
                Ownership::Moved {
                    fire_hour: hour,
                    next_fire: trigger,
                } => {
                    tracing::info!(
                        job = JOB_NAME,
                        "Trigger moved to {} ({:02}:00) during the tick",
                        trigger,
                        hour
                    );
                    fire_hour = hour;
                    next_fire = trigger;
                }
                Ownership::Released => {
                    release(&status);
                    return;
                }
            }
        }

        status.send_replace(SchedulerStatus::Scheduled {
            fire_hour,
            next_fire,
        });
        tracing::info!(job = JOB_NAME, "Next expiry maintenance at {}", next_fire);
    }
}

fn release(status: &watch::Sender<SchedulerStatus>) {
    status.send_replace(SchedulerStatus::Unscheduled);
    tracing::info!(job = JOB_NAME, "Trigger cleared elsewhere, job stopped");
}
