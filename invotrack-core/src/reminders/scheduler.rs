use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::reminders::dispatch::ReminderDispatcher;
use crate::reminders::notifier::Notifier;
use crate::store::SharedStore;

/// Default time between sweeps.
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

/// Periodic due-date sweep.
///
/// Sweeps once immediately on start, then on every interval tick and whenever
/// [`SchedulerHandle::check_now`] is called. Sweeps never modify invoices; a
/// sweep over unchanged data only repeats the same notifications.
pub struct ReminderScheduler {
    store: SharedStore,
    dispatcher: ReminderDispatcher,
    interval: Duration,
}

/// Handle to a running scheduler. Dropping it stops the loop as well.
pub struct SchedulerHandle {
    wake: Arc<Notify>,
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl ReminderScheduler {
    /// Creates a new scheduler.
    ///
    /// # Arguments
    ///
    /// * `store` - Shared invoice store
    /// * `notifier` - Sink for overdue/due-soon notifications
    /// * `interval` - Time between sweeps (default: one hour)
    pub fn new(store: SharedStore, notifier: Arc<dyn Notifier>, interval: Option<Duration>) -> Self {
        Self {
            store,
            dispatcher: ReminderDispatcher::new(notifier),
            interval: interval.unwrap_or(DEFAULT_SWEEP_INTERVAL),
        }
    }

    /// Starts the sweep loop on the current tokio runtime.
    pub fn spawn(self) -> SchedulerHandle {
        let wake = Arc::new(Notify::new());
        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(Arc::clone(&wake), shutdown_rx));

        SchedulerHandle {
            wake,
            shutdown,
            task,
        }
    }

    async fn run(self, wake: Arc<Notify>, mut shutdown: watch::Receiver<bool>) {
        info!(
            "ReminderScheduler started with sweep interval: {} seconds",
            self.interval.as_secs()
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    self.sweep_once().await;
                }
                _ = wake.notified() => {
                    debug!("Sweep requested");
                    self.sweep_once().await;
                }
                _ = shutdown.changed() => break,
            }
        }

        info!("ReminderScheduler stopped");
    }

    /// Runs a single sweep and dispatches its notifications.
    ///
    /// # Returns
    ///
    /// Returns the number of notifications delivered.
    pub async fn sweep_once(&self) -> usize {
        // Classification happens under the lock; notification does not.
        let sweep = {
            let store = self.store.lock().await;
            store.sweep_due_dates()
        };

        if sweep.is_empty() {
            debug!("No overdue or due-soon invoices");
            return 0;
        }

        info!(
            "Found {} overdue and {} due-soon invoice(s)",
            sweep.overdue.len(),
            sweep.due_soon.len()
        );
        self.dispatcher.dispatch(&sweep)
    }
}

impl SchedulerHandle {
    /// Requests an immediate sweep, e.g. when the application regains focus.
    pub fn check_now(&self) {
        self.wake.notify_one();
    }

    /// Stops the loop and waits for it to finish.
    pub async fn shutdown(self) -> Result<(), tokio::task::JoinError> {
        info!("Stopping ReminderScheduler...");
        let _ = self.shutdown.send(true);
        self.task.await
    }
}
