pub mod classify;
pub mod dispatch;
pub mod notifier;
pub mod scheduler;
pub mod urgency;

#[cfg(test)]
mod tests;

pub use classify::{classify_reminders, sweep_due_dates, ReminderEntry, Sweep};
pub use dispatch::ReminderDispatcher;
pub use notifier::{LogNotifier, NoopNotifier, Notification, Notifier};
pub use scheduler::{ReminderScheduler, SchedulerHandle, DEFAULT_SWEEP_INTERVAL};
pub use urgency::{days_until_due, DueCategory, Urgency};
