use tracing::info;

/// A system notification request.
///
/// `dedupe_key` identifies notifications that replace one another; displaying
/// the same key twice should update rather than stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub category: String,
    pub dedupe_key: String,
}

/// Best-effort notification sink.
///
/// Errors returned here are logged by callers and never affect invoice state.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: &Notification) -> Result<(), anyhow::Error>;
}

/// Notifier that writes notifications to the log.
///
/// Used by the worker when no desktop integration is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), anyhow::Error> {
        info!(
            category = %notification.category,
            key = %notification.dedupe_key,
            "Notification: {}",
            notification.title
        );
        info!("Body: {}", notification.body.replace('\n', " | "));
        Ok(())
    }
}

/// Notifier that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn notify(&self, _notification: &Notification) -> Result<(), anyhow::Error> {
        Ok(())
    }
}
