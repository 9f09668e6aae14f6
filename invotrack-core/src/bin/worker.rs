use std::sync::Arc;

use invotrack_core::reminders::{LogNotifier, ReminderScheduler};
use invotrack_core::storage::FileStore;
use invotrack_core::{InvoiceStore, SystemClock, TrackerConfig};
use tokio::signal;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Reminder worker entry point.
///
/// Opens the invoice collection from the data directory and sweeps it for
/// overdue and due-soon invoices on startup and then on every interval,
/// logging a notification per category. Stops on Ctrl+C.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = TrackerConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"))
        .add_directive(LevelFilter::INFO.into());

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(filter)
        .init();

    info!("Starting invoice reminder worker...");
    info!("Data directory: {}", config.data_dir.display());

    let storage = FileStore::open(config.data_dir.clone())?;
    let notifier = Arc::new(LogNotifier);
    let store = InvoiceStore::open(Arc::new(storage), notifier.clone(), Arc::new(SystemClock))
        .map_err(|e| anyhow::anyhow!("{} ({})", e.user_message(), e))?
        .into_shared();

    let handle = ReminderScheduler::new(store, notifier, Some(config.sweep_interval)).spawn();

    signal::ctrl_c().await?;
    info!("Received Ctrl+C, shutting down gracefully...");

    handle.shutdown().await?;

    info!("Invoice reminder worker stopped");
    Ok(())
}
