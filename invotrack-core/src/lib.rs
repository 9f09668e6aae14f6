//! Invoice tracking core: invoice lifecycle, numbering, statistics and
//! due-date reminders over a pluggable key-value store.

pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod numbering;
pub mod reminders;
pub mod stats;
pub mod storage;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::TrackerConfig;
pub use error::{Severity, StorageError, TrackerError, ValidationError};
pub use models::{Currency, Invoice, InvoiceId, InvoiceStatus, NewInvoice};
pub use stats::StatsSnapshot;
pub use store::{ClearOutcome, InvoiceStore, SharedStore};
