use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::clock::FixedClock;
use crate::error::StorageError;
use crate::models::{Currency, InvoiceStatus, NewInvoice};
use crate::reminders::notifier::{Notification, Notifier};
use crate::storage::{KeyValueStore, MemoryStore, INVOICES_KEY};
use crate::store::InvoiceStore;

/// Notifier that records everything and can be told to fail.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        let notifier = Self::default();
        notifier.fail.store(true, Ordering::SeqCst);
        notifier
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: &Notification) -> Result<(), anyhow::Error> {
        if self.fail.load(Ordering::SeqCst) {
            anyhow::bail!("notifications are not permitted");
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Memory store whose writes can be switched off.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    reject_writes: AtomicBool,
}

impl FlakyStore {
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn raw(&self) -> Option<String> {
        self.inner.get(INVOICES_KEY).unwrap()
    }
}

impl KeyValueStore for FlakyStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("quota exceeded".to_string()));
        }
        self.inner.set(key, value)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// 2024-01-10, the reference "today" of the store tests.
pub fn today() -> NaiveDate {
    date(2024, 1, 10)
}

pub struct Fixture {
    pub store: InvoiceStore,
    pub storage: Arc<FlakyStore>,
    pub notifier: Arc<RecordingNotifier>,
}

pub fn fixture_with(storage: Arc<FlakyStore>, notifier: Arc<RecordingNotifier>) -> Fixture {
    let store = InvoiceStore::open(
        storage.clone(),
        notifier.clone(),
        Arc::new(FixedClock::on(today())),
    )
    .expect("Should open store");
    Fixture {
        store,
        storage,
        notifier,
    }
}

pub fn fixture() -> Fixture {
    fixture_with(Arc::default(), Arc::default())
}

pub fn request(client: &str, amount: i64, status: InvoiceStatus, due: NaiveDate) -> NewInvoice {
    NewInvoice::with_defaults(client, Decimal::from(amount), Currency::Idr, date(2024, 1, 1))
        .status(status)
        .due_date(due)
}
