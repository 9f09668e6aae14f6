//! Invoice collection, lifecycle rules and queries.

use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, error, info, warn};

use crate::clock::Clock;
use crate::error::{TrackerError, ValidationError};
use crate::models::{Invoice, InvoiceId, InvoiceStatus, NewInvoice, Reminder, ReminderKind};
use crate::numbering::InvoiceNumberSequence;
use crate::reminders::classify::{self, ReminderEntry, Sweep};
use crate::reminders::dispatch::reminder_notification;
use crate::reminders::notifier::Notifier;
use crate::stats::{self, StatsSnapshot};
use crate::storage::{KeyValueStore, INVOICES_KEY};


/// Store shared between the scheduler and callers. The mutex serializes every
/// mutation, including invoice number allocation.
pub type SharedStore = Arc<tokio::sync::Mutex<InvoiceStore>>;

/// Outcome of [`InvoiceStore::clear_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The collection held this many invoices and is now empty.
    Cleared(usize),
    /// There was nothing to clear; storage was not touched.
    AlreadyEmpty,
}

/// Owns the invoice collection (newest first) and the number sequence.
///
/// Every mutation is write-then-commit: the next collection is built and
/// persisted first, and in-memory state only changes once the write has
/// succeeded. A failed write leaves the store exactly as it was.
pub struct InvoiceStore {
    storage: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    invoices: Vec<Invoice>,
    sequence: InvoiceNumberSequence,
}

impl InvoiceStore {
    /// Loads the persisted collection and seeds the number sequence.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read or holds content
    /// that is not a valid invoice array. A missing entry is an empty store.
    pub fn open(
        storage: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, TrackerError> {
        let invoices = load_invoices(storage.as_ref())?;
        let sequence =
            InvoiceNumberSequence::seeded_from(invoices.iter().map(|invoice| invoice.number.as_str()));

        info!(
            "Loaded {} invoice(s), last invoice number {}",
            invoices.len(),
            sequence.last()
        );

        Ok(Self {
            storage,
            notifier,
            clock,
            invoices,
            sequence,
        })
    }

    pub fn into_shared(self) -> SharedStore {
        Arc::new(tokio::sync::Mutex::new(self))
    }

    /// All invoices, newest first.
    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn get(&self, id: &InvoiceId) -> Option<&Invoice> {
        self.invoices.iter().find(|invoice| &invoice.id == id)
    }

    /// Most recently created invoice.
    pub fn latest(&self) -> Option<&Invoice> {
        self.invoices.first()
    }

    pub fn filter_by_status(&self, status: InvoiceStatus) -> Vec<&Invoice> {
        self.invoices
            .iter()
            .filter(|invoice| invoice.status == status)
            .collect()
    }

    pub fn len(&self) -> usize {
        self.invoices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.invoices.is_empty()
    }

    /// Last allocated invoice counter value.
    pub fn last_number(&self) -> u64 {
        self.sequence.last()
    }

    /// Creates an invoice and inserts it at the front of the collection.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Validation`] for an incomplete request,
    /// [`TrackerError::NumbersExhausted`] once the counter is at its maximum and
    /// [`TrackerError::Persistence`] if the collection could not be saved. In
    /// every case no number is consumed.
    pub fn add_invoice(&mut self, request: NewInvoice) -> Result<Invoice, TrackerError> {
        let (client, status, date, due_date) = validate(&request)?;
        let now = self.clock.now();

        let mut sequence = self.sequence;
        let number = sequence.advance().ok_or(TrackerError::NumbersExhausted {
            last: sequence.last(),
        })?;

        let invoice = Invoice {
            id: self.generate_id(),
            number,
            client,
            amount: request.amount,
            currency: request.currency,
            status,
            date,
            due_date,
            notes: request.notes.unwrap_or_default(),
            is_paid: status == InvoiceStatus::Completed,
            created_at: now,
            reminders: Vec::new(),
            last_reminder_date: None,
            reminder_sent: false,
        };

        let mut next = Vec::with_capacity(self.invoices.len() + 1);
        next.push(invoice.clone());
        next.extend(self.invoices.iter().cloned());

        self.commit(next)?;
        self.sequence = sequence;

        info!(
            "Added invoice {} for {} ({} {})",
            invoice.number, invoice.client, invoice.amount, invoice.currency
        );
        Ok(invoice)
    }

    /// Removes an invoice. Unknown ids are a no-op returning `None`.
    pub fn delete_invoice(&mut self, id: &InvoiceId) -> Result<Option<Invoice>, TrackerError> {
        let Some(pos) = self.position(id) else {
            debug!("Delete ignored, no invoice with id {}", id);
            return Ok(None);
        };

        let mut next = self.invoices.clone();
        let removed = next.remove(pos);
        self.commit(next)?;

        info!("Deleted invoice {}", removed.number);
        Ok(Some(removed))
    }

    /// Removes every invoice. The number sequence is not reset.
    pub fn clear_all(&mut self) -> Result<ClearOutcome, TrackerError> {
        if self.invoices.is_empty() {
            debug!("Clear ignored, no invoices stored");
            return Ok(ClearOutcome::AlreadyEmpty);
        }

        let count = self.invoices.len();
        self.commit(Vec::new())?;

        info!("Cleared {} invoice(s)", count);
        Ok(ClearOutcome::Cleared(count))
    }

    /// Sets the status only. `is_paid` is left as it was, even when moving to
    /// or away from `completed`.
    pub fn update_status(
        &mut self,
        id: &InvoiceId,
        status: InvoiceStatus,
    ) -> Result<Option<Invoice>, TrackerError> {
        let updated = self.modify(id, |invoice| invoice.status = status)?;
        if let Some(invoice) = &updated {
            info!("Invoice {} status set to {}", invoice.number, status);
        }
        Ok(updated)
    }

    /// Marks an invoice paid: `is_paid = true` and `status = completed`.
    pub fn mark_as_paid(&mut self, id: &InvoiceId) -> Result<Option<Invoice>, TrackerError> {
        let updated = self.modify(id, |invoice| {
            invoice.is_paid = true;
            invoice.status = InvoiceStatus::Completed;
        })?;
        if let Some(invoice) = &updated {
            info!("Invoice {} marked as paid", invoice.number);
        }
        Ok(updated)
    }

    /// Logs a manual reminder and notifies about it.
    ///
    /// The reminder entry is committed first; the notification is best-effort
    /// and its failure is only logged.
    pub fn send_reminder(&mut self, id: &InvoiceId) -> Result<Option<Invoice>, TrackerError> {
        let now = self.clock.now();
        let updated = self.modify(id, |invoice| {
            invoice.reminders.push(Reminder {
                date: now,
                kind: ReminderKind::Manual,
            });
            invoice.last_reminder_date = Some(now);
            invoice.reminder_sent = true;
        })?;

        if let Some(invoice) = &updated {
            info!(
                "Reminder #{} recorded for invoice {}",
                invoice.reminders.len(),
                invoice.number
            );
            if let Err(e) = self.notifier.notify(&reminder_notification(invoice)) {
                warn!("Reminder notification for {} failed: {}", invoice.number, e);
            }
        }
        Ok(updated)
    }

    pub fn compute_stats(&self) -> StatsSnapshot {
        stats::compute_stats(&self.invoices, self.today())
    }

    /// Unpaid invoices ordered by days until due (most overdue first).
    pub fn classify_reminders(&self) -> Vec<ReminderEntry> {
        classify::classify_reminders(&self.invoices, self.today())
    }

    /// Overdue and due-soon unpaid invoices. Does not modify anything.
    pub fn sweep_due_dates(&self) -> Sweep {
        classify::sweep_due_dates(&self.invoices, self.today())
    }

    fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    fn position(&self, id: &InvoiceId) -> Option<usize> {
        self.invoices.iter().position(|invoice| &invoice.id == id)
    }

    fn generate_id(&self) -> InvoiceId {
        loop {
            let id = InvoiceId::generate();
            if self.position(&id).is_none() {
                return id;
            }
        }
    }

    /// Applies `change` to a copy of the invoice, persists, then commits.
    fn modify<F>(&mut self, id: &InvoiceId, change: F) -> Result<Option<Invoice>, TrackerError>
    where
        F: FnOnce(&mut Invoice),
    {
        let Some(pos) = self.position(id) else {
            debug!("Update ignored, no invoice with id {}", id);
            return Ok(None);
        };

        let mut next = self.invoices.clone();
        change(&mut next[pos]);
        let updated = next[pos].clone();

        self.commit(next)?;
        Ok(Some(updated))
    }

    fn commit(&mut self, next: Vec<Invoice>) -> Result<(), TrackerError> {
        let payload = serde_json::to_string(&next).map_err(TrackerError::Serialize)?;
        if let Err(e) = self.storage.set(INVOICES_KEY, &payload) {
            error!("Failed to persist {} invoice(s): {}", next.len(), e);
            return Err(e.into());
        }
        self.invoices = next;
        Ok(())
    }
}

fn load_invoices(storage: &dyn KeyValueStore) -> Result<Vec<Invoice>, TrackerError> {
    match storage.get(INVOICES_KEY)? {
        Some(raw) if !raw.trim().is_empty() => {
            serde_json::from_str(&raw).map_err(|e| {
                error!("Stored invoice collection is malformed: {}", e);
                TrackerError::Corrupt(e)
            })
        }
        _ => Ok(Vec::new()),
    }
}

fn validate(
    request: &NewInvoice,
) -> Result<(String, InvoiceStatus, NaiveDate, NaiveDate), ValidationError> {
    let client = request.client.trim();
    if client.is_empty() {
        return Err(ValidationError::EmptyClient);
    }
    if request.amount <= Decimal::ZERO {
        return Err(ValidationError::NonPositiveAmount);
    }
    if !survives_storage(request.amount) {
        return Err(ValidationError::AmountNotRepresentable(request.amount));
    }
    let status = request.status.ok_or(ValidationError::MissingStatus)?;
    let date = request.date.ok_or(ValidationError::MissingDate)?;
    let due_date = request.due_date.ok_or(ValidationError::MissingDueDate)?;
    Ok((client.to_string(), status, date, due_date))
}

/// Whether `amount` reads back unchanged after a save. Amounts are persisted
/// as JSON floats, which cannot hold every decimal.
fn survives_storage(amount: Decimal) -> bool {
    serde_json::to_string(&amount)
        .ok()
        .and_then(|raw| serde_json::from_str::<Decimal>(&raw).ok())
        .is_some_and(|stored| stored == amount)
}
