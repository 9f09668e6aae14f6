use std::sync::Arc;

use tracing::{info, warn};

use crate::format::{format_amount, format_date};
use crate::models::Invoice;
use crate::reminders::classify::{totals_by_currency, Sweep};
use crate::reminders::notifier::{Notification, Notifier};
use crate::reminders::urgency::DueCategory;

/// Turns sweep results into category notifications.
///
/// At most one notification per category is emitted per sweep, keyed by the
/// category tag so repeated sweeps replace rather than stack. Notifier errors
/// are logged and swallowed.
#[derive(Clone)]
pub struct ReminderDispatcher {
    notifier: Arc<dyn Notifier>,
}

impl ReminderDispatcher {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// Sends notifications for a sweep.
    ///
    /// # Returns
    ///
    /// Returns the number of notifications the notifier accepted.
    pub fn dispatch(&self, sweep: &Sweep) -> usize {
        let mut delivered = 0;

        for category in [DueCategory::Overdue, DueCategory::DueSoon] {
            let invoices = sweep.invoices(category);
            if invoices.is_empty() {
                continue;
            }

            let notification = category_notification(category, invoices);
            match self.notifier.notify(&notification) {
                Ok(()) => {
                    delivered += 1;
                    info!("Sent {} notification for {} invoice(s)", category, invoices.len());
                }
                Err(e) => {
                    warn!("Failed to send {} notification: {}", category, e);
                }
            }
        }

        delivered
    }
}

/// Summary notification for all invoices of one sweep category.
pub fn category_notification(category: DueCategory, invoices: &[Invoice]) -> Notification {
    let count = invoices.len();
    let plural = if count == 1 { "" } else { "s" };
    let (title, summary) = match category {
        DueCategory::Overdue => (
            "Invoices Overdue!".to_string(),
            format!("{} invoice{} past the due date.", count, plural),
        ),
        DueCategory::DueSoon => (
            "Invoices Due Within 7 Days".to_string(),
            format!("{} invoice{} due this week.", count, plural),
        ),
    };

    let total = totals_by_currency(invoices)
        .into_iter()
        .map(|(currency, amount)| format_amount(amount, currency))
        .collect::<Vec<_>>()
        .join(" + ");

    Notification {
        title,
        body: format!("{}\nTotal: {}", summary, total),
        category: category.to_string(),
        dedupe_key: category.tag().to_string(),
    }
}

/// Notification for a manually sent reminder on a single invoice.
pub fn reminder_notification(invoice: &Invoice) -> Notification {
    Notification {
        title: format!("Invoice Reminder {}", invoice.number),
        body: format!(
            "{}\nAmount: {}\nDue: {}",
            invoice.client,
            format_amount(invoice.amount, invoice.currency),
            format_date(invoice.due_date)
        ),
        category: "reminder".to_string(),
        dedupe_key: format!("invoice-reminder-{}", invoice.id),
    }
}
