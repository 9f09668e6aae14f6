use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Currency, Invoice};
use crate::reminders::urgency::{days_until_due, payment_status_text, DueCategory, Urgency};

/// An unpaid invoice on the reminder board together with its due distance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReminderEntry {
    pub invoice: Invoice,
    pub days_until_due: i64,
}

impl ReminderEntry {
    pub fn urgency(&self) -> Urgency {
        Urgency::from_days(self.days_until_due)
    }

    pub fn status_text(&self) -> String {
        payment_status_text(self.days_until_due)
    }
}

/// Result of one due-date sweep.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sweep {
    pub overdue: Vec<Invoice>,
    pub due_soon: Vec<Invoice>,
}

impl Sweep {
    pub fn is_empty(&self) -> bool {
        self.overdue.is_empty() && self.due_soon.is_empty()
    }

    pub fn invoices(&self, category: DueCategory) -> &[Invoice] {
        match category {
            DueCategory::Overdue => &self.overdue,
            DueCategory::DueSoon => &self.due_soon,
        }
    }
}

/// Sums amounts per currency, in first-seen order.
pub fn totals_by_currency(invoices: &[Invoice]) -> Vec<(Currency, Decimal)> {
    let mut totals: Vec<(Currency, Decimal)> = Vec::new();
    for invoice in invoices {
        match totals.iter_mut().find(|(c, _)| *c == invoice.currency) {
            Some((_, sum)) => *sum = sum.saturating_add(invoice.amount),
            None => totals.push((invoice.currency, invoice.amount)),
        }
    }
    totals
}

/// Unpaid invoices ordered by days until due, most overdue first.
///
/// The sort is stable, so invoices due on the same day keep collection order.
pub fn classify_reminders(invoices: &[Invoice], today: NaiveDate) -> Vec<ReminderEntry> {
    let mut entries: Vec<ReminderEntry> = invoices
        .iter()
        .filter(|invoice| invoice.is_unpaid())
        .map(|invoice| ReminderEntry {
            invoice: invoice.clone(),
            days_until_due: days_until_due(invoice.due_date, today),
        })
        .collect();
    entries.sort_by_key(|entry| entry.days_until_due);
    entries
}

/// Splits unpaid invoices into overdue and due-soon sets. Pure query.
pub fn sweep_due_dates(invoices: &[Invoice], today: NaiveDate) -> Sweep {
    let mut sweep = Sweep::default();
    for invoice in invoices.iter().filter(|invoice| invoice.is_unpaid()) {
        match DueCategory::from_days(days_until_due(invoice.due_date, today)) {
            Some(DueCategory::Overdue) => sweep.overdue.push(invoice.clone()),
            Some(DueCategory::DueSoon) => sweep.due_soon.push(invoice.clone()),
            None => {}
        }
    }
    sweep
}
