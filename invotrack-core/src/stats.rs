//! Dashboard statistics over the invoice collection.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Currency, Invoice, InvoiceStatus};
use crate::reminders::urgency::{days_until_due, DUE_SOON_WINDOW_DAYS};

/// Count and summed amount of a group of invoices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub count: usize,
    pub amount: Decimal,
}

impl Bucket {
    fn add(&mut self, amount: Decimal) {
        self.count += 1;
        self.amount = self.amount.saturating_add(amount);
    }

    /// Mean amount, or zero for an empty bucket.
    pub fn average(&self) -> Decimal {
        if self.count == 0 {
            Decimal::ZERO
        } else {
            self.amount / Decimal::from(self.count)
        }
    }
}

/// Point-in-time statistics.
///
/// Status and total buckets add amounts across currencies without conversion.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSnapshot {
    pub completed: Bucket,
    pub in_progress: Bucket,
    pub not_paid: Bucket,
    pub total: Bucket,
    pub due_soon: Bucket,
    pub total_idr: Bucket,
    pub total_usd: Bucket,
    /// Number of the newest invoice, if any.
    pub latest_number: Option<String>,
}

impl StatsSnapshot {
    /// Outstanding amount: in-progress plus not-paid. Sums clamp at
    /// `Decimal::MAX` instead of overflowing.
    pub fn pending_amount(&self) -> Decimal {
        self.in_progress.amount.saturating_add(self.not_paid.amount)
    }

    pub fn currency(&self, currency: Currency) -> &Bucket {
        match currency {
            Currency::Idr => &self.total_idr,
            Currency::Usd => &self.total_usd,
        }
    }

    pub fn average_amount(&self, currency: Currency) -> Decimal {
        self.currency(currency).average()
    }
}

/// Computes statistics in a single pass. `invoices` must be newest first.
pub fn compute_stats(invoices: &[Invoice], today: NaiveDate) -> StatsSnapshot {
    let mut stats = StatsSnapshot {
        latest_number: invoices.first().map(|invoice| invoice.number.clone()),
        ..StatsSnapshot::default()
    };

    for invoice in invoices {
        stats.total.add(invoice.amount);

        match invoice.currency {
            Currency::Idr => stats.total_idr.add(invoice.amount),
            Currency::Usd => stats.total_usd.add(invoice.amount),
        }

        match invoice.status {
            InvoiceStatus::Completed => stats.completed.add(invoice.amount),
            InvoiceStatus::InProgress => stats.in_progress.add(invoice.amount),
            InvoiceStatus::NotPaid => stats.not_paid.add(invoice.amount),
        }

        if invoice.is_unpaid() {
            let days = days_until_due(invoice.due_date, today);
            if days > 0 && days <= DUE_SOON_WINDOW_DAYS {
                stats.due_soon.add(invoice.amount);
            }
        }
    }

    stats
}
