use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Days between the issue date and the default due date of a new invoice.
pub const DEFAULT_PAYMENT_TERM_DAYS: i64 = 7;

/// Opaque invoice identifier.
///
/// Persisted collections may carry ids produced by older writers, so the id is
/// kept as a plain string rather than a parsed UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvoiceId(pub String);

impl InvoiceId {
    /// Generates a fresh identifier (UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InvoiceId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Invoice status enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InvoiceStatus {
    Completed,
    InProgress,
    NotPaid,
}

impl InvoiceStatus {
    /// Human readable label used in listings and notifications.
    pub fn label(&self) -> &'static str {
        match self {
            InvoiceStatus::Completed => "Completed",
            InvoiceStatus::InProgress => "In Progress",
            InvoiceStatus::NotPaid => "Not Paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvoiceStatus::Completed => write!(f, "completed"),
            InvoiceStatus::InProgress => write!(f, "in-progress"),
            InvoiceStatus::NotPaid => write!(f, "not-paid"),
        }
    }
}

/// Supported invoice currencies. Amounts are never converted between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "IDR")]
    Idr,
    #[serde(rename = "USD")]
    Usd,
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Idr => write!(f, "IDR"),
            Currency::Usd => write!(f, "USD"),
        }
    }
}

/// How a reminder was triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReminderKind {
    Manual,
}

/// One entry of an invoice's reminder log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub date: DateTime<Utc>,

    #[serde(rename = "type")]
    pub kind: ReminderKind,
}

/// Invoice model representing a tracked invoice.
///
/// Field names on the wire are camelCase; this is the shape of the JSON array
/// persisted under [`crate::storage::INVOICES_KEY`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    /// Unique identifier for the invoice
    pub id: InvoiceId,

    /// Sequential invoice number (`INV-###`)
    pub number: String,

    /// Client name
    pub client: String,

    /// Invoice amount
    pub amount: Decimal,

    pub currency: Currency,

    pub status: InvoiceStatus,

    /// Date when the invoice was issued
    pub date: NaiveDate,

    /// Due date for payment
    pub due_date: NaiveDate,

    #[serde(default)]
    pub notes: String,

    /// Paid flag. Set together with `status` by "mark as paid", but status
    /// edits alone leave it untouched.
    pub is_paid: bool,

    /// Timestamp when the invoice was created
    pub created_at: DateTime<Utc>,

    /// Append-only reminder log
    #[serde(default)]
    pub reminders: Vec<Reminder>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reminder_date: Option<DateTime<Utc>>,

    #[serde(default)]
    pub reminder_sent: bool,
}

impl Invoice {
    pub fn is_unpaid(&self) -> bool {
        !self.is_paid
    }
}

/// Invoice creation request.
///
/// `status`, `date` and `due_date` are optional so that a request with missing
/// fields can be represented and rejected by validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInvoice {
    pub client: String,
    pub amount: Decimal,
    pub currency: Currency,
    pub status: Option<InvoiceStatus>,
    pub date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl NewInvoice {
    /// Request pre-filled the way the entry form starts out: issued today and
    /// due after the default payment term. Status is left for the caller.
    pub fn with_defaults(
        client: impl Into<String>,
        amount: Decimal,
        currency: Currency,
        today: NaiveDate,
    ) -> Self {
        Self {
            client: client.into(),
            amount,
            currency,
            status: None,
            date: Some(today),
            due_date: Some(today + Duration::days(DEFAULT_PAYMENT_TERM_DAYS)),
            notes: None,
        }
    }

    pub fn status(mut self, status: InvoiceStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}
