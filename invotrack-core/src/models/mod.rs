pub mod invoice;

pub use invoice::{
    Currency, Invoice, InvoiceId, InvoiceStatus, NewInvoice, Reminder, ReminderKind,
    DEFAULT_PAYMENT_TERM_DAYS,
};
