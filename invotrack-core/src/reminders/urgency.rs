use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unpaid invoices due within this many days count as "due soon".
pub const DUE_SOON_WINDOW_DAYS: i64 = 7;

/// Whole calendar days from `today` until `due_date`.
///
/// Zero means due today, negative means past due.
pub fn days_until_due(due_date: NaiveDate, today: NaiveDate) -> i64 {
    (due_date - today).num_days()
}

/// Urgency bucket of an unpaid invoice on the reminder board.
///
/// - Urgent: due today or past due
/// - Upcoming: due within the next seven days
/// - Scheduled: due later than that
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Urgent,
    Upcoming,
    Scheduled,
}

impl Urgency {
    pub fn from_days(days_until_due: i64) -> Self {
        if days_until_due <= 0 {
            Urgency::Urgent
        } else if days_until_due <= DUE_SOON_WINDOW_DAYS {
            Urgency::Upcoming
        } else {
            Urgency::Scheduled
        }
    }
}

impl fmt::Display for Urgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Urgency::Urgent => write!(f, "urgent"),
            Urgency::Upcoming => write!(f, "upcoming"),
            Urgency::Scheduled => write!(f, "scheduled"),
        }
    }
}

/// Category reported by the periodic due-date sweep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DueCategory {
    Overdue,
    DueSoon,
}

impl DueCategory {
    /// Classifies an unpaid invoice; `None` when it is not due within the window.
    pub fn from_days(days_until_due: i64) -> Option<Self> {
        match Urgency::from_days(days_until_due) {
            Urgency::Urgent => Some(DueCategory::Overdue),
            Urgency::Upcoming => Some(DueCategory::DueSoon),
            Urgency::Scheduled => None,
        }
    }

    /// Stable tag used to collapse repeated notifications of one category.
    pub fn tag(&self) -> &'static str {
        match self {
            DueCategory::Overdue => "invoice-overdue",
            DueCategory::DueSoon => "invoice-due-soon",
        }
    }
}

impl fmt::Display for DueCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DueCategory::Overdue => write!(f, "overdue"),
            DueCategory::DueSoon => write!(f, "due-soon"),
        }
    }
}

/// Payment status line shown next to a reminder.
pub fn payment_status_text(days_until_due: i64) -> String {
    match days_until_due {
        0 => "Due today".to_string(),
        d if d < 0 => {
            let late = d.abs();
            format!("Overdue by {} day{}", late, if late == 1 { "" } else { "s" })
        }
        1 => "Due tomorrow".to_string(),
        d => format!("Due in {} days", d),
    }
}
