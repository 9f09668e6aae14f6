use thiserror::Error;

/// Rejected invoice creation request. No state is changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("client name is required")]
    EmptyClient,

    #[error("amount must be a positive number")]
    NonPositiveAmount,

    /// Amounts are stored as JSON numbers; this one would be saved as a
    /// different value.
    #[error("amount {0} has more precision than can be stored")]
    AmountNotRepresentable(rust_decimal::Decimal),

    #[error("status is required")]
    MissingStatus,

    #[error("invoice date is required")]
    MissingDate,

    #[error("due date is required")]
    MissingDueDate,
}

/// Failure of the backing key-value store.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to open storage at {}: {source}", path.display())]
    Open {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read key `{key}`: {source}")]
    Read {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write key `{key}`: {source}")]
    Write {
        key: String,
        #[source]
        source: std::io::Error,
    },

    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by [`crate::store::InvoiceStore`].
///
/// Unknown ids and clearing an empty collection are not errors; those
/// operations report a no-op through their return value instead.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("invalid invoice: {0}")]
    Validation(#[from] ValidationError),

    #[error("persistence failed: {0}")]
    Persistence(#[from] StorageError),

    /// Persisted content exists but cannot be parsed.
    #[error("stored invoice collection is malformed: {0}")]
    Corrupt(#[source] serde_json::Error),

    #[error("failed to serialize invoice collection: {0}")]
    Serialize(#[source] serde_json::Error),

    /// The invoice counter has reached its maximum value.
    #[error("no invoice numbers left after {last}")]
    NumbersExhausted { last: u64 },
}

/// How loudly an error should be presented to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Transient informational message; nothing is at risk.
    Info,
    /// Data durability is at risk; the user should retry.
    Critical,
}

impl TrackerError {
    pub fn severity(&self) -> Severity {
        match self {
            TrackerError::Validation(_) | TrackerError::NumbersExhausted { .. } => Severity::Info,
            TrackerError::Persistence(_) | TrackerError::Corrupt(_) | TrackerError::Serialize(_) => {
                Severity::Critical
            }
        }
    }

    /// Message suitable for showing to the person using the tracker.
    pub fn user_message(&self) -> String {
        match self {
            TrackerError::Validation(e) => format!("Please complete all required fields: {}.", e),
            TrackerError::Persistence(_) | TrackerError::Serialize(_) => {
                "Your changes could not be saved. Please try again.".to_string()
            }
            TrackerError::NumbersExhausted { .. } => {
                "No more invoice numbers can be issued. Remove or renumber the newest invoice."
                    .to_string()
            }
            TrackerError::Corrupt(_) => {
                "Saved invoices could not be read. Nothing was changed; please check the data file."
                    .to_string()
            }
        }
    }
}
