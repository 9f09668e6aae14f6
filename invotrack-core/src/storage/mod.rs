//! Key-value persistence behind the invoice store.

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StorageError;

/// Key under which the invoice collection is stored as a JSON array.
pub const INVOICES_KEY: &str = "invoices";

/// Synchronous string key-value store.
///
/// `get` returns `Ok(None)` for a key that was never written. Every `set` must
/// be durable before it returns.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
