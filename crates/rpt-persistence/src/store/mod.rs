//! String key-value stores.
//!
//! The store contract is deliberately small: values are opaque strings, and
//! failures are reported as `None`/`false` rather than errors. Callers turn
//! a refused write into [`crate::PersistenceError::WriteRejected`].

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// A synchronous string key-value store shared between threads.
pub trait KeyValueStore: Send + Sync {
    /// Value stored under `key`, if any.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`. Returns `false` when the store refuses.
    fn set(&self, key: &str, value: &str) -> bool;

    /// Delete `key`. Returns `false` when nothing was removed.
    fn remove(&self, key: &str) -> bool;

    /// Every stored key, sorted.
    fn keys(&self) -> Vec<String>;
}
