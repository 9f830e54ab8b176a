//! Key/value blob caches used as a storage substrate by `CacheStore`.

pub mod file;
pub mod memory;

pub use file::FileCache;
pub use memory::MemoryCache;

use crate::error::PrismResult;

/// A byte-blob cache addressed by string keys.
///
/// Implementations use interior mutability so a single cache can be shared
/// (e.g. behind an `Arc`) between several stores.
pub trait Cache: Send + Sync + std::fmt::Debug {
    /// Returns the blob stored under `key`, or `None` on a miss.
    fn get(&self, key: &str) -> PrismResult<Option<Vec<u8>>>;

    /// Stores `value` under `key`, replacing any previous blob.
    fn set(&self, key: &str, value: Vec<u8>) -> PrismResult<()>;

    /// Removes `key`. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> PrismResult<()>;

    fn contains(&self, key: &str) -> PrismResult<bool> {
        Ok(self.get(key)?.is_some())
    }
}

impl<C: Cache + ?Sized> Cache for std::sync::Arc<C> {
    fn get(&self, key: &str) -> PrismResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: Vec<u8>) -> PrismResult<()> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> PrismResult<()> {
        (**self).delete(key)
    }

    fn contains(&self, key: &str) -> PrismResult<bool> {
        (**self).contains(key)
    }
}
