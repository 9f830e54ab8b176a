pub mod cache;
pub mod config;
pub mod distance;
pub mod document;
pub mod error;
pub mod metadata;
pub mod store;
pub mod vector;

// Re-export key types/traits for easier use
pub use cache::{Cache, FileCache, MemoryCache};
pub use config::StoreConfig;
pub use distance::{DistanceCalculator, DistanceStrategy};
pub use document::VectorDocument;
pub use error::{PrismError, PrismResult};
pub use metadata::Metadata;
pub use store::{CacheStore, InMemoryStore, ManagedStore, QueryOptions, QueryResults, Store, StoreOptions};
pub use vector::Vector;
