use tracing::{debug, info};
use uuid::Uuid;

use super::{ensure_finite, rank, ManagedStore, QueryOptions, QueryResults, Store, StoreOptions};
use crate::cache::Cache;
use crate::config::{StoreConfig, DEFAULT_CACHE_KEY};
use crate::distance::{DistanceCalculator, DistanceStrategy};
use crate::document::VectorDocument;
use crate::error::{PrismError, PrismResult};
use crate::vector::Vector;

/// Vector store whose document collection lives in a `Cache` entry.
///
/// The whole collection is kept as a single JSON blob under `cache_key`.
/// Ranking and filtering behave exactly like `InMemoryStore`.
#[derive(Debug)]
pub struct CacheStore<C: Cache> {
    cache: C,
    calculator: DistanceCalculator,
    cache_key: String,
    default_max_items: Option<usize>,
}

impl<C: Cache> CacheStore<C> {
    pub fn new(cache: C, strategy: DistanceStrategy) -> Self {
        CacheStore {
            cache,
            calculator: DistanceCalculator::new(strategy),
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            default_max_items: None,
        }
    }

    pub fn from_config(cache: C, config: &StoreConfig) -> PrismResult<Self> {
        config.validate()?;
        Ok(CacheStore {
            cache,
            calculator: DistanceCalculator::new(config.distance),
            cache_key: config.cache_key.clone(),
            default_max_items: config.default_max_items,
        })
    }

    pub fn with_cache_key(mut self, cache_key: impl Into<String>) -> Self {
        self.cache_key = cache_key.into();
        self
    }

    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Current collection. A missing entry reads as empty.
    pub fn load(&self) -> PrismResult<Vec<VectorDocument>> {
        match self.cache.get(&self.cache_key)? {
            Some(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                PrismError::Deserialization(format!("Failed to decode documents under cache key '{}': {}", self.cache_key, e))
            }),
            None => {
                debug!(cache_key = %self.cache_key, "No cached documents, treating as empty");
                Ok(Vec::new())
            }
        }
    }

    fn save(&self, documents: &[VectorDocument]) -> PrismResult<()> {
        let bytes = serde_json::to_vec(documents).map_err(|e| {
            PrismError::Serialization(format!("Failed to encode documents for cache key '{}': {}", self.cache_key, e))
        })?;
        self.cache.set(&self.cache_key, bytes)
    }
}

impl<C: Cache> Store for CacheStore<C> {
    fn add(&mut self, documents: Vec<VectorDocument>) -> PrismResult<()> {
        // serde_json writes NaN and infinity as null, which would not decode again
        ensure_finite(&documents)?;
        let mut stored = self.load()?;
        let added = documents.len();
        stored.extend(documents);
        self.save(&stored)?;
        debug!(cache_key = %self.cache_key, added, total = stored.len(), "Added documents to cache store");
        Ok(())
    }

    fn query(&self, vector: &Vector, options: &QueryOptions) -> PrismResult<QueryResults> {
        let stored = self.load()?;
        let results = rank(&self.calculator, &stored, vector, options, self.default_max_items)?;
        debug!(cache_key = %self.cache_key, stored = stored.len(), returned = results.len(), "Cache store query complete");
        Ok(results)
    }

    fn remove(&mut self, ids: &[Uuid]) -> PrismResult<usize> {
        let mut stored = self.load()?;
        let before = stored.len();
        stored.retain(|doc| !ids.contains(&doc.id()));
        let removed = before - stored.len();
        if removed > 0 {
            self.save(&stored)?;
        }
        debug!(cache_key = %self.cache_key, removed, "Removed documents from cache store");
        Ok(removed)
    }
}

impl<C: Cache> ManagedStore for CacheStore<C> {
    fn setup(&mut self, _options: &StoreOptions) -> PrismResult<()> {
        if self.cache.contains(&self.cache_key)? {
            debug!(cache_key = %self.cache_key, "Cache store already initialised");
            return Ok(());
        }
        info!(cache_key = %self.cache_key, "Initialising cache store");
        self.save(&[])
    }

    fn drop(&mut self) -> PrismResult<()> {
        info!(cache_key = %self.cache_key, "Dropping cache store");
        self.save(&[])
    }
}
