use serde::{Serialize, Deserialize};
use crate::distance::DistanceStrategy;
use crate::error::{PrismResult, PrismError};

/// Cache key used by `CacheStore` when none is configured.
pub const DEFAULT_CACHE_KEY: &str = "_vectors";

/// Configuration for the local vector stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Strategy used to rank documents against a query.
    pub distance: DistanceStrategy,
    /// Key under which `CacheStore` keeps its document collection.
    pub cache_key: String,
    /// Cap applied to queries that do not set `max_items` themselves.
    pub default_max_items: Option<usize>,
}

impl StoreConfig {
    pub fn new(distance: DistanceStrategy) -> Self {
        StoreConfig {
            distance,
            ..Default::default()
        }
    }

    /// Parses and validates a JSON configuration document.
    /// Missing fields fall back to their defaults.
    pub fn from_json_str(json: &str) -> PrismResult<Self> {
        let config: StoreConfig = serde_json::from_str(json)
            .map_err(|e| PrismError::Configuration(format!("Invalid store configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> PrismResult<()> {
        if self.cache_key.trim().is_empty() {
            return Err(PrismError::Configuration("cache_key must not be empty".to_string()));
        }
        if self.default_max_items == Some(0) {
            return Err(PrismError::Configuration("default_max_items must be greater than 0".to_string()));
        }
        Ok(())
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig {
            distance: DistanceStrategy::Cosine,
            cache_key: DEFAULT_CACHE_KEY.to_string(),
            default_max_items: None,
        }
    }
}
