use tracing::{debug, info};
use uuid::Uuid;

use super::{ensure_finite, rank, ManagedStore, QueryOptions, QueryResults, Store, StoreOptions};
use crate::config::StoreConfig;
use crate::distance::{DistanceCalculator, DistanceStrategy};
use crate::document::VectorDocument;
use crate::error::PrismResult;
use crate::vector::Vector;

/// Keeps documents in a process-local `Vec` and answers queries with a linear scan.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    calculator: DistanceCalculator,
    default_max_items: Option<usize>,
    documents: Vec<VectorDocument>,
}

impl InMemoryStore {
    pub fn new(strategy: DistanceStrategy) -> Self {
        InMemoryStore {
            calculator: DistanceCalculator::new(strategy),
            ..Default::default()
        }
    }

    pub fn with_calculator(calculator: DistanceCalculator) -> Self {
        InMemoryStore {
            calculator,
            ..Default::default()
        }
    }

    /// Builds a store from validated configuration. `cache_key` is unused here.
    pub fn from_config(config: &StoreConfig) -> PrismResult<Self> {
        config.validate()?;
        Ok(InMemoryStore {
            calculator: DistanceCalculator::new(config.distance),
            default_max_items: config.default_max_items,
            documents: Vec::new(),
        })
    }

    pub fn distance_strategy(&self) -> DistanceStrategy {
        self.calculator.strategy()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl Store for InMemoryStore {
    fn add(&mut self, documents: Vec<VectorDocument>) -> PrismResult<()> {
        ensure_finite(&documents)?;
        debug!(added = documents.len(), total = self.documents.len() + documents.len(), "Adding documents to in-memory store");
        self.documents.extend(documents);
        Ok(())
    }

    fn query(&self, vector: &Vector, options: &QueryOptions) -> PrismResult<QueryResults> {
        let results = rank(&self.calculator, &self.documents, vector, options, self.default_max_items)?;
        debug!(stored = self.documents.len(), returned = results.len(), "In-memory query complete");
        Ok(results)
    }

    fn remove(&mut self, ids: &[Uuid]) -> PrismResult<usize> {
        let before = self.documents.len();
        self.documents.retain(|doc| !ids.contains(&doc.id()));
        let removed = before - self.documents.len();
        debug!(requested = ids.len(), removed, "Removed documents from in-memory store");
        Ok(removed)
    }
}

impl ManagedStore for InMemoryStore {
    fn setup(&mut self, _options: &StoreOptions) -> PrismResult<()> {
        // Nothing to provision for a process-local Vec
        debug!("In-memory store setup is a no-op");
        Ok(())
    }

    fn drop(&mut self) -> PrismResult<()> {
        info!(dropped = self.documents.len(), "Dropping in-memory store");
        self.documents.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;

    fn sample_documents() -> Vec<VectorDocument> {
        vec![
            VectorDocument::from_vector(vec![0.1, 0.1, 0.5]),
            VectorDocument::from_vector(vec![0.7, -0.3, 0.0]),
            VectorDocument::from_vector(vec![0.3, 0.7, 0.1]),
        ]
    }

    #[test]
    fn test_query_ranks_closest_first_and_add_is_cumulative() {
        let mut store = InMemoryStore::default();
        store.add(sample_documents()).unwrap();

        let query = Vector::from(vec![0.0, 0.1, 0.6]);
        let results = store.query(&query, &QueryOptions::new()).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results.first().unwrap().vector().as_slice(), &[0.1, 0.1, 0.5]);

        store.add(sample_documents()).unwrap();
        let results = store.query(&query, &QueryOptions::new()).unwrap();
        assert_eq!(results.len(), 6);
        assert_eq!(results.first().unwrap().vector().as_slice(), &[0.1, 0.1, 0.5]);
    }

    #[test]
    fn test_duplicate_ids_are_kept() {
        let mut store = InMemoryStore::new(DistanceStrategy::Euclidean);
        let doc = VectorDocument::from_vector(vec![1.0, 1.0]);
        store.add(vec![doc.clone(), doc.clone()]).unwrap();
        assert_eq!(store.len(), 2);

        let results = store.query(&Vector::from(vec![1.0, 1.0]), &QueryOptions::new()).unwrap();
        assert!(results.iter().all(|d| d.id() == doc.id()));
    }

    #[test]
    fn test_filter_applies_before_max_items() {
        let mut store = InMemoryStore::new(DistanceStrategy::Euclidean);
        let docs: Vec<VectorDocument> = (0..10)
            .map(|i| {
                let mut metadata = Metadata::new();
                metadata.insert("even", i % 2 == 0);
                VectorDocument::new(Uuid::new_v4(), Vector::from(vec![i as f32]), metadata)
            })
            .collect();
        store.add(docs).unwrap();

        let options = QueryOptions::new()
            .with_filter(|doc| doc.metadata().get("even") == Some(&serde_json::Value::Bool(false)))
            .with_max_items(2);
        let results = store.query(&Vector::from(vec![0.0]), &options).unwrap();

        // The two closest odd vectors, not the closest two overall filtered afterwards
        let values: Vec<f32> = results.iter().map(|d| d.vector()[0]).collect();
        assert_eq!(values, vec![1.0, 3.0]);
    }

    #[test]
    fn test_filter_excluding_everything_yields_empty() {
        let mut store = InMemoryStore::default();
        store.add(sample_documents()).unwrap();
        let results = store
            .query(&Vector::from(vec![0.0, 0.1, 0.6]), &QueryOptions::new().with_filter(|_| false))
            .unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_drop_then_query_is_empty() {
        let mut store = InMemoryStore::default();
        store.setup(&StoreOptions::new()).unwrap();
        store.add(sample_documents()).unwrap();
        store.drop().unwrap();

        assert!(store.is_empty());
        let results = store.query(&Vector::from(vec![0.0, 0.1, 0.6]), &QueryOptions::new()).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_remove_deletes_all_copies() {
        let mut store = InMemoryStore::default();
        let docs = sample_documents();
        let target = docs[1].id();
        store.add(docs.clone()).unwrap();
        store.add(docs).unwrap();

        assert_eq!(store.remove(&[target, Uuid::new_v4()]).unwrap(), 2);
        assert_eq!(store.len(), 4);
        assert_eq!(store.remove(&[target]).unwrap(), 0);
    }

    #[test]
    fn test_default_max_items_from_config() {
        let config = StoreConfig {
            distance: DistanceStrategy::Manhattan,
            default_max_items: Some(2),
            ..Default::default()
        };
        let mut store = InMemoryStore::from_config(&config).unwrap();
        assert_eq!(store.distance_strategy(), DistanceStrategy::Manhattan);
        store.add(sample_documents()).unwrap();

        let query = Vector::from(vec![0.0, 0.1, 0.6]);
        assert_eq!(store.query(&query, &QueryOptions::new()).unwrap().len(), 2);
        // An explicit cap wins over the configured default
        assert_eq!(store.query(&query, &QueryOptions::new().with_max_items(3)).unwrap().len(), 3);
    }
}
