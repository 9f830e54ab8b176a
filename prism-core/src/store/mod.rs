//! Store contract shared by the local vector stores.

pub mod cache;
pub mod in_memory;

pub use cache::CacheStore;
pub use in_memory::InMemoryStore;

use std::fmt;

use serde_json::{Map, Value};
use uuid::Uuid;

use crate::distance::DistanceCalculator;
use crate::document::VectorDocument;
use crate::error::{PrismError, PrismResult};
use crate::vector::Vector;

/// Free-form options passed to `ManagedStore::setup`.
pub type StoreOptions = Map<String, Value>;

/// Predicate evaluated against every stored document before ranking.
pub type DocumentFilter = Box<dyn Fn(&VectorDocument) -> bool + Send + Sync>;

/// Per-query options.
#[derive(Default)]
pub struct QueryOptions {
    filter: Option<DocumentFilter>,
    max_items: Option<usize>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only documents for which `filter` returns `true` are ranked.
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: Fn(&VectorDocument) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(filter));
        self
    }

    /// Caps the number of returned documents.
    pub fn with_max_items(mut self, max_items: usize) -> Self {
        self.max_items = Some(max_items);
        self
    }

    pub fn max_items(&self) -> Option<usize> {
        self.max_items
    }

    pub fn has_filter(&self) -> bool {
        self.filter.is_some()
    }

    fn accepts(&self, document: &VectorDocument) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(document))
    }
}

impl fmt::Debug for QueryOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryOptions")
            .field("filter", &self.filter.as_ref().map(|_| "<fn>"))
            .field("max_items", &self.max_items)
            .finish()
    }
}

/// Ranked documents returned by a query. Can be iterated any number of times.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryResults {
    documents: Vec<VectorDocument>,
}

impl QueryResults {
    pub fn iter(&self) -> std::slice::Iter<'_, VectorDocument> {
        self.documents.iter()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn first(&self) -> Option<&VectorDocument> {
        self.documents.first()
    }

    pub fn as_slice(&self) -> &[VectorDocument] {
        &self.documents
    }

    pub fn into_vec(self) -> Vec<VectorDocument> {
        self.documents
    }
}

impl From<Vec<VectorDocument>> for QueryResults {
    fn from(documents: Vec<VectorDocument>) -> Self {
        QueryResults { documents }
    }
}

impl IntoIterator for QueryResults {
    type Item = VectorDocument;
    type IntoIter = std::vec::IntoIter<VectorDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.into_iter()
    }
}

impl<'a> IntoIterator for &'a QueryResults {
    type Item = &'a VectorDocument;
    type IntoIter = std::slice::Iter<'a, VectorDocument>;

    fn into_iter(self) -> Self::IntoIter {
        self.documents.iter()
    }
}

/// The primary trait defining vector store functionality.
pub trait Store: Send + Sync + fmt::Debug {
    /// Appends documents. Duplicate ids are kept.
    ///
    /// Fails with `PrismError::InvalidArgument`, adding nothing, when any
    /// vector has a NaN or infinite component.
    fn add(&mut self, documents: Vec<VectorDocument>) -> PrismResult<()>;

    /// Filters, ranks and truncates the stored documents against `vector`.
    fn query(&self, vector: &Vector, options: &QueryOptions) -> PrismResult<QueryResults>;

    /// Removes every document whose id is listed. Unknown ids are ignored.
    /// Returns the number of removed documents.
    fn remove(&mut self, ids: &[Uuid]) -> PrismResult<usize>;
}

/// Stores that need explicit provisioning and teardown.
pub trait ManagedStore: Store {
    fn setup(&mut self, options: &StoreOptions) -> PrismResult<()>;

    /// Removes all documents.
    fn drop(&mut self) -> PrismResult<()>;
}

/// Applies the filter, then ranks what is left.
pub(crate) fn rank<'a, I>(
    calculator: &DistanceCalculator,
    documents: I,
    vector: &Vector,
    options: &QueryOptions,
    default_max_items: Option<usize>,
) -> PrismResult<QueryResults>
where
    I: IntoIterator<Item = &'a VectorDocument>,
{
    let candidates = documents.into_iter().filter(|doc| options.accepts(doc));
    let max_items = options.max_items.or(default_max_items);
    calculator.calculate(candidates, vector, max_items).map(QueryResults::from)
}

/// Rejects documents whose vectors hold NaN or infinite components.
pub(crate) fn ensure_finite(documents: &[VectorDocument]) -> PrismResult<()> {
    match documents.iter().find(|doc| !doc.vector().is_finite()) {
        Some(doc) => Err(PrismError::InvalidArgument(format!(
            "Document {} has a non-finite vector component",
            doc.id()
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_options_builder() {
        let options = QueryOptions::new().with_max_items(3).with_filter(|doc| doc.metadata().has_text());
        assert_eq!(options.max_items(), Some(3));
        assert!(options.has_filter());
        assert!(!options.accepts(&VectorDocument::from_vector(vec![1.0])));
        assert!(format!("{:?}", options).contains("<fn>"));
    }

    #[test]
    fn test_ensure_finite() {
        let finite = VectorDocument::from_vector(vec![1.0, -2.5]);
        let infinite = VectorDocument::from_vector(vec![f32::INFINITY, 0.0]);
        assert!(ensure_finite(&[finite.clone()]).is_ok());
        assert!(ensure_finite(&[]).is_ok());

        let err = ensure_finite(&[finite, infinite.clone()]).unwrap_err();
        assert!(matches!(err, PrismError::InvalidArgument(msg) if msg.contains(&infinite.id().to_string())));
    }

    #[test]
    fn test_query_results_iterate_repeatedly() {
        let results = QueryResults::from(vec![
            VectorDocument::from_vector(vec![1.0]),
            VectorDocument::from_vector(vec![2.0]),
        ]);
        assert_eq!(results.iter().count(), 2);
        assert_eq!((&results).into_iter().count(), 2);
        assert_eq!(results.len(), 2);
        assert_eq!(results.into_vec().len(), 2);
    }
}
