use crate::metadata::Metadata;
use crate::vector::Vector;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An identified vector with metadata and, once returned from a query, a score.
///
/// `id`, `vector` and `score` are read-only. Only the metadata can be
/// changed in place (`metadata_mut`).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VectorDocument {
    id: Uuid,
    vector: Vector,
    #[serde(default)]
    metadata: Metadata,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    score: Option<f32>,
}

impl VectorDocument {
    pub fn new(id: Uuid, vector: Vector, metadata: Metadata) -> Self {
        VectorDocument { id, vector, metadata, score: None }
    }

    /// Creates a document with a random v4 id and empty metadata.
    pub fn from_vector(vector: impl Into<Vector>) -> Self {
        Self::new(Uuid::new_v4(), vector.into(), Metadata::new())
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn vector(&self) -> &Vector {
        &self.vector
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.metadata
    }

    /// Distance to the query this document was returned for. `None` for stored documents.
    pub fn score(&self) -> Option<f32> {
        self.score
    }

    /// Returns a copy carrying `score`. The receiver is left untouched.
    pub fn with_score(&self, score: f32) -> Self {
        VectorDocument {
            id: self.id,
            vector: self.vector.clone(),
            metadata: self.metadata.clone(),
            score: Some(score),
        }
    }
}
