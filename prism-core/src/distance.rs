//! Distance strategies and the linear-scan ranking used by the local stores.

use std::cmp::Ordering;
use std::f32::consts::PI;
use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView1;
use serde::{Serialize, Deserialize};
use tracing::trace;

use crate::document::VectorDocument;
use crate::error::{PrismError, PrismResult};
use crate::vector::Vector;

/// Enum representing supported distance strategies.
///
/// Every strategy yields a *distance*: lower means closer. Cosine is
/// expressed as `1 - cosine_similarity` so that all strategies sort the
/// same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceStrategy {
    /// `1 - cos(a, b)`, range [0, 2].
    #[default]
    Cosine,
    /// Angle between the vectors normalised by π, range [0, 1].
    Angular,
    /// L2 distance.
    Euclidean,
    /// L1 distance.
    Manhattan,
    /// L∞ distance.
    Chebyshev,
}

impl DistanceStrategy {
    pub const ALL: [DistanceStrategy; 5] = [
        DistanceStrategy::Cosine,
        DistanceStrategy::Angular,
        DistanceStrategy::Euclidean,
        DistanceStrategy::Manhattan,
        DistanceStrategy::Chebyshev,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceStrategy::Cosine => "cosine",
            DistanceStrategy::Angular => "angular",
            DistanceStrategy::Euclidean => "euclidean",
            DistanceStrategy::Manhattan => "manhattan",
            DistanceStrategy::Chebyshev => "chebyshev",
        }
    }
}

impl fmt::Display for DistanceStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceStrategy {
    type Err = PrismError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DistanceStrategy::ALL
            .into_iter()
            .find(|strategy| strategy.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PrismError::InvalidDistanceStrategy(s.to_string()))
    }
}

/// Cosine similarity clamped to [-1, 1]. Zero vectors have similarity 0.
fn cosine_similarity(a: ArrayView1<f32>, b: ArrayView1<f32>) -> f32 {
    let dot_product = a.dot(&b);
    let norm_a = a.dot(&a).sqrt();
    let norm_b = b.dot(&b).sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        // Clamp to absorb rounding that lands just outside [-1, 1]
        (dot_product / (norm_a * norm_b)).clamp(-1.0, 1.0)
    }
}

/// Calculates the distance between two vectors with the given strategy.
///
/// Returns `PrismError::DimensionMismatch` if the vectors have different
/// lengths; `expected` is the length of `a`.
pub fn distance(strategy: DistanceStrategy, a: ArrayView1<f32>, b: ArrayView1<f32>) -> PrismResult<f32> {
    if a.len() != b.len() {
        return Err(PrismError::DimensionMismatch {
            expected: a.len(),
            actual: b.len(),
        });
    }

    let value = match strategy {
        DistanceStrategy::Cosine => 1.0 - cosine_similarity(a, b),
        DistanceStrategy::Angular => cosine_similarity(a, b).acos() / PI,
        DistanceStrategy::Euclidean => {
            let diff = &a - &b;
            diff.dot(&diff).sqrt()
        }
        DistanceStrategy::Manhattan => (&a - &b).mapv(f32::abs).sum(),
        DistanceStrategy::Chebyshev => (&a - &b).iter().fold(0.0f32, |max, d| max.max(d.abs())),
    };
    Ok(value)
}

/// Trait to encapsulate distance calculation logic.
pub trait Distance {
    fn distance(&self, a: ArrayView1<f32>, b: ArrayView1<f32>) -> PrismResult<f32>;
}

impl Distance for DistanceStrategy {
    fn distance(&self, a: ArrayView1<f32>, b: ArrayView1<f32>) -> PrismResult<f32> {
        distance(*self, a, b)
    }
}

/// Ranks documents against a query vector with a fixed strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DistanceCalculator {
    strategy: DistanceStrategy,
}

impl DistanceCalculator {
    pub fn new(strategy: DistanceStrategy) -> Self {
        DistanceCalculator { strategy }
    }

    pub fn strategy(&self) -> DistanceStrategy {
        self.strategy
    }

    /// Scores every document against `query`, sorts ascending and keeps at
    /// most `max_items`.
    ///
    /// The sort is stable: equal distances keep their input order. A NaN
    /// distance ranks after every number. Only the returned documents are
    /// cloned, with `score` set; the inputs are not modified.
    pub fn calculate<'a, I>(&self, documents: I, query: &Vector, max_items: Option<usize>) -> PrismResult<Vec<VectorDocument>>
    where
        I: IntoIterator<Item = &'a VectorDocument>,
    {
        let mut scored = documents
            .into_iter()
            .map(|doc| Ok((self.strategy.distance(query.view(), doc.vector().view())?, doc)))
            .collect::<PrismResult<Vec<(f32, &VectorDocument)>>>()?;
        let candidates = scored.len();

        scored.sort_by(|(a, _), (b, _)| compare_distances(*a, *b));

        if let Some(limit) = max_items {
            scored.truncate(limit);
        }

        trace!(strategy = %self.strategy, candidates, returned = scored.len(), "Ranked documents");

        Ok(scored.into_iter().map(|(score, doc)| doc.with_score(score)).collect())
    }
}

// Total order over distances: numbers ascending, NaN last, 0.0 == -0.0
fn compare_distances(a: f32, b: f32) -> Ordering {
    a.partial_cmp(&b).unwrap_or_else(|| a.is_nan().cmp(&b.is_nan()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::Metadata;
    use ndarray::arr1;
    use uuid::Uuid;

    fn doc(values: &[f32]) -> VectorDocument {
        VectorDocument::new(Uuid::new_v4(), Vector::from(values), Metadata::new())
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_cosine_distance() {
        let v1 = arr1(&[1.0, 2.0, 3.0]);
        let v3 = arr1(&[-1.0, -2.0, -3.0]);
        let v4 = arr1(&[2.0, 4.0, 6.0]);
        let x = arr1(&[1.0, 0.0, 0.0]);
        let y = arr1(&[0.0, 1.0, 0.0]);
        let zero = arr1(&[0.0, 0.0, 0.0]);

        assert!(approx(distance(DistanceStrategy::Cosine, v1.view(), v1.view()).unwrap(), 0.0));
        assert!(approx(distance(DistanceStrategy::Cosine, v1.view(), v3.view()).unwrap(), 2.0));
        assert!(approx(distance(DistanceStrategy::Cosine, v1.view(), v4.view()).unwrap(), 0.0)); // Parallel
        assert!(approx(distance(DistanceStrategy::Cosine, x.view(), y.view()).unwrap(), 1.0)); // Orthogonal
        assert!(approx(distance(DistanceStrategy::Cosine, v1.view(), zero.view()).unwrap(), 1.0)); // Zero vector
    }

    #[test]
    fn test_angular_distance() {
        let x = arr1(&[1.0, 0.0]);
        let y = arr1(&[0.0, 1.0]);
        let neg_x = arr1(&[-1.0, 0.0]);
        let zero = arr1(&[0.0, 0.0]);

        assert!(approx(distance(DistanceStrategy::Angular, x.view(), x.view()).unwrap(), 0.0));
        assert!(approx(distance(DistanceStrategy::Angular, x.view(), y.view()).unwrap(), 0.5));
        assert!(approx(distance(DistanceStrategy::Angular, x.view(), neg_x.view()).unwrap(), 1.0));
        assert!(approx(distance(DistanceStrategy::Angular, x.view(), zero.view()).unwrap(), 0.5));
    }

    #[test]
    fn test_euclidean_manhattan_chebyshev() {
        let v1 = arr1(&[1.0, 2.0, 3.0]);
        let v2 = arr1(&[4.0, 6.0, 8.0]); // Diff: [3, 4, 5]

        assert!(approx(distance(DistanceStrategy::Euclidean, v1.view(), v2.view()).unwrap(), 50.0f32.sqrt()));
        assert!(approx(distance(DistanceStrategy::Manhattan, v1.view(), v2.view()).unwrap(), 12.0));
        assert!(approx(distance(DistanceStrategy::Chebyshev, v1.view(), v2.view()).unwrap(), 5.0));
        assert!(approx(distance(DistanceStrategy::Chebyshev, v2.view(), v1.view()).unwrap(), 5.0));
    }

    #[test]
    fn test_dimension_mismatch() {
        let v1 = arr1(&[1.0, 2.0]);
        let v2 = arr1(&[1.0, 2.0, 3.0]);

        for strategy in DistanceStrategy::ALL {
            assert!(matches!(
                distance(strategy, v1.view(), v2.view()),
                Err(PrismError::DimensionMismatch { expected: 2, actual: 3 })
            ));
        }
    }

    #[test]
    fn test_strategy_from_str_and_serde() {
        assert_eq!("Chebyshev".parse::<DistanceStrategy>().unwrap(), DistanceStrategy::Chebyshev);
        assert_eq!(" angular ".parse::<DistanceStrategy>().unwrap(), DistanceStrategy::Angular);
        assert!(matches!(
            "hamming".parse::<DistanceStrategy>(),
            Err(PrismError::InvalidDistanceStrategy(name)) if name == "hamming"
        ));

        assert_eq!(serde_json::to_string(&DistanceStrategy::Manhattan).unwrap(), "\"manhattan\"");
        let parsed: DistanceStrategy = serde_json::from_str("\"euclidean\"").unwrap();
        assert_eq!(parsed, DistanceStrategy::Euclidean);
    }

    #[test]
    fn test_identical_vector_ranks_first_for_every_strategy() {
        let docs = vec![doc(&[0.7, -0.3, 0.0]), doc(&[0.3, 0.7, 0.1]), doc(&[0.1, 0.1, 0.5])];
        let query = Vector::from(vec![0.1, 0.1, 0.5]);

        for strategy in DistanceStrategy::ALL {
            let ranked = DistanceCalculator::new(strategy).calculate(&docs, &query, None).unwrap();
            assert_eq!(ranked.len(), 3, "strategy {}", strategy);
            assert_eq!(ranked[0].id(), docs[2].id(), "strategy {}", strategy);
            // acos is steep near 1, so angular only gets close to 0 in f32
            assert!(ranked[0].score().unwrap().abs() < 1e-3, "strategy {}", strategy);
        }
    }

    #[test]
    fn test_parallel_vectors_score_equally_for_cosine_and_angular() {
        let docs = vec![doc(&[1.0, 2.0, 2.0]), doc(&[3.0, 6.0, 6.0]), doc(&[-1.0, 0.5, 0.0])];
        let query = Vector::from(vec![2.0, 1.0, 0.5]);

        for strategy in [DistanceStrategy::Cosine, DistanceStrategy::Angular] {
            let ranked = DistanceCalculator::new(strategy).calculate(&docs, &query, None).unwrap();
            let score_of = |id: Uuid| ranked.iter().find(|d| d.id() == id).and_then(|d| d.score()).unwrap();
            assert!((score_of(docs[0].id()) - score_of(docs[1].id())).abs() < 1e-6);
        }
    }

    #[test]
    fn test_results_sorted_ascending_and_scored() {
        let docs = vec![doc(&[5.0, 0.0]), doc(&[1.0, 0.0]), doc(&[3.0, 0.0])];
        let query = Vector::from(vec![0.0, 0.0]);

        let ranked = DistanceCalculator::new(DistanceStrategy::Euclidean).calculate(&docs, &query, None).unwrap();
        let scores: Vec<f32> = ranked.iter().map(|d| d.score().unwrap()).collect();
        assert_eq!(scores, vec![1.0, 3.0, 5.0]);
        // Inputs stay unscored
        assert!(docs.iter().all(|d| d.score().is_none()));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let docs = vec![doc(&[1.0, 0.0]), doc(&[0.0, 1.0]), doc(&[-1.0, 0.0]), doc(&[0.0, -1.0])];
        let query = Vector::from(vec![0.0, 0.0]);

        let ranked = DistanceCalculator::new(DistanceStrategy::Manhattan).calculate(&docs, &query, None).unwrap();
        let ids: Vec<Uuid> = ranked.iter().map(|d| d.id()).collect();
        let expected: Vec<Uuid> = docs.iter().map(|d| d.id()).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_max_items_is_prefix_of_full_ranking() {
        let docs: Vec<VectorDocument> = (0..6).map(|i| doc(&[i as f32, 1.0])).collect();
        let query = Vector::from(vec![2.2, 1.0]);
        let calculator = DistanceCalculator::new(DistanceStrategy::Euclidean);

        let full = calculator.calculate(&docs, &query, None).unwrap();
        let capped = calculator.calculate(&docs, &query, Some(3)).unwrap();
        assert_eq!(capped.len(), 3);
        assert_eq!(capped.as_slice(), &full[..3]);

        let oversized = calculator.calculate(&docs, &query, Some(100)).unwrap();
        assert_eq!(oversized, full);

        assert!(calculator.calculate(&docs, &query, Some(0)).unwrap().is_empty());
    }

    #[test]
    fn test_empty_documents_yield_empty_result() {
        let query = Vector::from(vec![1.0, 2.0, 3.0]);
        let ranked = DistanceCalculator::default().calculate(Vec::<VectorDocument>::new().iter(), &query, Some(5)).unwrap();
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_nan_distance_ranks_last() {
        let docs = vec![doc(&[f32::NAN, 0.0]), doc(&[3.0, 0.0]), doc(&[f32::NAN, 1.0]), doc(&[1.0, 0.0])];
        let query = Vector::from(vec![0.0, 0.0]);

        let ranked = DistanceCalculator::new(DistanceStrategy::Euclidean).calculate(&docs, &query, None).unwrap();
        let ids: Vec<Uuid> = ranked.iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec![docs[3].id(), docs[1].id(), docs[0].id(), docs[2].id()]);
        assert!(ranked[2].score().unwrap().is_nan());

        assert_eq!(compare_distances(-0.0, 0.0), Ordering::Equal);
        assert_eq!(compare_distances(f32::NAN, f32::INFINITY), Ordering::Greater);
        assert_eq!(compare_distances(f32::NAN, f32::NAN), Ordering::Equal);
    }

    #[test]
    fn test_calculate_accepts_borrowed_candidates() {
        let docs = vec![doc(&[5.0, 0.0]), doc(&[1.0, 0.0]), doc(&[3.0, 0.0])];
        let query = Vector::from(vec![0.0, 0.0]);

        let ranked = DistanceCalculator::new(DistanceStrategy::Euclidean)
            .calculate(docs.iter().filter(|d| d.vector()[0] > 2.0), &query, None)
            .unwrap();
        let ids: Vec<Uuid> = ranked.iter().map(|d| d.id()).collect();
        assert_eq!(ids, vec![docs[2].id(), docs[0].id()]);
    }

    #[test]
    fn test_mismatched_candidate_is_rejected() {
        let docs = vec![doc(&[1.0, 0.0, 0.0]), doc(&[1.0, 0.0])];
        let query = Vector::from(vec![1.0, 0.0, 0.0]);

        let err = DistanceCalculator::default().calculate(&docs, &query, None).unwrap_err();
        assert!(matches!(err, PrismError::DimensionMismatch { expected: 3, actual: 2 }));
    }
}
