use ndarray::{Array1, ArrayView1};
use serde::{Serialize, Deserialize};

/// An embedding: an immutable, ordered sequence of `f32`.
///
/// Backed by `ndarray::Array1<f32>` so distance computations can use
/// vectorised dot products. Only shared access is exposed; build a new
/// `Vector` to change values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<f32>", into = "Vec<f32>")]
pub struct Vector(Array1<f32>);

impl Vector {
    pub fn new(values: Vec<f32>) -> Self {
        Vector(Array1::from(values))
    }

    /// Number of components.
    pub fn dimensions(&self) -> usize {
        self.0.len()
    }

    pub fn view(&self) -> ArrayView1<'_, f32> {
        self.0.view()
    }

    pub fn as_slice(&self) -> &[f32] {
        // Array1::from(Vec) is always contiguous in standard layout.
        self.0.as_slice().unwrap_or(&[])
    }

    pub fn to_vec(&self) -> Vec<f32> {
        self.0.to_vec()
    }

    /// True when no component is NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.0.iter().all(|v| v.is_finite())
    }
}

// Deref only to the immutable array so `Vector` stays read-only
impl std::ops::Deref for Vector {
    type Target = Array1<f32>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<f32>> for Vector {
    fn from(vec: Vec<f32>) -> Self {
        Vector::new(vec)
    }
}

impl From<&[f32]> for Vector {
    fn from(values: &[f32]) -> Self {
        Vector::new(values.to_vec())
    }
}

impl From<Array1<f32>> for Vector {
    fn from(array: Array1<f32>) -> Self {
        Vector(array)
    }
}

impl From<Vector> for Vec<f32> {
    fn from(vector: Vector) -> Self {
        vector.0.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_match_length() {
        let v = Vector::from(vec![0.1, 0.2, 0.3]);
        assert_eq!(v.dimensions(), 3);
        assert_eq!(v.as_slice(), &[0.1, 0.2, 0.3]);
        assert_eq!(Vector::new(vec![]).dimensions(), 0);
    }

    #[test]
    fn test_is_finite() {
        assert!(Vector::from(vec![0.0, -1.5, f32::MAX]).is_finite());
        assert!(Vector::new(vec![]).is_finite());
        assert!(!Vector::from(vec![1.0, f32::NAN]).is_finite());
        assert!(!Vector::from(vec![f32::NEG_INFINITY]).is_finite());
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let v = Vector::from(vec![1.0, -2.5]);
        let json = serde_json::to_string(&v).unwrap();
        assert_eq!(json, "[1.0,-2.5]");

        let back: Vector = serde_json::from_str(&json).unwrap();
        assert_eq!(back, v);
    }
}
