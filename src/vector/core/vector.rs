//! Core vector data structure.

use serde::{Deserialize, Serialize};

use crate::error::{FolioError, Result};

/// A dense embedding vector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Vector {
    /// The vector components.
    pub data: Vec<f32>,
}

impl Vector {
    /// Create a new vector from its components.
    pub fn new(data: Vec<f32>) -> Self {
        Self { data }
    }

    /// Get the dimensionality of this vector.
    pub fn dimension(&self) -> usize {
        self.data.len()
    }

    /// Calculate the L2 norm (magnitude) of this vector.
    pub fn norm(&self) -> f32 {
        self.data.iter().map(|x| x * x).sum::<f32>().sqrt()
    }

    /// Normalize this vector to unit length. Zero vectors are left as is.
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            for value in &mut self.data {
                *value /= norm;
            }
        }
    }

    /// Get a normalized copy of this vector.
    pub fn normalized(&self) -> Self {
        let mut normalized = self.clone();
        normalized.normalize();
        normalized
    }

    /// Validate that this vector has the expected dimension.
    pub fn validate_dimension(&self, expected_dim: usize) -> Result<()> {
        if self.data.len() != expected_dim {
            return Err(FolioError::dimension_mismatch(expected_dim, self.data.len()));
        }
        Ok(())
    }

    /// Check if this vector contains any NaN or infinite values.
    pub fn is_valid(&self) -> bool {
        self.data.iter().all(|x| x.is_finite())
    }
}

impl From<Vec<f32>> for Vector {
    fn from(data: Vec<f32>) -> Self {
        Vector::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        let mut vector = Vector::new(vec![3.0, 4.0]);
        assert_eq!(vector.norm(), 5.0);

        vector.normalize();
        assert!((vector.data[0] - 0.6).abs() < 1e-6);
        assert!((vector.data[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector_is_left_alone() {
        let vector = Vector::new(vec![0.0, 0.0, 0.0]).normalized();
        assert_eq!(vector.data, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_validate_dimension() {
        let vector = Vector::new(vec![1.0, 2.0]);
        assert!(vector.validate_dimension(2).is_ok());
        assert!(matches!(
            vector.validate_dimension(3),
            Err(FolioError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_is_valid() {
        assert!(Vector::new(vec![1.0, -1.0]).is_valid());
        assert!(!Vector::new(vec![f32::NAN, 0.0]).is_valid());
    }
}
