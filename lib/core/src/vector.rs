use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Dense term-weight vector, one dimension per vocabulary term
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TermVector {
    data: Vec<f64>,
}

impl TermVector {
    #[inline]
    #[must_use]
    pub fn new(data: Vec<f64>) -> Self {
        Self { data }
    }

    #[inline]
    #[must_use]
    pub fn zeros(dim: usize) -> Self {
        Self {
            data: vec![0.0; dim],
        }
    }

    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.data.len()
    }

    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<f64> {
        self.data.get(index).copied()
    }

    /// True when every weight is exactly zero
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|&x| x == 0.0)
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|x| x * x).sum::<f64>().sqrt()
    }

    /// Dot product; fails when the dimensions differ
    pub fn dot(&self, other: &TermVector) -> Result<f64> {
        if self.dim() != other.dim() {
            return Err(Error::InvalidDimension {
                expected: self.dim(),
                actual: other.dim(),
            });
        }

        Ok(dot_product(&self.data, &other.data))
    }

    /// Cosine similarity. Zero vectors score 0 against anything.
    pub fn cosine_similarity(&self, other: &TermVector) -> Result<f64> {
        let dot = self.dot(other)?;
        let norm_a = self.norm();
        let norm_b = other.norm();

        if norm_a == 0.0 || norm_b == 0.0 {
            return Ok(0.0);
        }

        Ok(dot / (norm_a * norm_b))
    }

    /// Normalize the vector to unit length.
    /// The zero vector is left untouched.
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            let inv_norm = 1.0 / norm;
            for x in &mut self.data {
                *x *= inv_norm;
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn normalized(&self) -> Self {
        let mut v = self.clone();
        v.normalize();
        v
    }
}

/// Plain dot product over equal-length slices.
/// Two accumulators keep the loop pipelined on long vocabularies.
#[inline]
pub fn dot_product(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());

    let mut sum0 = 0.0;
    let mut sum1 = 0.0;
    let chunks = a.len() / 2;

    for i in 0..chunks {
        sum0 += a[2 * i] * b[2 * i];
        sum1 += a[2 * i + 1] * b[2 * i + 1];
    }
    if a.len() % 2 == 1 {
        sum0 += a[a.len() - 1] * b[b.len() - 1];
    }

    sum0 + sum1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity() {
        let v1 = TermVector::new(vec![1.0, 0.0]);
        let v2 = TermVector::new(vec![1.0, 0.0]);
        assert!((v1.cosine_similarity(&v2).unwrap() - 1.0).abs() < 1e-9);

        let v3 = TermVector::new(vec![1.0, 0.0]);
        let v4 = TermVector::new(vec![0.0, 1.0]);
        assert!(v3.cosine_similarity(&v4).unwrap().abs() < 1e-9);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let zero = TermVector::zeros(3);
        let v = TermVector::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(zero.cosine_similarity(&v).unwrap(), 0.0);
        assert_eq!(v.cosine_similarity(&zero).unwrap(), 0.0);
    }

    #[test]
    fn test_normalize_unit_length() {
        let v = TermVector::new(vec![3.0, 4.0, 0.0]).normalized();
        assert!((v.norm() - 1.0).abs() < 1e-12);
        assert!((v.as_slice()[0] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_normalize_zero_vector_untouched() {
        let v = TermVector::zeros(4).normalized();
        assert!(v.is_zero());
        assert!(v.as_slice().iter().all(|x| !x.is_nan()));
    }

    #[test]
    fn test_dimension_mismatch() {
        let a = TermVector::zeros(2);
        let b = TermVector::zeros(3);
        assert!(matches!(
            a.dot(&b),
            Err(Error::InvalidDimension { expected: 2, actual: 3 })
        ));
    }

    #[test]
    fn test_dot_product_odd_length() {
        assert_eq!(dot_product(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
    }
}
