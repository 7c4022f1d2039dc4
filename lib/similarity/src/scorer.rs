//! Query-vs-candidate similarity scoring
//!
//! Rows coming out of the vectorizer are already unit length, so cosine
//! similarity reduces to a dot product. A zero vector on either side
//! (a document without terms) scores 0.

use resumerank_core::{Result, TermVector};

#[derive(Debug, Clone, Copy, Default)]
pub struct SimilarityScorer;

impl SimilarityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Similarity of one pre-normalized candidate to the query
    #[inline]
    pub fn score_one(&self, query: &TermVector, candidate: &TermVector) -> Result<f64> {
        let dot = query.dot(candidate)?;
        if query.is_zero() || candidate.is_zero() {
            return Ok(0.0);
        }
        Ok(dot)
    }

    /// One score per candidate, in candidate order
    pub fn score(&self, query: &TermVector, candidates: &[TermVector]) -> Result<Vec<f64>> {
        candidates
            .iter()
            .map(|candidate| self.score_one(query, candidate))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resumerank_core::Error;

    #[test]
    fn test_scores_in_candidate_order() {
        let query = TermVector::new(vec![1.0, 0.0]);
        let candidates = vec![
            TermVector::new(vec![0.0, 1.0]),
            TermVector::new(vec![1.0, 0.0]),
            TermVector::new(vec![0.6, 0.8]),
        ];

        let scores = SimilarityScorer::new().score(&query, &candidates).unwrap();
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[0], 0.0);
        assert_eq!(scores[1], 1.0);
        assert!((scores[2] - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_zero_vectors_score_zero() {
        let scorer = SimilarityScorer::new();
        let zero = TermVector::zeros(2);
        let unit = TermVector::new(vec![1.0, 0.0]);

        assert_eq!(scorer.score_one(&zero, &unit).unwrap(), 0.0);
        assert_eq!(scorer.score_one(&unit, &zero).unwrap(), 0.0);
        assert_eq!(scorer.score_one(&zero, &zero).unwrap(), 0.0);
    }

    #[test]
    fn test_dimension_mismatch_fails() {
        let err = SimilarityScorer::new()
            .score(&TermVector::zeros(2), &[TermVector::zeros(3)])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { .. }));
    }
}
