//! TF-IDF vectorization
//!
//! Builds a vocabulary from every document of a corpus and turns each
//! document into a dense, L2-normalized [`TermVector`]:
//!
//! ```text
//! weight(term, doc) = count(term, doc) * idf(term)
//! idf(term)         = ln((1 + N) / (1 + df(term))) + 1
//! ```
//!
//! The smoothed idf is never zero, so a term shared by every document
//! still contributes.

use ahash::AHashMap;
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

use crate::tokenizer::{Tokenizer, TokenizerConfig};
use crate::vector::TermVector;
use crate::{Error, Result};

/// Terms of one corpus in sorted order, with their idf weights
#[derive(Debug, Clone, Default)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: AHashMap<String, usize>,
    document_frequency: Vec<usize>,
    idf: Vec<f64>,
}

impl Vocabulary {
    fn from_document_frequencies(df: BTreeMap<String, usize>, n_documents: usize) -> Self {
        let n = n_documents as f64;
        let mut vocabulary = Self::default();

        for (idx, (term, freq)) in df.into_iter().enumerate() {
            vocabulary.idf.push(smoothed_idf(n, freq as f64));
            vocabulary.document_frequency.push(freq);
            vocabulary.index.insert(term.clone(), idx);
            vocabulary.terms.push(term);
        }

        vocabulary
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.index.get(term).copied()
    }

    #[inline]
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    #[inline]
    pub fn idf(&self, index: usize) -> Option<f64> {
        self.idf.get(index).copied()
    }

    #[inline]
    pub fn document_frequency(&self, index: usize) -> Option<usize> {
        self.document_frequency.get(index).copied()
    }
}

#[inline]
fn smoothed_idf(n_documents: f64, df: f64) -> f64 {
    ((1.0 + n_documents) / (1.0 + df)).ln() + 1.0
}

/// Vectorizer output: the shared vocabulary plus one row per input text
#[derive(Debug, Clone)]
pub struct TermMatrix {
    vocabulary: Vocabulary,
    rows: Vec<TermVector>,
}

impl TermMatrix {
    #[inline]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[inline]
    pub fn rows(&self) -> &[TermVector] {
        &self.rows
    }

    /// Number of columns (vocabulary size)
    #[inline]
    pub fn dim(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn into_rows(self) -> Vec<TermVector> {
        self.rows
    }
}

#[derive(Debug, Clone, Default)]
pub struct TermWeightVectorizer {
    tokenizer: Tokenizer,
}

impl TermWeightVectorizer {
    pub fn new(config: TokenizerConfig) -> Self {
        Self {
            tokenizer: Tokenizer::new(config),
        }
    }

    #[inline]
    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    /// Fit a vocabulary on `texts` and vectorize every one of them.
    ///
    /// Rows come back in input order. A text without any term becomes the
    /// exact zero vector. Fails with [`Error::EmptyCorpus`] when there are
    /// no texts or no text has a single term.
    pub fn fit_transform(&self, texts: &[&str]) -> Result<TermMatrix> {
        if texts.is_empty() {
            return Err(Error::EmptyCorpus("no documents to vectorize".to_string()));
        }

        let counts: Vec<AHashMap<String, u32>> = texts
            .par_iter()
            .map(|text| self.tokenizer.term_counts(text))
            .collect();

        let mut df: BTreeMap<String, usize> = BTreeMap::new();
        for doc_counts in &counts {
            for term in doc_counts.keys() {
                *df.entry(term.clone()).or_insert(0) += 1;
            }
        }

        if df.is_empty() {
            return Err(Error::EmptyCorpus(
                "no document contains a recognized term".to_string(),
            ));
        }

        let vocabulary = Vocabulary::from_document_frequencies(df, texts.len());
        debug!(
            documents = texts.len(),
            vocabulary = vocabulary.len(),
            "Built vocabulary"
        );

        let rows: Vec<TermVector> = counts
            .par_iter()
            .map(|doc_counts| weigh(&vocabulary, doc_counts))
            .collect();

        Ok(TermMatrix { vocabulary, rows })
    }
}

fn weigh(vocabulary: &Vocabulary, counts: &AHashMap<String, u32>) -> TermVector {
    let mut data = vec![0.0; vocabulary.len()];
    for (term, &count) in counts {
        if let Some(idx) = vocabulary.index_of(term) {
            data[idx] = f64::from(count) * vocabulary.idf[idx];
        }
    }

    let mut vector = TermVector::new(data);
    vector.normalize();
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabulary_sorted_and_shared() {
        let matrix = TermWeightVectorizer::default()
            .fit_transform(&["zeta alpha", "beta alpha", ""])
            .unwrap();

        assert_eq!(matrix.vocabulary().terms(), &["alpha", "beta", "zeta"]);
        assert!(matrix.rows().iter().all(|r| r.dim() == 3));
    }

    #[test]
    fn test_smoothed_idf_values() {
        let matrix = TermWeightVectorizer::default()
            .fit_transform(&["common rare", "common"])
            .unwrap();
        let vocab = matrix.vocabulary();

        let common = vocab.index_of("common").unwrap();
        let rare = vocab.index_of("rare").unwrap();
        assert_eq!(vocab.document_frequency(common), Some(2));
        assert!((vocab.idf(common).unwrap() - 1.0).abs() < 1e-12);
        assert!((vocab.idf(rare).unwrap() - ((3.0f64 / 2.0).ln() + 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rows_unit_length_or_zero() {
        let matrix = TermWeightVectorizer::default()
            .fit_transform(&["rust rust systems", "", "systems programming", "!!!"])
            .unwrap();

        for row in matrix.rows() {
            if row.is_zero() {
                continue;
            }
            assert!((row.norm() - 1.0).abs() < 1e-6, "norm was {}", row.norm());
        }
        assert!(matrix.rows()[1].is_zero());
        assert!(matrix.rows()[3].is_zero());
    }

    #[test]
    fn test_raw_counts_weighted() {
        let matrix = TermWeightVectorizer::default()
            .fit_transform(&["go go rust"])
            .unwrap();
        let vocab = matrix.vocabulary();
        let row = &matrix.rows()[0];
        let go = row.get(vocab.index_of("go").unwrap()).unwrap();
        let rust = row.get(vocab.index_of("rust").unwrap()).unwrap();
        // same idf, so the ratio is the raw count ratio
        assert!((go / rust - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_no_documents() {
        let err = TermWeightVectorizer::default().fit_transform(&[]).unwrap_err();
        assert!(matches!(err, Error::EmptyCorpus(_)));
    }

    #[test]
    fn test_no_terms_anywhere() {
        let err = TermWeightVectorizer::default()
            .fit_transform(&["", "  ", "- ! ."])
            .unwrap_err();
        assert!(matches!(err, Error::EmptyCorpus(_)));
    }
}
