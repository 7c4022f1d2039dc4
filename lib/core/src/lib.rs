//! # resumerank Core
//!
//! Core library for the resumerank ranking engine.
//!
//! This crate provides the data model and the vectorization stage:
//!
//! - [`Document`] - A named text (query or candidate)
//! - [`Corpus`] - The query at position 0 followed by every candidate
//! - [`Tokenizer`] - Case- and punctuation-insensitive term splitting
//! - [`TermVector`] - Dense, L2-normalized term-weight vector
//! - [`TermWeightVectorizer`] - Shared vocabulary + smoothed TF-IDF weights
//!
//! ## Example
//!
//! ```rust
//! use resumerank_core::{Corpus, Document, TermWeightVectorizer};
//!
//! let candidates = vec![
//!     Document::new("a.txt", "senior python developer"),
//!     Document::new("b.txt", "graphic designer"),
//! ];
//! let corpus = Corpus::build("senior python engineer", &candidates).unwrap();
//!
//! let matrix = TermWeightVectorizer::default().fit_transform(&corpus.texts()).unwrap();
//! assert_eq!(matrix.rows().len(), 3);
//! ```

pub mod error;
pub mod document;
pub mod tokenizer;
pub mod vector;
pub mod tfidf;
pub mod loader;

pub use error::{Error, ErrorKind, Result};
pub use document::{Corpus, CorpusBuilder, Document};
pub use tokenizer::{Tokenizer, TokenizerConfig};
pub use vector::TermVector;
pub use tfidf::{TermMatrix, TermWeightVectorizer, Vocabulary};
pub use loader::{load_candidates, load_text};
