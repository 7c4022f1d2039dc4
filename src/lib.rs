//! # resumerank
//!
//! Ranks candidate documents against a single query document by textual
//! relevance.
//!
//! Every request builds a fresh corpus (query first, then candidates),
//! weights terms with smoothed TF-IDF, scores candidates by cosine
//! similarity to the query and returns them best-first, each labeled
//! Match or Not Match against a percentage threshold.
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! cargo install resumerank
//! resumerank --query "senior rust engineer" --threshold 25 resumes/*.txt
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use resumerank::prelude::*;
//!
//! let engine = RankingEngine::new(RankerConfig::default()).unwrap();
//! let candidates = vec![
//!     Document::new("c1", "senior python developer"),
//!     Document::new("c2", "senior software engineer with python experience"),
//!     Document::new("c3", "graphic designer"),
//! ];
//!
//! let report = engine.rank("senior software engineer python", &candidates).unwrap();
//! assert_eq!(report.results[0].name, "c2");
//! assert_eq!(report.results[2].label, MatchLabel::NotMatch);
//! ```
//!
//! ## Crate Structure
//!
//! - [`resumerank-core`](https://docs.rs/resumerank-core) - Documents, corpus, tokenizer, TF-IDF vectorizer
//! - [`resumerank-similarity`](https://docs.rs/resumerank-similarity) - Scoring, classifier, aggregation, engine, worker
//!
//! ## Features
//!
//! - **Smoothed TF-IDF**: `ln((1+N)/(1+df)) + 1`, L2-normalized rows
//! - **Deterministic Ranking**: Stable sort, sorted vocabulary, seeded classifier
//! - **Advisory Classifier**: Optional decision tree label shown next to the score
//! - **Background Worker**: Newer requests supersede older ones

// Re-export core types
pub use resumerank_core::{
    Corpus, CorpusBuilder, Document,
    Tokenizer, TokenizerConfig,
    TermVector, TermWeightVectorizer, TermMatrix, Vocabulary,
    load_candidates, load_text,
    Error, ErrorKind, Result,
};

// Re-export the engine
pub use resumerank_similarity::{
    RankingEngine, RankerConfig, Threshold, ClassifierConfig,
    SimilarityScorer, RelevanceClassifier, DecisionTree, Relevance,
    RankingAggregator, RankedResult, MatchLabel, RankingReport,
    CancelToken, RankingWorker, RankingReceiver, RankingOutcome,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        Document, Corpus,
        RankingEngine, RankerConfig, Threshold, ClassifierConfig,
        RankedResult, MatchLabel, Relevance, RankingReport,
        CancelToken, RankingWorker,
        Error, Result,
    };
}
