//! # resumerank Similarity
//!
//! The ranking engine: scores candidate documents against a query by
//! TF-IDF cosine similarity and returns them best-first with match labels.
//!
//! ## Features
//!
//! - **Cosine Scoring**: Dot product of unit-length TF-IDF vectors
//! - **Match Threshold**: Inclusive percentage threshold, default 20%
//! - **Advisory Classifier**: Optional seeded decision tree, shown as a hint only
//! - **Background Worker**: Off-thread ranking with supersede-on-submit semantics
//!
//! ## Example
//!
//! ```rust
//! use resumerank_similarity::{RankingEngine, RankerConfig, Threshold};
//! use resumerank_core::Document;
//!
//! let config = RankerConfig::default().with_threshold(Threshold::from_percent(20.0).unwrap());
//! let engine = RankingEngine::new(config).unwrap();
//!
//! let candidates = vec![
//!     Document::new("alice.txt", "senior python developer"),
//!     Document::new("bob.txt", "graphic designer"),
//! ];
//! let report = engine.rank("senior python engineer", &candidates).unwrap();
//!
//! for line in report.display_lines() {
//!     println!("{}", line);
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │   Corpus    │────>│  Vectorizer │────>│   Scorer    │
//! │ (query+docs)│     │  (TF-IDF)   │     │  (cosine)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!                            │                   │
//!                     ┌─────────────┐            │
//!                     │ Classifier  │            │
//!                     │ (optional)  │            │
//!                     └─────────────┘            │
//!                            │                   │
//!                            └──────>┌─────────────┐
//!                                    │ Aggregator  │
//!                                    │ (sort+label)│
//!                                    └─────────────┘
//! ```

pub mod config;
pub mod scorer;
pub mod classifier;
pub mod aggregator;
pub mod report;
pub mod engine;
pub mod background;

// Re-export main types for convenience
pub use config::{ClassifierConfig, RankerConfig, Threshold, DEFAULT_THRESHOLD_PERCENT};
pub use scorer::SimilarityScorer;
pub use classifier::{DecisionTree, Relevance, RelevanceClassifier};
pub use aggregator::{MatchLabel, RankedResult, RankingAggregator};
pub use report::RankingReport;
pub use engine::{CancelToken, RankingEngine};
pub use background::{RankingOutcome, RankingReceiver, RankingWorker};
