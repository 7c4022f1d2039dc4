//! Ranking engine
//!
//! One pass per request:
//!
//! ```text
//! Corpus::build -> TermWeightVectorizer -> SimilarityScorer (+ RelevanceClassifier) -> RankingAggregator
//! ```
//!
//! Nothing survives between requests: every call builds its own corpus,
//! vocabulary and (if enabled) classifier. A [`CancelToken`] is checked
//! between stages.

use resumerank_core::{Corpus, Document, Error, Result, TermVector, TermWeightVectorizer};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::aggregator::RankingAggregator;
use crate::classifier::{Relevance, RelevanceClassifier};
use crate::config::RankerConfig;
use crate::report::RankingReport;
use crate::scorer::SimilarityScorer;

/// Cooperative cancellation flag shared between a caller and a running ranking
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }

    /// `Err(Error::Cancelled)` once cancelled
    #[inline]
    pub fn check(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Points between pipeline stages where a ranking can stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    CorpusBuilt,
    Vectorized,
    Scored,
    Classified,
}

#[derive(Debug, Clone)]
pub struct RankingEngine {
    config: RankerConfig,
    vectorizer: TermWeightVectorizer,
    scorer: SimilarityScorer,
    classifier: Option<RelevanceClassifier>,
    aggregator: RankingAggregator,
}

impl RankingEngine {
    pub fn new(config: RankerConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            vectorizer: TermWeightVectorizer::new(config.tokenizer),
            scorer: SimilarityScorer::new(),
            classifier: config.classifier.map(RelevanceClassifier::new),
            aggregator: RankingAggregator::new(config.threshold),
            config,
        })
    }

    #[inline]
    pub fn config(&self) -> &RankerConfig {
        &self.config
    }

    pub fn rank(&self, query: &str, candidates: &[Document]) -> Result<RankingReport> {
        self.rank_with_cancel(query, candidates, &CancelToken::new())
    }

    pub fn rank_with_cancel(
        &self,
        query: &str,
        candidates: &[Document],
        cancel: &CancelToken,
    ) -> Result<RankingReport> {
        self.run(query, candidates, cancel, |_| {})
    }

    /// The pipeline itself; `on_stage` runs at every stage boundary, just
    /// before the cancel token is checked.
    fn run<F>(
        &self,
        query: &str,
        candidates: &[Document],
        cancel: &CancelToken,
        mut on_stage: F,
    ) -> Result<RankingReport>
    where
        F: FnMut(Stage),
    {
        let mut boundary = |stage: Stage| {
            on_stage(stage);
            cancel.check()
        };

        cancel.check()?;
        let corpus = Corpus::build(query, candidates)?;
        debug!(candidates = corpus.candidates().len(), "Corpus built");
        boundary(Stage::CorpusBuilt)?;

        let matrix = self.vectorizer.fit_transform(&corpus.texts())?;
        let vocabulary_size = matrix.dim();
        boundary(Stage::Vectorized)?;

        let rows = matrix.rows();
        let (query_row, candidate_rows) = rows
            .split_first()
            .ok_or_else(|| Error::Computation("vectorizer returned no rows".to_string()))?;
        let scores = self.scorer.score(query_row, candidate_rows)?;
        boundary(Stage::Scored)?;

        let advisory = match &self.classifier {
            Some(classifier) => {
                let labels = self.classify(classifier, rows, cancel)?;
                boundary(Stage::Classified)?;
                Some(labels)
            }
            None => None,
        };

        let results = self
            .aggregator
            .aggregate(corpus.candidate_names(), &scores, advisory.as_deref())?;

        let report = RankingReport::new(results, vocabulary_size, self.config.threshold.percent());
        info!(
            candidates = report.candidate_count,
            matches = report.match_count(),
            vocabulary = vocabulary_size,
            "Ranking complete"
        );

        Ok(report)
    }

    /// Train on every row (query positive, candidates negative) and label the candidates
    fn classify(
        &self,
        classifier: &RelevanceClassifier,
        rows: &[TermVector],
        cancel: &CancelToken,
    ) -> Result<Vec<Relevance>> {
        let mut labels = vec![Relevance::NotRelevant; rows.len()];
        labels[0] = Relevance::Relevant;

        let model = classifier.train(rows, &labels)?;
        debug!(
            nodes = model.node_count(),
            seed = classifier.config().seed,
            "Advisory classifier trained on one positive row"
        );

        cancel.check()?;
        classifier.predict(&model, &rows[1..])
    }
}

impl Default for RankingEngine {
    fn default() -> Self {
        Self {
            vectorizer: TermWeightVectorizer::default(),
            scorer: SimilarityScorer::new(),
            classifier: None,
            aggregator: RankingAggregator::default(),
            config: RankerConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::MatchLabel;
    use crate::config::{ClassifierConfig, Threshold};

    fn docs(texts: &[(&str, &str)]) -> Vec<Document> {
        texts.iter().map(|(n, t)| Document::new(*n, *t)).collect()
    }

    fn job_candidates() -> Vec<Document> {
        docs(&[
            ("c1", "senior python developer"),
            ("c2", "senior software engineer with python experience"),
            ("c3", "graphic designer"),
        ])
    }

    #[test]
    fn test_job_posting_example() {
        let engine = RankingEngine::default();
        let report = engine
            .rank("senior software engineer python", &job_candidates())
            .unwrap();

        let order: Vec<&str> = report.results.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(order, vec!["c2", "c1", "c3"]);
        assert_eq!(report.results[0].label, MatchLabel::Match);
        assert_eq!(report.results[1].label, MatchLabel::Match);
        assert_eq!(report.results[2].label, MatchLabel::NotMatch);
        assert!(report.results[2].score.abs() < 1e-9);
        assert!(report.results[0].advisory.is_none());
    }

    #[test]
    fn test_identical_candidate_scores_one() {
        let report = RankingEngine::default()
            .rank("rust systems programming", &docs(&[("same", "rust systems programming")]))
            .unwrap();
        assert!((report.results[0].score - 1.0).abs() < 1e-9);
        assert_eq!(report.results[0].percent, 100.0);
    }

    #[test]
    fn test_empty_candidate_scores_zero() {
        let report = RankingEngine::default()
            .rank("rust", &docs(&[("empty", ""), ("rusty", "rust rust")]))
            .unwrap();
        let empty = report.results.iter().find(|r| r.name == "empty").unwrap();
        assert_eq!(empty.score, 0.0);
        assert_eq!(empty.label, MatchLabel::NotMatch);
        assert_eq!(report.results.last().map(|r| r.name.as_str()), Some("empty"));
    }

    #[test]
    fn test_classifier_adds_advisory_labels() {
        let config = RankerConfig::default().with_classifier(ClassifierConfig::with_seed(42));
        let engine = RankingEngine::new(config).unwrap();
        let report = engine
            .rank("senior software engineer python", &job_candidates())
            .unwrap();

        assert!(report.results.iter().all(|r| r.advisory.is_some()));
        // one positive against many negatives: the tree falls back to the majority class
        assert!(report
            .results
            .iter()
            .all(|r| r.advisory == Some(Relevance::NotRelevant)));
    }

    #[test]
    fn test_classifier_does_not_change_scores() {
        let plain = RankingEngine::default()
            .rank("senior software engineer python", &job_candidates())
            .unwrap();
        let with_classifier = RankingEngine::new(
            RankerConfig::default().with_classifier(ClassifierConfig::default()),
        )
        .unwrap()
        .rank("senior software engineer python", &job_candidates())
        .unwrap();

        for (a, b) in plain.results.iter().zip(&with_classifier.results) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.score, b.score);
        }
    }

    #[test]
    fn test_errors() {
        let engine = RankingEngine::default();
        assert!(matches!(engine.rank("query", &[]), Err(Error::NoCandidates)));
        assert!(matches!(
            engine.rank("  ", &job_candidates()),
            Err(Error::Validation(_))
        ));
        // only single-character tokens anywhere: empty vocabulary
        assert!(matches!(
            engine.rank("a b", &docs(&[("x", "c"), ("y", "")])),
            Err(Error::EmptyCorpus(_))
        ));
    }

    #[test]
    fn test_cancelled_before_start() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let err = RankingEngine::default()
            .rank_with_cancel("python", &job_candidates(), &cancel)
            .unwrap_err();
        assert!(matches!(err, Error::Cancelled));
    }

    fn classifying_engine() -> RankingEngine {
        RankingEngine::new(RankerConfig::default().with_classifier(ClassifierConfig::with_seed(1)))
            .unwrap()
    }

    #[test]
    fn test_cancel_between_stages() {
        let engine = classifying_engine();
        for stop_at in [Stage::CorpusBuilt, Stage::Vectorized, Stage::Scored, Stage::Classified] {
            let cancel = CancelToken::new();
            let mut seen = Vec::new();
            let result = engine.run("python", &job_candidates(), &cancel, |stage| {
                seen.push(stage);
                if stage == stop_at {
                    cancel.cancel();
                }
            });

            assert!(matches!(result, Err(Error::Cancelled)), "stage {:?}", stop_at);
            assert_eq!(seen.last(), Some(&stop_at));
        }
    }

    #[test]
    fn test_all_stages_visited_in_order() {
        let mut seen = Vec::new();
        classifying_engine()
            .run("python", &job_candidates(), &CancelToken::new(), |stage| seen.push(stage))
            .unwrap();
        assert_eq!(
            seen,
            vec![Stage::CorpusBuilt, Stage::Vectorized, Stage::Scored, Stage::Classified]
        );

        let mut seen = Vec::new();
        RankingEngine::default()
            .run("python", &job_candidates(), &CancelToken::new(), |stage| seen.push(stage))
            .unwrap();
        assert_eq!(seen, vec![Stage::CorpusBuilt, Stage::Vectorized, Stage::Scored]);
    }

    #[test]
    fn test_threshold_from_config() {
        let config = RankerConfig::default().with_threshold(Threshold::from_percent(80.0).unwrap());
        let report = RankingEngine::new(config)
            .unwrap()
            .rank("senior software engineer python", &job_candidates())
            .unwrap();
        assert_eq!(report.match_count(), 0);
        assert_eq!(report.threshold_percent, 80.0);
    }
}
