//! Advisory relevance classifier
//!
//! A CART decision tree (Gini impurity, axis-aligned threshold splits)
//! trained per request on the TF-IDF rows of the corpus. The engine labels
//! the query row [`Relevance::Relevant`] and every candidate row
//! [`Relevance::NotRelevant`], so the tree mostly learns to tell the query
//! apart from everything else. Its predictions are a heuristic hint shown
//! next to the similarity score, not a judgment of relevance.
//!
//! Features are visited in a seeded random order and the first strictly
//! best split wins, so the seed decides ties and a fixed seed gives a
//! reproducible tree.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use resumerank_core::{Error, Result, TermVector};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ClassifierConfig;

/// Values closer than this are treated as equal when looking for split points
const FEATURE_THRESHOLD: f64 = 1e-7;

/// Advisory label predicted for a candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Relevance {
    Relevant,
    NotRelevant,
}

impl fmt::Display for Relevance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Relevance::Relevant => write!(f, "Relevant"),
            Relevance::NotRelevant => write!(f, "Not Relevant"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Leaf {
        label: Relevance,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

/// A trained tree. Rows go left when `row[feature] <= threshold`.
#[derive(Debug, Clone)]
pub struct DecisionTree {
    n_features: usize,
    nodes: Vec<Node>,
}

impl DecisionTree {
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn leaf_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    pub fn predict_one(&self, row: &TermVector) -> Result<Relevance> {
        if row.dim() != self.n_features {
            return Err(Error::InvalidDimension {
                expected: self.n_features,
                actual: row.dim(),
            });
        }

        let values = row.as_slice();
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { label } => return Ok(*label),
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if values[*feature] <= *threshold { *left } else { *right };
                }
            }
        }
    }

    /// One label per row, in row order
    pub fn predict(&self, rows: &[TermVector]) -> Result<Vec<Relevance>> {
        rows.iter().map(|row| self.predict_one(row)).collect()
    }
}

/// Trains fresh [`DecisionTree`]s; holds no state between calls
#[derive(Debug, Clone, Copy, Default)]
pub struct RelevanceClassifier {
    config: ClassifierConfig,
}

impl RelevanceClassifier {
    pub fn new(config: ClassifierConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Fit a tree to `features` (one row per document) and their labels
    pub fn train(&self, features: &[TermVector], labels: &[Relevance]) -> Result<DecisionTree> {
        let Some(first) = features.first() else {
            return Err(Error::Computation("classifier needs at least one training row".to_string()));
        };
        if features.len() != labels.len() {
            return Err(Error::Computation(format!(
                "classifier got {} rows but {} labels",
                features.len(),
                labels.len()
            )));
        }

        let n_features = first.dim();
        if let Some(bad) = features.iter().find(|row| row.dim() != n_features) {
            return Err(Error::InvalidDimension {
                expected: n_features,
                actual: bad.dim(),
            });
        }

        let mut builder = TreeBuilder {
            rows: features,
            labels,
            config: &self.config,
            n_features,
            rng: StdRng::seed_from_u64(self.config.seed),
            nodes: Vec::new(),
        };
        builder.grow((0..features.len()).collect(), 0);

        Ok(DecisionTree {
            n_features,
            nodes: builder.nodes,
        })
    }

    pub fn predict(&self, model: &DecisionTree, features: &[TermVector]) -> Result<Vec<Relevance>> {
        model.predict(features)
    }
}

struct TreeBuilder<'a> {
    rows: &'a [TermVector],
    labels: &'a [Relevance],
    config: &'a ClassifierConfig,
    n_features: usize,
    rng: StdRng,
    nodes: Vec<Node>,
}

struct SplitCandidate {
    impurity: f64,
    feature: usize,
    threshold: f64,
}

impl TreeBuilder<'_> {
    /// Grow the subtree for `samples` and return its node index
    fn grow(&mut self, samples: Vec<usize>, depth: usize) -> usize {
        let positives = samples
            .iter()
            .filter(|&&i| self.labels[i] == Relevance::Relevant)
            .count();
        let negatives = samples.len() - positives;

        // Ties go to NotRelevant
        let label = if positives > negatives {
            Relevance::Relevant
        } else {
            Relevance::NotRelevant
        };

        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf { label });

        let pure = positives == 0 || negatives == 0;
        let too_small = samples.len() < self.config.min_samples_split;
        let too_deep = self.config.max_depth.is_some_and(|max| depth >= max);
        if pure || too_small || too_deep {
            return idx;
        }

        let Some(split) = self.best_split(&samples) else {
            return idx;
        };

        let (left, right): (Vec<usize>, Vec<usize>) = samples
            .into_iter()
            .partition(|&i| self.rows[i].as_slice()[split.feature] <= split.threshold);

        let left = self.grow(left, depth + 1);
        let right = self.grow(right, depth + 1);
        self.nodes[idx] = Node::Split {
            feature: split.feature,
            threshold: split.threshold,
            left,
            right,
        };

        idx
    }

    fn best_split(&mut self, samples: &[usize]) -> Option<SplitCandidate> {
        let mut features: Vec<usize> = (0..self.n_features).collect();
        features.shuffle(&mut self.rng);

        let n = samples.len();
        let total_pos = samples
            .iter()
            .filter(|&&i| self.labels[i] == Relevance::Relevant)
            .count();

        let mut best: Option<SplitCandidate> = None;
        let mut values: Vec<(f64, bool)> = Vec::with_capacity(n);

        for feature in features {
            values.clear();
            values.extend(samples.iter().map(|&i| {
                (
                    self.rows[i].as_slice()[feature],
                    self.labels[i] == Relevance::Relevant,
                )
            }));
            values.sort_by(|a, b| a.0.total_cmp(&b.0));

            if values[n - 1].0 <= values[0].0 + FEATURE_THRESHOLD {
                continue;
            }

            let mut left_pos = 0;
            for i in 0..n - 1 {
                if values[i].1 {
                    left_pos += 1;
                }
                if values[i + 1].0 <= values[i].0 + FEATURE_THRESHOLD {
                    continue;
                }

                let left_n = i + 1;
                let impurity = weighted_gini(left_pos, left_n, total_pos - left_pos, n - left_n);
                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    let mut threshold = (values[i].0 + values[i + 1].0) / 2.0;
                    if threshold >= values[i + 1].0 {
                        threshold = values[i].0;
                    }
                    best = Some(SplitCandidate {
                        impurity,
                        feature,
                        threshold,
                    });
                }
            }
        }

        best
    }
}

#[inline]
fn gini(positives: usize, n: usize) -> f64 {
    if n == 0 {
        return 0.0;
    }
    let p = positives as f64 / n as f64;
    1.0 - p * p - (1.0 - p) * (1.0 - p)
}

#[inline]
fn weighted_gini(left_pos: usize, left_n: usize, right_pos: usize, right_n: usize) -> f64 {
    let total = (left_n + right_n) as f64;
    (left_n as f64 / total) * gini(left_pos, left_n)
        + (right_n as f64 / total) * gini(right_pos, right_n)
}
