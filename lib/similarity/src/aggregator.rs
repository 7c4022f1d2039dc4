//! Result aggregation
//!
//! Merges candidate names, similarity scores and optional advisory labels
//! into [`RankedResult`]s, applies the match threshold and sorts.

use ordered_float::OrderedFloat;
use resumerank_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::fmt;

use crate::classifier::Relevance;
use crate::config::Threshold;

/// Whether a candidate cleared the match threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchLabel {
    Match,
    NotMatch,
}

impl fmt::Display for MatchLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchLabel::Match => write!(f, "Match"),
            MatchLabel::NotMatch => write!(f, "Not Match"),
        }
    }
}

/// One ranked candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedResult {
    pub name: String,
    /// Cosine similarity to the query
    pub score: f64,
    /// `score * 100`, rounded to two decimals
    pub percent: f64,
    pub label: MatchLabel,
    /// Classifier hint, present only when the classifier ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub advisory: Option<Relevance>,
}

/// Round `score * 100` to two decimals, exact halves to even
#[inline]
pub fn to_percent(score: f64) -> f64 {
    let scaled = score * 100.0 * 100.0;
    let mut rounded = scaled.round();
    if (rounded - scaled).abs() == 0.5 && rounded % 2.0 != 0.0 {
        rounded -= scaled.signum();
    }
    rounded / 100.0
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RankingAggregator {
    threshold: Threshold,
}

impl RankingAggregator {
    pub fn new(threshold: Threshold) -> Self {
        Self { threshold }
    }

    #[inline]
    pub fn threshold(&self) -> Threshold {
        self.threshold
    }

    /// Label for a single score; the threshold itself counts as a match
    #[inline]
    pub fn label(&self, score: f64) -> MatchLabel {
        if score >= self.threshold.fraction() {
            MatchLabel::Match
        } else {
            MatchLabel::NotMatch
        }
    }

    /// Build the full ranking, best score first.
    ///
    /// `names`, `scores` and `advisory` are parallel sequences in candidate
    /// order. Equal scores keep that order.
    pub fn aggregate(
        &self,
        names: Vec<String>,
        scores: &[f64],
        advisory: Option<&[Relevance]>,
    ) -> Result<Vec<RankedResult>> {
        if names.len() != scores.len() {
            return Err(Error::Computation(format!(
                "{} candidate names but {} scores",
                names.len(),
                scores.len()
            )));
        }
        if let Some(labels) = advisory {
            if labels.len() != scores.len() {
                return Err(Error::Computation(format!(
                    "{} advisory labels for {} candidates",
                    labels.len(),
                    scores.len()
                )));
            }
        }

        let mut results: Vec<RankedResult> = names
            .into_iter()
            .zip(scores.iter().copied())
            .enumerate()
            .map(|(i, (name, score))| RankedResult {
                name,
                score,
                percent: to_percent(score),
                label: self.label(score),
                advisory: advisory.map(|labels| labels[i]),
            })
            .collect();

        // sort_by_key is stable
        results.sort_by_key(|r| Reverse(OrderedFloat(r.score)));

        Ok(results)
    }
}
