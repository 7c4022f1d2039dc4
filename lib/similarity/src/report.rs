//! Ranking output
//!
//! Presentation-ready views of a completed ranking: numbered text lines
//! and a name/percent series for bar charts.

use serde::Serialize;

use crate::aggregator::{MatchLabel, RankedResult};

/// A completed ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankingReport {
    /// Best score first
    pub results: Vec<RankedResult>,
    pub candidate_count: usize,
    pub vocabulary_size: usize,
    pub threshold_percent: f64,
}

impl RankingReport {
    pub fn new(results: Vec<RankedResult>, vocabulary_size: usize, threshold_percent: f64) -> Self {
        Self {
            candidate_count: results.len(),
            results,
            vocabulary_size,
            threshold_percent,
        }
    }

    /// `<rank>. <name> - Score: <percent>% - <label>`, rank starting at 1
    pub fn display_lines(&self) -> Vec<String> {
        self.results
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let mut line = format!(
                    "{}. {} - Score: {:.2}% - {}",
                    i + 1,
                    r.name,
                    r.percent,
                    r.label
                );
                if let Some(advisory) = r.advisory {
                    line.push_str(&format!(" (advisory: {})", advisory));
                }
                line
            })
            .collect()
    }

    /// `(name, percent)` pairs in ascending score order, so a horizontal
    /// bar chart drawn bottom-up shows the best candidate on top
    pub fn chart_series(&self) -> Vec<(String, f64)> {
        self.results
            .iter()
            .rev()
            .map(|r| (r.name.clone(), r.percent))
            .collect()
    }

    pub fn matches(&self) -> impl Iterator<Item = &RankedResult> {
        self.results.iter().filter(|r| r.label == MatchLabel::Match)
    }

    pub fn match_count(&self) -> usize {
        self.matches().count()
    }

    pub fn best(&self) -> Option<&RankedResult> {
        self.results.first()
    }
}
