//! Ranker configuration
//!
//! Declarative settings for one ranking session: the match threshold,
//! the tokenizer policy and whether the advisory classifier runs.
//! Every field has a default, so an empty JSON object is a valid config.

use resumerank_core::{Error, Result, TokenizerConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Default match threshold, in percent
pub const DEFAULT_THRESHOLD_PERCENT: f64 = 20.0;

/// Match threshold, stored as a percentage.
///
/// A candidate matches when `score >= fraction()`; the boundary is inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Threshold {
    percent: f64,
}

impl Threshold {
    /// Any finite percentage is accepted
    pub fn from_percent(percent: f64) -> Result<Self> {
        if !percent.is_finite() {
            return Err(Error::Validation(format!(
                "match threshold must be a finite number, got {}",
                percent
            )));
        }
        Ok(Self { percent })
    }

    #[inline]
    pub fn percent(&self) -> f64 {
        self.percent
    }

    /// Threshold as a fraction of a perfect score
    #[inline]
    pub fn fraction(&self) -> f64 {
        self.percent / 100.0
    }
}

impl Default for Threshold {
    fn default() -> Self {
        Self {
            percent: DEFAULT_THRESHOLD_PERCENT,
        }
    }
}

impl FromStr for Threshold {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let percent: f64 = s.trim().parse().map_err(|_| {
            Error::Validation(format!("invalid match threshold value: {:?}", s))
        })?;
        Self::from_percent(percent)
    }
}

impl TryFrom<f64> for Threshold {
    type Error = Error;

    fn try_from(percent: f64) -> Result<Self> {
        Self::from_percent(percent)
    }
}

impl From<Threshold> for f64 {
    fn from(threshold: Threshold) -> f64 {
        threshold.percent
    }
}

/// Settings for the advisory decision-tree classifier
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClassifierConfig {
    /// Seed for the feature order used to break ties between equally good splits
    #[serde(default)]
    pub seed: u64,

    /// Maximum tree depth; unlimited when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<usize>,

    /// Nodes with fewer rows than this become leaves
    #[serde(default = "default_min_samples_split")]
    pub min_samples_split: usize,
}

fn default_min_samples_split() -> usize {
    2
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_depth: None,
            min_samples_split: default_min_samples_split(),
        }
    }
}

impl ClassifierConfig {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.min_samples_split < 2 {
            return Err(Error::Validation(
                "min_samples_split must be at least 2".to_string(),
            ));
        }
        if self.max_depth == Some(0) {
            return Err(Error::Validation("max_depth must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Configuration for a [`RankingEngine`](crate::RankingEngine)
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RankerConfig {
    #[serde(default)]
    pub threshold: Threshold,

    #[serde(default)]
    pub tokenizer: TokenizerConfig,

    /// Advisory classifier; disabled when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifier: Option<ClassifierConfig>,
}

impl RankerConfig {
    pub fn with_threshold(mut self, threshold: Threshold) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_classifier(mut self, classifier: ClassifierConfig) -> Self {
        self.classifier = Some(classifier);
        self
    }

    pub fn with_tokenizer(mut self, tokenizer: TokenizerConfig) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn validate(&self) -> Result<()> {
        self.tokenizer.validate()?;
        if let Some(classifier) = &self.classifier {
            classifier.validate()?;
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: RankerConfig = serde_json::from_str(json)
            .map_err(|e| Error::Validation(format!("invalid ranker config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
