// Term splitting shared by every document of one vectorization call
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use crate::{Error, Result};

/// Tokenizer settings. Terms are always lowercased.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Terms shorter than this many characters are dropped
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
}

fn default_min_token_len() -> usize {
    2
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        Self {
            min_token_len: default_min_token_len(),
        }
    }
}

impl TokenizerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_token_len == 0 {
            return Err(Error::Validation(
                "min_token_len must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    config: TokenizerConfig,
}

impl Tokenizer {
    #[inline]
    #[must_use]
    pub fn new(config: TokenizerConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &TokenizerConfig {
        &self.config
    }

    /// Split text into terms.
    /// A term is a maximal run of alphanumeric characters or underscores;
    /// everything else (whitespace, punctuation, symbols) separates terms.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|s| !s.is_empty() && s.chars().count() >= self.config.min_token_len)
            .map(str::to_lowercase)
            .collect()
    }

    /// Raw count of every term in the text
    pub fn term_counts(&self, text: &str) -> AHashMap<String, u32> {
        let mut counts: AHashMap<String, u32> = AHashMap::new();
        for token in self.tokenize(text) {
            *counts.entry(token).or_insert(0) += 1;
        }
        counts
    }
}
